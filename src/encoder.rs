//! Writer for the binary log layout, the inverse of [`crate::decoder`].
//!
//! Used to build fixtures and to re-emit decoded logs.

use crate::error::Result;
use crate::record::{Header, Record};
use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;

/// Writes the 9-byte header.
pub fn encode_header<W: Write>(writer: &mut W, header: &Header) -> Result<()> {
    writer.write_all(&header.magic)?;
    writer.write_u8(header.version)?;
    writer.write_u32::<BigEndian>(header.record_count)?;
    Ok(())
}

/// Writes one record: 13 bytes, plus the amount for debits and credits.
pub fn encode_record<W: Write>(writer: &mut W, record: &Record) -> Result<()> {
    writer.write_u8(record.kind_tag())?;
    writer.write_u32::<BigEndian>(record.timestamp)?;
    writer.write_u64::<BigEndian>(record.user_id)?;
    if let Some(amount) = record.kind.amount() {
        writer.write_f64::<BigEndian>(amount)?;
    }
    Ok(())
}

/// Writes a complete log whose record count matches `records`.
///
/// # Panics
///
/// Panics if `records` holds more than `u32::MAX` entries.
pub fn encode<W: Write>(
    writer: &mut W,
    magic: [u8; 4],
    version: u8,
    records: &[Record],
) -> Result<()> {
    let record_count =
        u32::try_from(records.len()).expect("record count exceeds the format's u32 field");
    encode_header(
        writer,
        &Header {
            magic,
            version,
            record_count,
        },
    )?;
    for record in records {
        encode_record(writer, record)?;
    }
    Ok(())
}
