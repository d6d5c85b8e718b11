//! Stream decoder for the binary transaction log.
//!
//! Reads the header once, then exactly `record_count` records. A record's
//! length depends on its tag, so records can only be located by decoding
//! every record before them; the decoder never seeks and never rereads.

use crate::error::{LogError, Result};
use crate::record::{
    Header, Record, RecordKind, AMOUNT_LEN, CREDIT, DEBIT, END_AUTOPAY, RECORD_PREFIX_LEN,
    START_AUTOPAY,
};
use byteorder::{BigEndian, ByteOrder};
use log::{debug, info, warn};
use std::io::{self, Read};

/// How the decoder treats tags outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindPolicy {
    /// Decode as a 13-byte [`RecordKind::Unrecognized`] record.
    #[default]
    Accept,

    /// Fail with [`LogError::UnrecognizedKind`].
    Reject,
}

/// Reads until `buf` is full or the source is exhausted.
///
/// Returns how many bytes were read, which is less than `buf.len()` only at EOF.
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Reads the fixed 9-byte header from the start of a log.
pub fn decode_header<R: Read>(mut reader: R) -> Result<Header> {
    let mut buf = [0u8; Header::LEN];
    let available = read_up_to(&mut reader, &mut buf)?;
    if available < Header::LEN {
        return Err(LogError::TruncatedHeader {
            expected: Header::LEN,
            available,
        });
    }

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&buf[0..4]);

    Ok(Header {
        magic,
        version: buf[4],
        record_count: BigEndian::read_u32(&buf[5..9]),
    })
}

/// Sequential record decoder over any byte source.
///
/// Yields exactly `header().record_count` records. After the first error the
/// iterator is fused and yields `None`.
///
/// # Example
///
/// ```
/// use txlog_summary::{Decoder, Record, RecordKind};
///
/// let mut bytes = Vec::new();
/// txlog_summary::encoder::encode(
///     &mut bytes,
///     *b"MPS7",
///     1,
///     &[Record::new(0, 42, RecordKind::Credit(100.0))],
/// )
/// .unwrap();
///
/// let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
/// assert_eq!(decoder.header().record_count, 1);
/// let record = decoder.next().unwrap().unwrap();
/// assert_eq!(record.kind, RecordKind::Credit(100.0));
/// assert!(decoder.next().is_none());
/// ```
pub struct Decoder<R> {
    reader: R,
    header: Header,
    policy: KindPolicy,

    /// Bytes consumed from the source so far.
    offset: u64,

    /// Index of the next record to decode.
    next_index: u32,

    failed: bool,
}

impl<R: Read> Decoder<R> {
    /// Reads the header and prepares to decode records, accepting unknown tags.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_policy(reader, KindPolicy::default())
    }

    /// Reads the header and prepares to decode records under `policy`.
    pub fn with_policy(mut reader: R, policy: KindPolicy) -> Result<Self> {
        let header = decode_header(&mut reader)?;
        info!(
            "Header: magic {:?}, version {}, {} records",
            header.magic, header.version, header.record_count
        );

        Ok(Decoder {
            reader,
            header,
            policy,
            offset: Header::LEN as u64,
            next_index: 0,
            failed: false,
        })
    }

    /// The header read at construction.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of bytes consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records still to be decoded.
    pub fn remaining(&self) -> u32 {
        if self.failed {
            0
        } else {
            self.header.record_count - self.next_index
        }
    }

    /// Drains whatever follows the declared records and returns its length.
    ///
    /// Intended for use once the iterator is exhausted. Trailing bytes are
    /// reported but tolerated.
    pub fn finish(mut self) -> Result<u64> {
        let trailing = io::copy(&mut self.reader, &mut io::sink())?;
        if trailing > 0 {
            warn!(
                "{} trailing bytes after {} declared records at offset {}",
                trailing, self.header.record_count, self.offset
            );
        }
        Ok(trailing)
    }

    fn next_record(&mut self) -> Result<Record> {
        let index = self.next_index;
        let start = self.offset;

        let mut prefix = [0u8; RECORD_PREFIX_LEN];
        let available = read_up_to(&mut self.reader, &mut prefix)?;
        self.offset += available as u64;
        if available < RECORD_PREFIX_LEN {
            return Err(LogError::TruncatedRecord {
                index,
                offset: start,
                expected: RECORD_PREFIX_LEN,
                available,
            });
        }

        let tag = prefix[0];
        let timestamp = BigEndian::read_u32(&prefix[1..5]);
        let user_id = BigEndian::read_u64(&prefix[5..13]);

        let kind = match tag {
            DEBIT => RecordKind::Debit(self.read_amount(index, start)?),
            CREDIT => RecordKind::Credit(self.read_amount(index, start)?),
            START_AUTOPAY => RecordKind::StartAutopay,
            END_AUTOPAY => RecordKind::EndAutopay,
            other => match self.policy {
                KindPolicy::Accept => {
                    warn!(
                        "Record {} at offset {}: unrecognized kind {}, keeping as no-op",
                        index, start, other
                    );
                    RecordKind::Unrecognized(other)
                }
                KindPolicy::Reject => {
                    return Err(LogError::UnrecognizedKind {
                        kind: other,
                        index,
                        offset: start,
                    });
                }
            },
        };

        let record = Record::new(timestamp, user_id, kind);
        debug!("Record {} at offset {}: {:?}", index, start, record);
        Ok(record)
    }

    fn read_amount(&mut self, index: u32, start: u64) -> Result<f64> {
        let mut buf = [0u8; AMOUNT_LEN];
        let available = read_up_to(&mut self.reader, &mut buf)?;
        self.offset += available as u64;
        if available < AMOUNT_LEN {
            return Err(LogError::TruncatedAmount {
                index,
                offset: start,
                expected: AMOUNT_LEN,
                available,
            });
        }
        Ok(BigEndian::read_f64(&buf))
    }
}

impl<R: Read> Iterator for Decoder<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.next_index >= self.header.record_count {
            return None;
        }

        let result = self.next_record();
        match result {
            Ok(_) => self.next_index += 1,
            Err(_) => self.failed = true,
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining() as usize))
    }
}

/// Decodes a complete log into its header and records.
///
/// Any failure aborts the whole decode; no partial sequence is returned.
pub fn decode<R: Read>(reader: R) -> Result<(Header, Vec<Record>)> {
    decode_with_policy(reader, KindPolicy::default())
}

/// Like [`decode`], with an explicit policy for unknown tags.
pub fn decode_with_policy<R: Read>(
    reader: R,
    policy: KindPolicy,
) -> Result<(Header, Vec<Record>)> {
    let mut decoder = Decoder::with_policy(reader, policy)?;
    let header = *decoder.header();
    let records = decoder.by_ref().collect::<Result<Vec<_>>>()?;
    decoder.finish()?;
    Ok((header, records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(record_count: u32) -> Vec<u8> {
        let mut bytes = b"MPS7".to_vec();
        bytes.push(1);
        bytes.extend_from_slice(&record_count.to_be_bytes());
        bytes
    }

    fn prefix_bytes(kind: u8, timestamp: u32, user_id: u64) -> Vec<u8> {
        let mut bytes = vec![kind];
        bytes.extend_from_slice(&timestamp.to_be_bytes());
        bytes.extend_from_slice(&user_id.to_be_bytes());
        bytes
    }

    #[test]
    fn test_decode_header_fields() {
        let header = decode_header(header_bytes(0x0102_0304).as_slice()).unwrap();
        assert_eq!(&header.magic, b"MPS7");
        assert_eq!(header.version, 1);
        assert_eq!(header.record_count, 0x0102_0304);
    }

    #[test]
    fn test_decode_header_truncated() {
        let err = decode_header(&[0u8; 5][..]).unwrap_err();
        assert!(matches!(
            err,
            LogError::TruncatedHeader {
                expected: 9,
                available: 5
            }
        ));
    }

    #[test]
    fn test_decode_header_empty_input() {
        let err = decode_header(&b""[..]).unwrap_err();
        assert!(matches!(err, LogError::TruncatedHeader { available: 0, .. }));
    }

    #[test]
    fn test_big_endian_fields() {
        let mut bytes = header_bytes(1);
        bytes.extend(prefix_bytes(1, 0x5F5E_1000, 0x0102_0304_0506_0708));
        bytes.extend_from_slice(&100.0f64.to_be_bytes());

        let (_, records) = decode(bytes.as_slice()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 0x5F5E_1000);
        assert_eq!(records[0].user_id, 0x0102_0304_0506_0708);
        assert_eq!(records[0].kind, RecordKind::Credit(100.0));
    }

    #[test]
    fn test_mixed_record_lengths_advance_offset() {
        let mut bytes = header_bytes(3);
        bytes.extend(prefix_bytes(2, 10, 7));
        bytes.extend(prefix_bytes(0, 11, 7));
        bytes.extend_from_slice(&5.5f64.to_be_bytes());
        bytes.extend(prefix_bytes(3, 12, 7));

        let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
        assert_eq!(decoder.offset(), 9);

        assert_eq!(
            decoder.next().unwrap().unwrap().kind,
            RecordKind::StartAutopay
        );
        assert_eq!(decoder.offset(), 22);

        assert_eq!(decoder.next().unwrap().unwrap().kind, RecordKind::Debit(5.5));
        assert_eq!(decoder.offset(), 43);

        assert_eq!(decoder.next().unwrap().unwrap().kind, RecordKind::EndAutopay);
        assert_eq!(decoder.offset(), 56);

        assert!(decoder.next().is_none());
        assert_eq!(decoder.finish().unwrap(), 0);
    }

    #[test]
    fn test_truncated_record_after_header() {
        let bytes = header_bytes(1);
        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            LogError::TruncatedRecord {
                index: 0,
                offset: 9,
                expected: 13,
                available: 0
            }
        ));
    }

    #[test]
    fn test_truncated_record_partial_prefix() {
        let mut bytes = header_bytes(1);
        bytes.extend_from_slice(&[2, 0, 0, 0]);
        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            LogError::TruncatedRecord { available: 4, .. }
        ));
    }

    #[test]
    fn test_truncated_amount() {
        let mut bytes = header_bytes(1);
        bytes.extend(prefix_bytes(0, 1, 2));
        bytes.extend_from_slice(&[0x40, 0x59]);

        let err = decode(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            LogError::TruncatedAmount {
                index: 0,
                offset: 9,
                expected: 8,
                available: 2
            }
        ));
    }

    #[test]
    fn test_iterator_fuses_after_error() {
        let mut bytes = header_bytes(3);
        bytes.extend(prefix_bytes(2, 1, 1));

        let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        assert!(decoder.next().unwrap().is_err());
        assert!(decoder.next().is_none());
        assert_eq!(decoder.remaining(), 0);
    }

    #[test]
    fn test_unrecognized_kind_accepted_by_default() {
        let mut bytes = header_bytes(2);
        bytes.extend(prefix_bytes(9, 1, 1));
        bytes.extend(prefix_bytes(2, 2, 1));

        let (_, records) = decode(bytes.as_slice()).unwrap();
        assert_eq!(records[0].kind, RecordKind::Unrecognized(9));
        assert_eq!(records[0].encoded_len(), 13);
        assert_eq!(records[1].kind, RecordKind::StartAutopay);
    }

    #[test]
    fn test_unrecognized_kind_rejected_by_policy() {
        let mut bytes = header_bytes(2);
        bytes.extend(prefix_bytes(2, 1, 1));
        bytes.extend(prefix_bytes(200, 2, 1));

        let err = decode_with_policy(bytes.as_slice(), KindPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            LogError::UnrecognizedKind {
                kind: 200,
                index: 1,
                offset: 22
            }
        ));
    }

    #[test]
    fn test_trailing_bytes_tolerated() {
        let mut bytes = header_bytes(1);
        bytes.extend(prefix_bytes(3, 1, 1));
        bytes.extend_from_slice(&[0xAA; 5]);

        let mut decoder = Decoder::new(bytes.as_slice()).unwrap();
        assert!(decoder.by_ref().all(|r| r.is_ok()));
        assert_eq!(decoder.finish().unwrap(), 5);

        let (_, records) = decode(bytes.as_slice()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_zero_records() {
        let (header, records) = decode(header_bytes(0).as_slice()).unwrap();
        assert_eq!(header.record_count, 0);
        assert!(records.is_empty());
    }
}
