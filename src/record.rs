//! Header and record models for the binary transaction log.
//!
//! All multi-byte fields are big-endian with no padding. A record is
//! 13 bytes (kind, timestamp, user id) followed by an 8-byte amount only
//! for debits and credits.

/// Tag byte for a debit record.
pub const DEBIT: u8 = 0;
/// Tag byte for a credit record.
pub const CREDIT: u8 = 1;
/// Tag byte for an autopay start record.
pub const START_AUTOPAY: u8 = 2;
/// Tag byte for an autopay end record.
pub const END_AUTOPAY: u8 = 3;

/// Size of the fields every record carries: kind + timestamp + user id.
pub const RECORD_PREFIX_LEN: usize = 1 + 4 + 8;

/// Size of the IEEE-754 amount that follows monetary records.
pub const AMOUNT_LEN: usize = 8;

/// Log header, read once at offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Format identifier, kept verbatim for the caller to validate.
    pub magic: [u8; 4],

    /// Format version.
    pub version: u8,

    /// Exact number of records that follow the header.
    pub record_count: u32,
}

impl Header {
    /// Encoded size: magic + version + record count.
    pub const LEN: usize = 4 + 1 + 4;

    /// Returns the magic tag as text when it is valid UTF-8.
    pub fn magic_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.magic).ok()
    }
}

/// Record shape and semantics, selected by the leading tag byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordKind {
    /// Money leaving the user's account.
    Debit(f64),

    /// Money entering the user's account.
    Credit(f64),

    /// An autopay arrangement was started.
    StartAutopay,

    /// An autopay arrangement was ended.
    EndAutopay,

    /// Tag outside the known set; carries no amount.
    Unrecognized(u8),
}

impl RecordKind {
    /// Returns `true` if a record with this tag is followed by an amount.
    pub fn has_amount(tag: u8) -> bool {
        matches!(tag, DEBIT | CREDIT)
    }

    /// The tag byte this kind is encoded with.
    pub fn tag(&self) -> u8 {
        match self {
            RecordKind::Debit(_) => DEBIT,
            RecordKind::Credit(_) => CREDIT,
            RecordKind::StartAutopay => START_AUTOPAY,
            RecordKind::EndAutopay => END_AUTOPAY,
            RecordKind::Unrecognized(tag) => *tag,
        }
    }

    /// The monetary amount, present only for debits and credits.
    pub fn amount(&self) -> Option<f64> {
        match self {
            RecordKind::Debit(amount) | RecordKind::Credit(amount) => Some(*amount),
            _ => None,
        }
    }
}

/// A single decoded log record. Immutable once decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Unix epoch seconds.
    pub timestamp: u32,

    /// Identity the record applies to.
    pub user_id: u64,

    /// Kind with its variant-specific data.
    pub kind: RecordKind,
}

impl Record {
    /// Creates a record.
    pub fn new(timestamp: u32, user_id: u64, kind: RecordKind) -> Self {
        Record {
            timestamp,
            user_id,
            kind,
        }
    }

    /// The record's tag byte.
    pub fn kind_tag(&self) -> u8 {
        self.kind.tag()
    }

    /// Number of bytes this record occupies in the log.
    pub fn encoded_len(&self) -> usize {
        if RecordKind::has_amount(self.kind_tag()) {
            RECORD_PREFIX_LEN + AMOUNT_LEN
        } else {
            RECORD_PREFIX_LEN
        }
    }
}
