//! Aggregation of decoded records into a [`Summary`].
//!
//! The aggregator knows record semantics but nothing about the byte layout.
//! [`Aggregator::process_log`] decodes and folds in a single streaming pass,
//! holding only the record currently being assembled.

use crate::decoder::{Decoder, KindPolicy};
use crate::error::Result;
use crate::record::Record;
use crate::summary::Summary;
use log::{debug, info};
use std::borrow::Borrow;
use std::io::Read;

/// Folds records, in order, into a summary for `tracked_user_id`.
///
/// # Example
///
/// ```
/// use txlog_summary::{summarize, Record, RecordKind};
///
/// let records = [
///     Record::new(0, 42, RecordKind::Credit(100.0)),
///     Record::new(1, 42, RecordKind::Debit(30.0)),
/// ];
/// let summary = summarize(&records, 42);
/// assert_eq!(summary.tracked_balance, 70.0);
/// ```
pub fn summarize<I>(records: I, tracked_user_id: u64) -> Summary
where
    I: IntoIterator,
    I::Item: Borrow<Record>,
{
    records
        .into_iter()
        .fold(Summary::new(tracked_user_id), |mut summary, record| {
            summary.apply(record.borrow());
            summary
        })
}

/// Streaming decode-and-fold over a whole log.
///
/// Decode failures abort the pass; no partial summary is ever returned.
pub struct Aggregator {
    tracked_user_id: u64,
    policy: KindPolicy,

    /// Records folded by the most recent pass.
    records_seen: u64,
}

impl Aggregator {
    /// Creates an aggregator tracking the balance of `tracked_user_id`.
    pub fn new(tracked_user_id: u64) -> Self {
        Aggregator {
            tracked_user_id,
            policy: KindPolicy::default(),
            records_seen: 0,
        }
    }

    /// Sets how unknown record kinds are treated while decoding.
    pub fn with_policy(mut self, policy: KindPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Identity whose balance is tracked.
    pub fn tracked_user_id(&self) -> u64 {
        self.tracked_user_id
    }

    /// Number of records folded by the most recent successful pass.
    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Decodes `reader` and folds every record into a summary.
    pub fn process_log<R: Read>(&mut self, reader: R) -> Result<Summary> {
        self.records_seen = 0;

        let mut decoder = Decoder::with_policy(reader, self.policy)?;
        let mut summary = Summary::new(self.tracked_user_id);
        let mut seen = 0u64;

        for result in decoder.by_ref() {
            let record = result?;
            summary.apply(&record);
            seen += 1;
        }
        decoder.finish()?;

        self.records_seen = seen;
        debug!("Folded {} records", seen);
        info!(
            "Debits {:.2}, credits {:.2}, autopays {}/{}, balance of {} is {:.2}",
            summary.total_debits,
            summary.total_credits,
            summary.autopays_started,
            summary.autopays_ended,
            summary.tracked_user_id,
            summary.tracked_balance
        );

        Ok(summary)
    }
}
