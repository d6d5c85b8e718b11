//! Summary totals accumulated over a decoded log.

use crate::error::Result;
use crate::record::{Record, RecordKind};
use log::debug;
use serde::Serialize;
use std::io::Write;

/// Fixed-shape aggregate of a log.
///
/// # Invariants
///
/// - `total_debits` and `total_credits` are sums of amounts, not counts
/// - `tracked_balance` only moves for records whose `user_id` equals
///   `tracked_user_id`: down by debits, up by credits
/// - Amounts are added in record order, so totals are reproducible bit for bit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of all debit amounts.
    pub total_debits: f64,

    /// Sum of all credit amounts.
    pub total_credits: f64,

    /// Number of autopay start records.
    pub autopays_started: u64,

    /// Number of autopay end records.
    pub autopays_ended: u64,

    /// Identity whose balance is tracked.
    pub tracked_user_id: u64,

    /// Credits minus debits for `tracked_user_id`.
    pub tracked_balance: f64,
}

impl Summary {
    /// Creates an empty summary tracking `tracked_user_id`.
    pub fn new(tracked_user_id: u64) -> Self {
        Summary {
            total_debits: 0.0,
            total_credits: 0.0,
            autopays_started: 0,
            autopays_ended: 0,
            tracked_user_id,
            tracked_balance: 0.0,
        }
    }

    /// Folds one record into the totals.
    pub fn apply(&mut self, record: &Record) {
        let tracked = record.user_id == self.tracked_user_id;

        match record.kind {
            RecordKind::Debit(amount) => {
                self.total_debits += amount;
                if tracked {
                    self.tracked_balance -= amount;
                }
            }
            RecordKind::Credit(amount) => {
                self.total_credits += amount;
                if tracked {
                    self.tracked_balance += amount;
                }
            }
            RecordKind::StartAutopay => self.autopays_started += 1,
            RecordKind::EndAutopay => self.autopays_ended += 1,
            RecordKind::Unrecognized(tag) => {
                debug!(
                    "Kind {} for user {} has no effect on the summary",
                    tag, record.user_id
                );
            }
        }
    }

    /// Writes the human-readable report.
    ///
    /// Amounts are printed with two decimal places.
    pub fn write_report<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(
            writer,
            "The total amount in dollars of debits is ${:.2}.",
            self.total_debits
        )?;
        writeln!(
            writer,
            "The total amount in dollars of credits is ${:.2}.",
            self.total_credits
        )?;
        writeln!(writer, "{} autopays were started.", self.autopays_started)?;
        writeln!(writer, "{} autopays were ended.", self.autopays_ended)?;
        writeln!(
            writer,
            "The balance of user ID {} is ${:.2}.",
            self.tracked_user_id, self.tracked_balance
        )?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the summary as a CSV header row plus one data row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.serialize(self)?;
        csv_writer.flush()?;
        Ok(())
    }
}
