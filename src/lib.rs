//! # Transaction Log Summary
//!
//! Decodes a compact binary transaction log and folds its records into
//! summary totals.
//!
//! ## Design Principles
//!
//! - **Single pass**: records are decoded sequentially and folded as they arrive
//! - **All or nothing**: a truncated log produces an error, never a partial summary
//! - **Typed shapes**: only debits and credits carry an amount
//! - **Deterministic totals**: amounts are summed in log order
//!
//! ## Example
//!
//! ```no_run
//! use txlog_summary::Aggregator;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let file = File::open("txnlog.dat").unwrap();
//! let summary = Aggregator::new(42).process_log(BufReader::new(file)).unwrap();
//! summary.write_report(std::io::stdout()).unwrap();
//! ```

pub mod aggregator;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod record;
pub mod summary;

pub use aggregator::{summarize, Aggregator};
pub use config::{Config, OutputFormat};
pub use decoder::{decode, decode_header, decode_with_policy, Decoder, KindPolicy};
pub use error::{LogError, Result};
pub use record::{Header, Record, RecordKind};
pub use summary::Summary;
