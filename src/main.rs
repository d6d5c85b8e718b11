//! Transaction log summary CLI
//!
//! Decodes a binary transaction log and prints debit/credit totals, autopay
//! counts and the balance of one tracked user.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- txnlog.dat
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `TXLOG_USER_ID`, `TXLOG_UNKNOWN_KINDS`, `TXLOG_FORMAT`: see [`txlog_summary::config`]

use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use txlog_summary::{Aggregator, Config, OutputFormat, Result};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    let file = File::open(&config.input_path)?;
    let reader = BufReader::new(file);

    let mut aggregator = Aggregator::new(config.tracked_user_id).with_policy(config.kind_policy);
    let summary = aggregator.process_log(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    match config.output_format {
        OutputFormat::Text => summary.write_report(handle)?,
        OutputFormat::Csv => summary.write_csv(handle)?,
    }

    Ok(())
}
