//! Runtime configuration from command-line arguments and environment.
//!
//! # Environment Variables
//!
//! - `TXLOG_USER_ID`: identity whose balance is reported
//!   (default [`DEFAULT_TRACKED_USER_ID`])
//! - `TXLOG_UNKNOWN_KINDS`: `accept` (default) or `reject`
//! - `TXLOG_FORMAT`: `text` (default) or `csv`

use crate::decoder::KindPolicy;
use crate::error::{LogError, Result};
use std::path::PathBuf;

/// Identity reported when `TXLOG_USER_ID` is unset.
pub const DEFAULT_TRACKED_USER_ID: u64 = 2_456_938_384_156_277_127;

pub const USER_ID_VAR: &str = "TXLOG_USER_ID";
pub const UNKNOWN_KINDS_VAR: &str = "TXLOG_UNKNOWN_KINDS";
pub const FORMAT_VAR: &str = "TXLOG_FORMAT";

/// Report style written by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: PathBuf,
    pub tracked_user_id: u64,
    pub kind_policy: KindPolicy,
    pub output_format: OutputFormat,
}

impl Config {
    /// Builds a config from `std::env::args()` and the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_parts(std::env::args(), |name| std::env::var(name).ok())
    }

    /// Builds a config from an argument list (program name first) and a
    /// variable lookup.
    ///
    /// Exactly one positional argument, the log path, is accepted.
    pub fn from_parts<I, F>(args: I, lookup: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut positional = args.into_iter().skip(1);
        let input_path = match (positional.next(), positional.next()) {
            (Some(path), None) => PathBuf::from(path),
            _ => return Err(LogError::Usage),
        };

        let tracked_user_id = match lookup(USER_ID_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| LogError::InvalidSetting {
                    name: USER_ID_VAR,
                    value,
                })?,
            None => DEFAULT_TRACKED_USER_ID,
        };

        let kind_policy = match lookup(UNKNOWN_KINDS_VAR) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "accept" => KindPolicy::Accept,
                "reject" => KindPolicy::Reject,
                _ => {
                    return Err(LogError::InvalidSetting {
                        name: UNKNOWN_KINDS_VAR,
                        value,
                    })
                }
            },
            None => KindPolicy::default(),
        };

        let output_format = match lookup(FORMAT_VAR) {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "csv" => OutputFormat::Csv,
                _ => {
                    return Err(LogError::InvalidSetting {
                        name: FORMAT_VAR,
                        value,
                    })
                }
            },
            None => OutputFormat::default(),
        };

        Ok(Config {
            input_path,
            tracked_user_id,
            kind_policy,
            output_format,
        })
    }
}
