//! Application configuration.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::aead::PlaintextPolicy;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// How to present the result of a verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, in French.
    #[default]
    Text,

    /// A JSON document on a single line.
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Config {
    /// Verification to run, `integrity` or `presence`.
    #[arg(long, env = "CONTROL_TYPE")]
    pub control_type: String,

    /// File containing the control elements, as given to the voter. Reads
    /// from stdin if absent or `-`.
    #[arg(long, env = "CONTROL_ELEMENTS_PATH")]
    pub control_elements: Option<PathBuf>,

    /// Seconds to wait for the election site before giving up.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Treat a decrypted ballot paper that is not JSON as empty instead of
    /// reporting it.
    #[arg(long, env = "LENIENT_PLAINTEXT")]
    pub lenient_plaintext: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Config {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn plaintext_policy(&self) -> PlaintextPolicy {
        if self.lenient_plaintext {
            PlaintextPolicy::Lenient
        } else {
            PlaintextPolicy::Strict
        }
    }

    /// Reads the control elements from the configured file or stdin.
    pub fn read_control_elements(&self) -> color_eyre::Result<String> {
        match &self.control_elements {
            Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
            _ => Ok(std::io::read_to_string(std::io::stdin())?),
        }
    }
}

/// Loads `.env.local` and then `.env` into the environment. A missing file
/// is fine; one that fails to parse is not.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    ignore_missing(dotenvy::from_filename(".env.local"))?;
    ignore_missing(dotenvy::dotenv())
}

fn ignore_missing<T>(result: Result<T, dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e),
    }
}
