// cli/src/badgectl/error.rs
// Errors surfaced by badgectl commands

use std::path::PathBuf;

use badge_kernel::BootError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is not valid JSON: {source}")]
    State {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {path} is invalid: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown boot mode '{0}' (expected none, ota, companion, first-run or raw=N)")]
    Mode(String),

    #[error("unknown button '{0}'")]
    Button(String),

    #[error("unknown reset cause '{0}'")]
    ResetCause(String),

    #[error("{0} arena already taken")]
    ArenaTaken(&'static str),

    #[error(transparent)]
    Boot(#[from] BootError),

    #[error("interpreter task ended unexpectedly")]
    TaskEnded,
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
