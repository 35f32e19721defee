//! Error types for the chip field.
//!
//! Only failures the host can act on are errors. Stale chip references,
//! validation failures and pending-queue overflow are logged and recovered
//! from inside the field.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChipsError {
    #[error("no chip background configured: chips cannot be rendered")]
    MissingChipBackground,

    #[error("chip height must be positive, got {0}")]
    InvalidChipHeight(u32),

    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ChipsError>;
