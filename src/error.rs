//! Error types for the capability boundary.
//!
//! Nothing in here ever reaches the game loop as a failure: the engine folds
//! every error into a log line and a well-defined fallback value.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the persistent byte store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("address {addr} is outside the {len}-byte store")]
    OutOfRange { addr: usize, len: usize },
}

/// A score record that was read back but does not look like one we wrote.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    #[error("bad record magic 0x{found:02x}")]
    BadMagic { found: u8 },

    #[error("unsupported record version {found}")]
    UnsupportedVersion { found: u8 },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;
