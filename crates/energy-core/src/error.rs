use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the energy pipeline.
///
/// Row-level problems (bad timestamps, non-numeric values) are never
/// represented here: the reader reports them as skipped rows or defaulted
/// values and keeps going.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The raw input could not be read as a table at all.
    #[error("Failed to read energy data source: {0}")]
    SourceRead(String),

    /// A bucket key string is not a `yyyy-MM-dd` calendar date.
    #[error("Invalid period key: {0}")]
    InvalidKey(String),

    /// A timezone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EnergyError {
    /// `true` for failures to obtain or read the input as a whole.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            EnergyError::FileRead { .. } | EnergyError::SourceRead(_) | EnergyError::Io(_)
        )
    }
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;
