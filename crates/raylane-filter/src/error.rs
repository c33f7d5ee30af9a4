//! Error types for the filter crate.
//!
//! The filter protocol itself never fails; contract violations are debug
//! assertions. Only loading configuration can produce an error.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up filtering.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Config file could not be read.
    #[error("failed to read filter config {}: {source}", .path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid.
    #[error("invalid filter config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for filter setup operations.
pub type Result<T> = std::result::Result<T, FilterError>;
