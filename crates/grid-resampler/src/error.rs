//! Error types for the resampling engine.
//!
//! Missing data is not an error here: queries answer `None` or an empty
//! list. These variants cover collaborators that fail and invalid setup.

use grid_common::GridError;
use thiserror::Error;

/// Errors that can occur while building or feeding the engine.
#[derive(Error, Debug)]
pub enum ResamplerError {
    /// The record source failed to produce a record.
    #[error("failed to read record {index}: {message}")]
    SourceRead { index: usize, message: String },

    /// A record does not fit the sequence it is added to.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Grid construction failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The flush callback of a write buffer failed.
    #[error("write buffer flush failed: {0}")]
    FlushFailed(String),
}

impl ResamplerError {
    /// Create a SourceRead error.
    pub fn source_read(index: usize, msg: impl Into<String>) -> Self {
        Self::SourceRead {
            index,
            message: msg.into(),
        }
    }

    /// Create an InvalidRecord error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for resampler operations.
pub type Result<T> = std::result::Result<T, ResamplerError>;
