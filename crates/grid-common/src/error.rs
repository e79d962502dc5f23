//! Error types for the grid data model.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Errors raised while constructing grids and time intervals.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Invalid interval: end {end} precedes start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("Grid data length {actual} does not match dimensions {nx}x{ny}")]
    DataLength { nx: usize, ny: usize, actual: usize },

    #[error("Grid shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),
}

impl GridError {
    /// Create an InvalidInterval error from any displayable bounds.
    pub fn invalid_interval(start: impl ToString, end: impl ToString) -> Self {
        Self::InvalidInterval {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }
}
