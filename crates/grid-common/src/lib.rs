//! Common types shared across the temporal grid crates.

pub mod data_type;
pub mod error;
pub mod grid;
pub mod time;

pub use data_type::DataType;
pub use error::{GridError, GridResult};
pub use grid::{Grid, GridSpec};
pub use time::{parse_time, TimeInterval};
