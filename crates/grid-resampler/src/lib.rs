//! Temporal Indexing and Resampling of Gridded Time Series
//!
//! This crate answers "what was the value of this quantity over `[qs, qe)`"
//! for an ordered sequence of grids, each valid for an instant or a period.
//! It provides:
//!
//! - **Interval indices**: an arena interval tree for period records and an
//!   ordered map for instantaneous samples
//! - **Windowed buffering**: bounded read-ahead over slow record sources
//! - **Weighted reconstruction**: accumulation, time-weighted average,
//!   linear interpolation and trapezoid integration
//! - **Supporting utilities**: an expiring resource cache and a
//!   pressure-gated write buffer
//!
//! # Architecture
//!
//! ```text
//! Resampler::read(qs, qe)
//!      │
//!      ├─► IntervalIndex::query (period tree / instant map)
//!      │
//!      ├─► select_coverage (accumulation, average)
//!      │
//!      ├─► WindowedBuffer::get for each chosen record
//!      │         │
//!      │         ├─► In window: return held grid
//!      │         │
//!      │         └─► Miss: reload the next N records from the source
//!      │
//!      └─► reconstruct::{accumulate, average, interpolate_point,
//!                        integrate_instantaneous}
//!               │
//!               ▼
//!          Option<Grid>
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_common::DataType;
//! use grid_resampler::{MemorySource, Resampler};
//!
//! let source = MemorySource::new(hourly_precip_grids)?;
//! let mut resampler = Resampler::new(source, DataType::Accumulation);
//!
//! // Three-hour total from hourly records
//! let total = resampler.read(start, start + chrono::Duration::hours(3));
//! ```

pub mod cache;
pub mod config;
pub mod coverage;
pub mod error;
pub mod index;
pub mod reconstruct;
pub mod resampler;
pub mod source;
pub mod types;
pub mod writer;

// Re-export commonly used types at crate root
pub use cache::{Closeable, ExpiringCache};
pub use config::ResamplerConfig;
pub use coverage::{select_coverage, CoverageSegment};
pub use error::{ResamplerError, Result};
pub use index::{IndexKind, InstantMap, IntervalIndex, PeriodTree};
pub use resampler::Resampler;
pub use source::{MemorySource, RecordSource, WindowedBuffer, DEFAULT_WINDOW};
pub use types::{BufferStats, CacheStats};
pub use writer::{ItemThreshold, MemoryFraction, PressureSignal, WriteBuffer};
