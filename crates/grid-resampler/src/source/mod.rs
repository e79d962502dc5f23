//! Ordered record sources and the windowed buffer that scans them.

mod windowed;

pub use windowed::{WindowedBuffer, DEFAULT_WINDOW};

use std::sync::Arc;

use grid_common::{Grid, GridError, TimeInterval};

use crate::error::{ResamplerError, Result};

/// An ordered, 0-indexed sequence of grids with their valid intervals.
///
/// Format decoders implement this. `interval` must be cheap since the
/// index is built from it; `get` may decode.
pub trait RecordSource {
    /// Number of records.
    fn count(&self) -> usize;

    /// Valid interval of record `index`, without loading the grid.
    ///
    /// Must be `Some` for every index below `count()`.
    fn interval(&self, index: usize) -> Option<TimeInterval>;

    /// Load record `index`.
    fn get(&self, index: usize) -> Result<Grid>;

    /// Valid intervals of every record, in record order.
    fn intervals(&self) -> Vec<TimeInterval> {
        (0..self.count()).filter_map(|i| self.interval(i)).collect()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn interval(&self, index: usize) -> Option<TimeInterval> {
        (**self).interval(index)
    }

    fn get(&self, index: usize) -> Result<Grid> {
        (**self).get(index)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Arc<S> {
    fn count(&self) -> usize {
        (**self).count()
    }

    fn interval(&self, index: usize) -> Option<TimeInterval> {
        (**self).interval(index)
    }

    fn get(&self, index: usize) -> Result<Grid> {
        (**self).get(index)
    }
}

/// A record sequence held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    grids: Vec<Grid>,
}

impl MemorySource {
    /// Build a source, checking that every grid shares the first grid's
    /// spatial layout and units.
    pub fn new(grids: Vec<Grid>) -> Result<Self> {
        if let Some(first) = grids.first() {
            for (i, grid) in grids.iter().enumerate().skip(1) {
                if !grid.spec().same_shape(first.spec()) {
                    return Err(GridError::shape_mismatch(format!(
                        "record {} has spatial layout {:?}, expected {:?}",
                        i,
                        grid.spec(),
                        first.spec()
                    ))
                    .into());
                }
                if grid.units() != first.units() {
                    return Err(ResamplerError::invalid_record(format!(
                        "record {} has units '{}', expected '{}'",
                        i,
                        grid.units(),
                        first.units()
                    )));
                }
            }
        }

        Ok(Self { grids })
    }
}

impl RecordSource for MemorySource {
    fn count(&self) -> usize {
        self.grids.len()
    }

    fn interval(&self, index: usize) -> Option<TimeInterval> {
        self.grids.get(index).map(|g| g.interval())
    }

    fn get(&self, index: usize) -> Result<Grid> {
        self.grids
            .get(index)
            .cloned()
            .ok_or_else(|| ResamplerError::source_read(index, "index out of range"))
    }
}
