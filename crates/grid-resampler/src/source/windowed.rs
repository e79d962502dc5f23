//! Read-ahead window over a record source.
//!
//! Window queries walk a record sequence mostly forwards, so on a miss the
//! buffer drops its window and loads the next few consecutive records in
//! one go. A decoder with a high per-record cost is then paid for once per
//! window rather than once per query.

use grid_common::Grid;
use tracing::{debug, warn};

use super::RecordSource;
use crate::types::BufferStats;

/// Records loaded per window unless configured otherwise.
pub const DEFAULT_WINDOW: usize = 10;

/// A bounded cache of consecutive records from one source.
///
/// Not thread-safe: a miss replaces the window in place. Give each
/// concurrent consumer its own buffer.
pub struct WindowedBuffer<S> {
    source: S,
    capacity: usize,
    window_start: usize,
    window: Vec<Grid>,
    stats: BufferStats,
}

impl<S: RecordSource> WindowedBuffer<S> {
    /// Create a buffer holding up to [`DEFAULT_WINDOW`] records.
    pub fn new(source: S) -> Self {
        Self::with_capacity(source, DEFAULT_WINDOW)
    }

    /// Create a buffer holding up to `capacity` records (at least one).
    pub fn with_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity: capacity.max(1),
            window_start: 0,
            window: Vec::new(),
            stats: BufferStats::default(),
        }
    }

    /// Number of records in the underlying source.
    pub fn count(&self) -> usize {
        self.source.count()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get record `index`, reloading the window if it is not held.
    ///
    /// Out-of-range indices and failed reads are logged and answer `None`.
    pub fn get(&mut self, index: usize) -> Option<Grid> {
        let count = self.source.count();
        if index >= count {
            warn!(index, count, "Record index out of range");
            return None;
        }

        if self.holds(index) {
            self.stats.hits += 1;
            return Some(self.window[index - self.window_start].clone());
        }

        self.stats.misses += 1;
        self.reload(index, count);
        self.window.first().cloned()
    }

    /// Buffer statistics for monitoring.
    pub fn stats(&self) -> BufferStats {
        BufferStats {
            entries: self.window.len(),
            ..self.stats
        }
    }

    /// Drop the current window.
    pub fn clear(&mut self) {
        self.window.clear();
        self.window_start = 0;
    }

    fn holds(&self, index: usize) -> bool {
        index >= self.window_start && index < self.window_start + self.window.len()
    }

    fn reload(&mut self, index: usize, count: usize) {
        let end = (index + self.capacity).min(count);
        self.window.clear();
        self.window_start = index;
        self.stats.reloads += 1;

        for i in index..end {
            match self.source.get(i) {
                Ok(grid) => self.window.push(grid),
                Err(e) => {
                    warn!(index = i, error = %e, "Failed to load record, truncating window");
                    break;
                }
            }
        }

        debug!(
            start = index,
            loaded = self.window.len(),
            "Reloaded record window"
        );
    }
}
