//! Temporal query engine.
//!
//! A [`Resampler`] answers "what does this quantity look like over
//! `[qs, qe)`" for one record sequence:
//!
//! ```text
//! read(qs, qe)
//!      │
//!      ├─► IntervalIndex: candidate record positions
//!      │
//!      ├─► coverage selection (period data only)
//!      │
//!      ├─► WindowedBuffer: load the chosen grids
//!      │
//!      └─► reconstruction rule for the data type
//!               │
//!               ▼
//!          Some(grid) or None
//! ```
//!
//! The data type, and with it the index variant and reconstruction rule,
//! is fixed when the resampler is built.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use grid_common::{DataType, Grid, TimeInterval};
use tracing::{debug, info, warn};

use crate::config::ResamplerConfig;
use crate::coverage::{select_coverage, CoverageSegment};
use crate::index::IntervalIndex;
use crate::reconstruct;
use crate::source::{RecordSource, WindowedBuffer};
use crate::types::BufferStats;

/// Answers window queries over one record sequence.
///
/// The index and interval table are immutable and shared between forks;
/// the windowed buffer belongs to this instance alone, which is why the
/// query methods take `&mut self`.
pub struct Resampler<S> {
    data_type: DataType,
    intervals: Arc<[TimeInterval]>,
    index: Arc<IntervalIndex>,
    buffer: WindowedBuffer<S>,
    parallel_min_cells: usize,
}

impl<S: RecordSource> Resampler<S> {
    /// Create a resampler with the default configuration.
    pub fn new(source: S, data_type: DataType) -> Self {
        Self::with_config(source, data_type, &ResamplerConfig::default())
    }

    /// Create a resampler, building the index for `data_type`.
    pub fn with_config(source: S, data_type: DataType, config: &ResamplerConfig) -> Self {
        let intervals: Arc<[TimeInterval]> = source.intervals().into();
        if intervals.len() != source.count() {
            warn!(
                records = source.count(),
                intervals = intervals.len(),
                "Record source is missing intervals, index positions will not match records"
            );
        }
        let index = Arc::new(IntervalIndex::build(data_type, &intervals));

        info!(
            data_type = %data_type,
            records = intervals.len(),
            indexed = index.len(),
            index = ?index.kind(),
            "Built temporal index"
        );

        Self {
            data_type,
            intervals,
            index,
            buffer: WindowedBuffer::with_capacity(source, config.buffer_window),
            parallel_min_cells: config.parallel_min_cells,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    /// Number of records in the sequence.
    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    /// Windowed buffer statistics for monitoring.
    pub fn buffer_stats(&self) -> BufferStats {
        self.buffer.stats()
    }

    /// Reconstruct the grid for `[qs, qe)`.
    ///
    /// `qs == qe` asks for the value at an instant, which only
    /// instantaneous data can answer. Returns `None` when the records do
    /// not cover the window.
    pub fn read(&mut self, qs: DateTime<Utc>, qe: DateTime<Utc>) -> Option<Grid> {
        let Ok(query) = TimeInterval::new(qs, qe) else {
            warn!(%qs, %qe, "Query window ends before it starts");
            return None;
        };
        self.read_interval(&query)
    }

    /// Reconstruct the grid for an existing interval.
    pub fn read_interval(&mut self, query: &TimeInterval) -> Option<Grid> {
        let pmc = self.parallel_min_cells;
        match self.data_type {
            DataType::Accumulation => {
                let parts = self.load_coverage(query)?;
                reconstruct::accumulate(&parts, query, pmc)
            }
            DataType::Average => {
                let parts = self.load_coverage(query)?;
                reconstruct::average(&parts, query, pmc)
            }
            DataType::Instantaneous if query.is_instant() => {
                let t = query.start();
                let samples = self.load(&self.index.query_nearest(t))?;
                if samples.is_empty() {
                    debug!(%t, "No samples bracket the requested instant");
                }
                reconstruct::interpolate_point(&samples, t, pmc)
            }
            DataType::Instantaneous => {
                let samples = self.load(&self.index.query(query.start(), query.end()))?;
                reconstruct::integrate_instantaneous(&samples, query, pmc)
            }
            DataType::Undefined => None,
        }
    }

    /// Cellwise minimum and maximum over the records that answer `[qs, qe)`.
    pub fn min_max(&mut self, qs: DateTime<Utc>, qe: DateTime<Utc>) -> Option<(Grid, Grid)> {
        let query = TimeInterval::new(qs, qe).ok()?;
        let grids = match self.data_type {
            DataType::Accumulation | DataType::Average => self
                .load_coverage(&query)?
                .into_iter()
                .map(|(grid, _)| grid)
                .collect(),
            DataType::Instantaneous => {
                let positions = if query.is_instant() {
                    self.index.query_nearest(qs)
                } else {
                    self.index.query(qs, qe)
                };
                self.load(&positions)?
            }
            DataType::Undefined => return None,
        };

        reconstruct::envelope(&grids, query, self.parallel_min_cells)
    }

    /// Records chosen to cover `[qs, qe)`, with the part each accounts for.
    ///
    /// Only meaningful for period data; `None` when the window is not
    /// fully covered.
    pub fn coverage(&self, qs: DateTime<Utc>, qe: DateTime<Utc>) -> Option<Vec<CoverageSegment>> {
        let query = TimeInterval::new(qs, qe).ok()?;
        self.select(&query)
    }

    /// Answer consecutive windows of length `step` from `start` up to `end`.
    ///
    /// Only whole windows are produced. Windows advance monotonically, so
    /// the buffer's read-ahead serves most of the loads.
    pub fn series(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Vec<(TimeInterval, Option<Grid>)> {
        if step <= Duration::zero() {
            warn!(step = %step, "Series step must be positive");
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut t = start;
        while let Some(next) = t.checked_add_signed(step) {
            if next > end {
                break;
            }
            let Ok(window) = TimeInterval::new(t, next) else {
                break;
            };
            let grid = self.read_interval(&window);
            out.push((window, grid));
            t = next;
        }
        out
    }

    fn select(&self, query: &TimeInterval) -> Option<Vec<CoverageSegment>> {
        if !self.data_type.is_period() || query.is_instant() {
            return None;
        }

        let (first, last) = (self.index.earliest_start()?, self.index.latest_end()?);
        if query.start() < first || query.end() > last {
            debug!(%query, %first, %last, "Query window outside the record range");
            return None;
        }

        let candidates: Vec<(usize, TimeInterval)> = self
            .index
            .query(query.start(), query.end())
            .into_iter()
            .map(|i| (i, self.intervals[i]))
            .collect();

        let selected = select_coverage(&candidates, query);
        if selected.is_none() {
            debug!(%query, candidates = candidates.len(), "Records leave a gap in the window");
        }
        selected
    }

    fn load_coverage(&mut self, query: &TimeInterval) -> Option<Vec<(Grid, CoverageSegment)>> {
        let segments = self.select(query)?;
        segments
            .into_iter()
            .map(|seg| self.buffer.get(seg.record).map(|grid| (grid, seg)))
            .collect()
    }

    fn load(&mut self, positions: &[usize]) -> Option<Vec<Grid>> {
        positions.iter().map(|&i| self.buffer.get(i)).collect()
    }
}

impl<S: RecordSource + Clone> Resampler<S> {
    /// A resampler over the same sequence with its own buffer.
    ///
    /// Shares the index, so forking is cheap. Use one fork per concurrent
    /// consumer.
    pub fn fork(&self) -> Self {
        Self {
            data_type: self.data_type,
            intervals: Arc::clone(&self.intervals),
            index: Arc::clone(&self.index),
            buffer: WindowedBuffer::with_capacity(self.buffer.source().clone(), self.buffer.capacity()),
            parallel_min_cells: self.parallel_min_cells,
        }
    }
}
