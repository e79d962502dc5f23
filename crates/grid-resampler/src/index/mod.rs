//! Interval indices over a record sequence.
//!
//! The variant is chosen once from the collection's data type:
//!
//! | Data type | Variant | Backing structure |
//! |-----------|---------|-------------------|
//! | accumulation, average | `Period` | balanced augmented interval tree |
//! | instantaneous | `Instant` | time-ordered map |
//! | undefined | `Empty` | nothing; every query is empty |
//!
//! An index is immutable once built and can be shared across threads.

mod instant;
mod period;

pub use instant::InstantMap;
pub use period::PeriodTree;

use chrono::{DateTime, Utc};
use grid_common::{DataType, TimeInterval};

/// Which index variant a data type selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Period,
    Instant,
    Empty,
}

/// Locates the records relevant to a time window.
#[derive(Debug, Clone)]
pub enum IntervalIndex {
    Period(PeriodTree),
    Instant(InstantMap),
    Empty,
}

impl IntervalIndex {
    /// Build the index variant matching `data_type`. Position `i` in
    /// `intervals` is record `i`.
    pub fn build(data_type: DataType, intervals: &[TimeInterval]) -> Self {
        match data_type {
            DataType::Accumulation | DataType::Average => Self::Period(PeriodTree::build(intervals)),
            DataType::Instantaneous => Self::Instant(InstantMap::build(intervals)),
            DataType::Undefined => Self::Empty,
        }
    }

    pub fn kind(&self) -> IndexKind {
        match self {
            Self::Period(_) => IndexKind::Period,
            Self::Instant(_) => IndexKind::Instant,
            Self::Empty => IndexKind::Empty,
        }
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        match self {
            Self::Period(tree) => tree.len(),
            Self::Instant(map) => map.len(),
            Self::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records relevant to `[qs, qe)`.
    ///
    /// Period data: the records overlapping the window. Instantaneous data:
    /// the samples bracketing `qs` when `qs == qe`, otherwise every sample
    /// spanning the window widened to the nearest sample on each side.
    pub fn query(&self, qs: DateTime<Utc>, qe: DateTime<Utc>) -> Vec<usize> {
        let Ok(window) = TimeInterval::new(qs, qe) else {
            return Vec::new();
        };

        match self {
            Self::Period(tree) => tree.find_overlaps(&window),
            Self::Instant(map) if qs == qe => map.point(qs),
            Self::Instant(map) => map.period(qs, qe),
            Self::Empty => Vec::new(),
        }
    }

    /// Records nearest to the instant `t`.
    ///
    /// Period data: records whose interval contains `t`. Instantaneous
    /// data: the exact sample, or the floor/ceiling pair around `t`.
    pub fn query_nearest(&self, t: DateTime<Utc>) -> Vec<usize> {
        match self {
            Self::Period(tree) => tree.find_containing(t),
            Self::Instant(map) => map.point(t),
            Self::Empty => Vec::new(),
        }
    }

    /// Earliest start of any indexed record.
    pub fn earliest_start(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Period(tree) => tree.find_minimum().map(|(_, i)| i.start()),
            Self::Instant(map) => map.first().map(|(t, _)| t),
            Self::Empty => None,
        }
    }

    /// Latest end of any indexed record.
    pub fn latest_end(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Period(tree) => tree.find_maximum().map(|(_, i)| i.end()),
            Self::Instant(map) => map.last().map(|(t, _)| t),
            Self::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{hour, hour_span};

    fn hourly(n: u32) -> Vec<TimeInterval> {
        (1..=n).map(|h| hour_span(h, 0, h + 1, 0)).collect()
    }

    #[test]
    fn test_variant_follows_data_type() {
        let intervals = hourly(3);
        assert_eq!(IntervalIndex::build(DataType::Accumulation, &intervals).kind(), IndexKind::Period);
        assert_eq!(IntervalIndex::build(DataType::Average, &intervals).kind(), IndexKind::Period);
        assert_eq!(IntervalIndex::build(DataType::Instantaneous, &intervals).kind(), IndexKind::Instant);
        assert_eq!(IntervalIndex::build(DataType::Undefined, &intervals).kind(), IndexKind::Empty);
    }

    #[test]
    fn test_period_bounds() {
        let index = IntervalIndex::build(DataType::Accumulation, &hourly(5));
        assert_eq!(index.earliest_start(), Some(hour(1, 0)));
        assert_eq!(index.latest_end(), Some(hour(6, 0)));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_period_query_nearest() {
        let index = IntervalIndex::build(DataType::Average, &hourly(5));
        assert_eq!(index.query_nearest(hour(3, 15)), vec![2]);
        assert!(index.query_nearest(hour(0, 15)).is_empty());
    }

    #[test]
    fn test_instant_query_dispatch() {
        let intervals: Vec<_> = (1..=5).map(|h| TimeInterval::instant(hour(h, 0))).collect();
        let index = IntervalIndex::build(DataType::Instantaneous, &intervals);

        assert_eq!(index.query(hour(3, 30), hour(3, 30)), vec![2, 3]);
        assert_eq!(index.query(hour(2, 30), hour(4, 0)), vec![1, 2, 3]);
        assert_eq!(index.query_nearest(hour(4, 0)), vec![3]);
        assert_eq!(index.earliest_start(), Some(hour(1, 0)));
        assert_eq!(index.latest_end(), Some(hour(5, 0)));
    }

    #[test]
    fn test_empty_index_answers_nothing() {
        let index = IntervalIndex::build(DataType::Undefined, &hourly(5));
        assert!(index.query(hour(1, 0), hour(6, 0)).is_empty());
        assert!(index.query_nearest(hour(2, 0)).is_empty());
        assert!(index.earliest_start().is_none());
        assert!(index.latest_end().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn test_reversed_query_is_empty() {
        let index = IntervalIndex::build(DataType::Accumulation, &hourly(5));
        assert!(index.query(hour(4, 0), hour(2, 0)).is_empty());
    }
}
