//! Time-ordered map of instantaneous samples.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use grid_common::TimeInterval;
use tracing::debug;

/// Sample time -> record index, for instantaneous data.
#[derive(Debug, Clone, Default)]
pub struct InstantMap {
    samples: BTreeMap<DateTime<Utc>, usize>,
}

impl InstantMap {
    /// Build from record intervals; position `i` is record `i`.
    ///
    /// Only degenerate intervals are samples. When two records share an
    /// instant the later record wins.
    pub fn build(intervals: &[TimeInterval]) -> Self {
        let mut samples = BTreeMap::new();
        for (record, interval) in intervals.iter().enumerate() {
            if !interval.is_instant() {
                debug!(record, %interval, "Skipping non-instantaneous record");
                continue;
            }
            samples.insert(interval.start(), record);
        }
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples needed to evaluate the signal at `t`.
    ///
    /// An exact hit gives one record; otherwise the floor and ceiling
    /// samples, in time order. Empty when `t` is not bracketed.
    pub fn point(&self, t: DateTime<Utc>) -> Vec<usize> {
        if let Some(&record) = self.samples.get(&t) {
            return vec![record];
        }

        match (self.floor(t), self.ceiling(t)) {
            (Some((_, before)), Some((_, after))) => vec![before, after],
            _ => Vec::new(),
        }
    }

    /// Samples spanning `[start, end]`, widened outwards to the nearest
    /// sample at or before `start` and at or after `end`.
    ///
    /// The first and last returned samples therefore bracket the query
    /// whenever the data allows it.
    pub fn period(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<usize> {
        let lo = self.floor(start).map(|(t, _)| t).unwrap_or(start);
        let hi = self.ceiling(end).map(|(t, _)| t).unwrap_or(end);
        if hi < lo {
            return Vec::new();
        }
        self.samples.range(lo..=hi).map(|(_, &record)| record).collect()
    }

    /// Latest sample at or before `t`.
    pub fn floor(&self, t: DateTime<Utc>) -> Option<(DateTime<Utc>, usize)> {
        self.samples.range(..=t).next_back().map(|(&k, &v)| (k, v))
    }

    /// Earliest sample at or after `t`.
    pub fn ceiling(&self, t: DateTime<Utc>) -> Option<(DateTime<Utc>, usize)> {
        self.samples.range(t..).next().map(|(&k, &v)| (k, v))
    }

    /// First sample.
    pub fn first(&self) -> Option<(DateTime<Utc>, usize)> {
        self.samples.first_key_value().map(|(&k, &v)| (k, v))
    }

    /// Last sample.
    pub fn last(&self) -> Option<(DateTime<Utc>, usize)> {
        self.samples.last_key_value().map(|(&k, &v)| (k, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{hour, hour_span};

    fn samples(hours: &[u32]) -> InstantMap {
        let intervals: Vec<_> = hours
            .iter()
            .map(|&h| TimeInterval::instant(hour(h, 0)))
            .collect();
        InstantMap::build(&intervals)
    }

    #[test]
    fn test_point_exact_match() {
        let map = samples(&[1, 2, 3, 4, 5]);
        assert_eq!(map.point(hour(3, 0)), vec![2]);
    }

    #[test]
    fn test_point_brackets() {
        let map = samples(&[1, 2, 3, 4, 5]);
        assert_eq!(map.point(hour(3, 30)), vec![2, 3]);
    }

    #[test]
    fn test_point_outside_range() {
        let map = samples(&[1, 2, 3, 4, 5]);
        assert!(map.point(hour(0, 30)).is_empty());
        assert!(map.point(hour(6, 0)).is_empty());
    }

    #[test]
    fn test_period_expands_to_real_samples() {
        let map = samples(&[1, 2, 3, 4, 5]);
        assert_eq!(map.period(hour(1, 30), hour(3, 30)), vec![0, 1, 2, 3]);
        assert_eq!(map.period(hour(2, 0), hour(3, 0)), vec![1, 2]);
    }

    #[test]
    fn test_period_without_bracket_keeps_bound() {
        let map = samples(&[2, 3, 4]);
        assert_eq!(map.period(hour(1, 0), hour(3, 30)), vec![0, 1, 2]);
        assert_eq!(map.period(hour(3, 30), hour(9, 0)), vec![1, 2]);
    }

    #[test]
    fn test_skips_period_records_and_keeps_last_duplicate() {
        let intervals = vec![
            TimeInterval::instant(hour(1, 0)),
            hour_span(1, 0, 2, 0),
            TimeInterval::instant(hour(1, 0)),
        ];
        let map = InstantMap::build(&intervals);
        assert_eq!(map.len(), 1);
        assert_eq!(map.point(hour(1, 0)), vec![2]);
        assert_eq!(map.first(), map.last());
    }
}
