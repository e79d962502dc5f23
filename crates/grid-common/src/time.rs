//! Half-open time intervals and overlap arithmetic.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// A half-open `[start, end)` time span.
///
/// A degenerate interval (`start == end`) marks an instantaneous sample.
/// Intervals order by start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Unchecked wire form; deserialization goes through `TimeInterval::new`.
#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for TimeInterval {
    type Error = GridError;

    fn try_from(raw: RawInterval) -> GridResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> GridResult<Self> {
        if end < start {
            return Err(GridError::invalid_interval(start, end));
        }
        Ok(Self { start, end })
    }

    /// Degenerate interval for a sample taken at `t`.
    pub fn instant(t: DateTime<Utc>) -> Self {
        Self { start: t, end: t }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in (fractional) minutes.
    pub fn duration_minutes(&self) -> f64 {
        minutes(self.duration())
    }

    /// Zero-length intervals are instantaneous regardless of declared data type.
    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// Half-open containment. An instant contains only its own timestamp.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        if self.is_instant() {
            return t == self.start;
        }
        t >= self.start && t < self.end
    }

    /// `max(0, min(A.end, B.end) - max(A.start, B.start))`.
    pub fn overlap_duration(&self, other: &TimeInterval) -> Duration {
        let lo = self.start.max(other.start);
        let hi = self.end.min(other.end);
        if hi > lo {
            hi - lo
        } else {
            Duration::zero()
        }
    }

    /// True when the two intervals share a span of positive length.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.overlap_duration(other) > Duration::zero()
    }

    /// Fraction of this interval covered by `other`.
    ///
    /// Returns `None` for a degenerate receiver, which has no duration to
    /// divide by.
    pub fn percent_overlapped(&self, other: &TimeInterval) -> Option<f64> {
        if self.is_instant() {
            return None;
        }
        Some(seconds(self.overlap_duration(other)) / seconds(self.duration()))
    }

    /// The shared part of both intervals, if it has positive length.
    pub fn intersection(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let lo = self.start.max(other.start);
        let hi = self.end.min(other.end);
        (hi > lo).then_some(TimeInterval { start: lo, end: hi })
    }

    /// Parse `start/end`, or a single timestamp as an instant.
    pub fn parse(s: &str) -> GridResult<Self> {
        match s.split_once('/') {
            Some((start, end)) => Self::new(parse_time(start.trim())?, parse_time(end.trim())?),
            None => Ok(Self::instant(parse_time(s.trim())?)),
        }
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Parse an ISO 8601 timestamp. Naive timestamps and dates are taken as UTC.
pub fn parse_time(s: &str) -> GridResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(GridError::InvalidTime(s.to_string()))
}

fn seconds(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

fn minutes(d: Duration) -> f64 {
    seconds(d) / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    fn span(h0: u32, m0: u32, h1: u32, m1: u32) -> TimeInterval {
        TimeInterval::new(at(h0, m0), at(h1, m1)).unwrap()
    }

    #[test]
    fn test_rejects_reversed_interval() {
        assert!(TimeInterval::new(at(2, 0), at(1, 0)).is_err());
        assert!(TimeInterval::new(at(1, 0), at(1, 0)).is_ok());
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let reversed = r#"{"start":"2024-01-15T03:00:00Z","end":"2024-01-15T01:00:00Z"}"#;
        let err = serde_json::from_str::<TimeInterval>(reversed).unwrap_err();
        assert!(err.to_string().contains("precedes start"));

        let json = serde_json::to_string(&span(1, 0, 3, 0)).unwrap();
        let parsed: TimeInterval = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, span(1, 0, 3, 0));
    }

    #[test]
    fn test_overlap_duration() {
        let a = span(1, 0, 3, 0);
        let b = span(2, 30, 5, 0);
        assert_eq!(a.overlap_duration(&b), Duration::minutes(30));
        assert_eq!(b.overlap_duration(&a), Duration::minutes(30));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        let a = span(1, 0, 2, 0);
        let b = span(2, 0, 3, 0);
        assert_eq!(a.overlap_duration(&b), Duration::zero());
        assert!(!a.overlaps(&b));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_percent_overlapped() {
        let record = span(2, 0, 4, 0);
        let query = span(3, 0, 6, 0);
        assert!((record.percent_overlapped(&query).unwrap() - 0.5).abs() < 1e-12);
        assert!(TimeInterval::instant(at(3, 0)).percent_overlapped(&query).is_none());
    }

    #[test]
    fn test_contains_is_half_open() {
        let a = span(1, 0, 2, 0);
        assert!(a.contains(at(1, 0)));
        assert!(a.contains(at(1, 59)));
        assert!(!a.contains(at(2, 0)));

        let inst = TimeInterval::instant(at(1, 0));
        assert!(inst.contains(at(1, 0)));
        assert!(!inst.contains(at(1, 1)));
    }

    #[test]
    fn test_ordering_by_start_then_end() {
        let mut v = vec![span(2, 0, 3, 0), span(1, 0, 4, 0), span(1, 0, 2, 0)];
        v.sort();
        assert_eq!(v, vec![span(1, 0, 2, 0), span(1, 0, 4, 0), span(2, 0, 3, 0)]);
    }

    #[test]
    fn test_duration_minutes() {
        assert!((span(1, 30, 3, 0).duration_minutes() - 90.0).abs() < 1e-12);
        assert!(TimeInterval::instant(at(1, 0)).is_instant());
    }

    #[test]
    fn test_parse_interval() {
        let i = TimeInterval::parse("2024-01-15T01:00:00Z/2024-01-15T03:00:00Z").unwrap();
        assert_eq!(i, span(1, 0, 3, 0));

        let inst = TimeInterval::parse("2024-01-15T01:00:00").unwrap();
        assert!(inst.is_instant());
        assert_eq!(inst.start(), at(1, 0));

        assert!(TimeInterval::parse("2024-01-15T03:00:00Z/2024-01-15T01:00:00Z").is_err());
        assert!(TimeInterval::parse("yesterday").is_err());
    }

    #[test]
    fn test_parse_date_only() {
        let t = parse_time("2024-01-15").unwrap();
        assert_eq!(t, at(0, 0));
    }
}
