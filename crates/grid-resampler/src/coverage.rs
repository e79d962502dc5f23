//! Choosing which period records cover a query window.
//!
//! Candidates are tried shortest first so the finest available resolution
//! wins when records of several lengths overlap (hourly records are used in
//! preference to a daily total). A record is accepted only if it starts at
//! or before the covered edge and extends it. Each accepted record is
//! charged only for the part of the window it newly covers, so records that
//! overlap each other are never counted twice.

use grid_common::TimeInterval;

/// One record chosen to cover part of a query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageSegment {
    /// Record index in the source sequence.
    pub record: usize,
    /// The record's own valid interval.
    pub interval: TimeInterval,
    /// The part of the query window this record accounts for.
    pub segment: TimeInterval,
}

/// Select records that cover `query` without gaps.
///
/// Returns `None` if the window cannot be fully covered. Segments come back
/// in time order and tile the window exactly.
pub fn select_coverage(
    candidates: &[(usize, TimeInterval)],
    query: &TimeInterval,
) -> Option<Vec<CoverageSegment>> {
    let mut ordered: Vec<&(usize, TimeInterval)> = candidates.iter().collect();
    ordered.sort_by_key(|(record, interval)| (interval.duration(), interval.start(), *record));

    let mut used = vec![false; ordered.len()];
    let mut segments = Vec::new();
    let mut covered = query.start();

    while covered < query.end() {
        let next = ordered.iter().enumerate().find(|(i, (_, interval))| {
            !used[*i] && interval.start() <= covered && interval.end() > covered
        });

        let (i, &&(record, interval)) = next?;
        used[i] = true;

        let segment_end = interval.end().min(query.end());
        let segment = TimeInterval::new(covered, segment_end).ok()?;
        segments.push(CoverageSegment {
            record,
            interval,
            segment,
        });
        covered = segment_end;
    }

    Some(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::hour_span;

    fn hourly(n: u32) -> Vec<(usize, TimeInterval)> {
        (1..=n)
            .map(|h| ((h - 1) as usize, hour_span(h, 0, h + 1, 0)))
            .collect()
    }

    fn records(segments: &[CoverageSegment]) -> Vec<usize> {
        segments.iter().map(|s| s.record).collect()
    }

    #[test]
    fn test_consecutive_records() {
        let selected = select_coverage(&hourly(5), &hour_span(2, 30, 5, 30)).unwrap();
        assert_eq!(records(&selected), vec![1, 2, 3, 4]);
        assert_eq!(selected[0].segment, hour_span(2, 30, 3, 0));
        assert_eq!(selected[3].segment, hour_span(5, 0, 5, 30));
    }

    #[test]
    fn test_gap_is_not_covered() {
        let mut candidates = hourly(5);
        candidates.remove(2);
        assert!(select_coverage(&candidates, &hour_span(2, 0, 5, 0)).is_none());
    }

    #[test]
    fn test_prefers_shortest_records() {
        let mut candidates = vec![(5, hour_span(0, 0, 6, 0))];
        candidates.extend(hourly(5));
        let selected = select_coverage(&candidates, &hour_span(1, 0, 3, 0)).unwrap();
        assert_eq!(records(&selected), vec![0, 1]);
    }

    #[test]
    fn test_falls_back_to_longer_record_for_gap() {
        // Hourly records with hour 3 missing, plus one six-hour record.
        let mut candidates: Vec<_> = hourly(5).into_iter().filter(|(r, _)| *r != 2).collect();
        candidates.push((9, hour_span(0, 0, 6, 0)));

        let selected = select_coverage(&candidates, &hour_span(1, 0, 6, 0)).unwrap();
        assert_eq!(records(&selected), vec![0, 1, 9]);
        assert_eq!(selected[2].segment, hour_span(3, 0, 6, 0));
    }

    #[test]
    fn test_overlapping_records_split_window() {
        let candidates = vec![(0, hour_span(0, 0, 2, 0)), (1, hour_span(1, 0, 3, 0))];
        let selected = select_coverage(&candidates, &hour_span(0, 0, 3, 0)).unwrap();
        assert_eq!(records(&selected), vec![0, 1]);
        assert_eq!(selected[1].segment, hour_span(2, 0, 3, 0));
    }

    #[test]
    fn test_empty_candidates() {
        assert!(select_coverage(&[], &hour_span(1, 0, 2, 0)).is_none());
        assert_eq!(select_coverage(&[], &hour_span(1, 0, 1, 0)), Some(vec![]));
    }
}
