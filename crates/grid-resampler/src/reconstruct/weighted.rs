//! Weighted combination of period records.

use grid_common::{Grid, TimeInterval};
use tracing::warn;

use super::fill_cells;
use crate::coverage::CoverageSegment;

/// `Σ value_i × weight_i` per cell, with no-data infecting the result.
///
/// Metadata is copied from the first contribution. `None` when there is
/// nothing to combine or the grids disagree in size.
pub fn weighted_sum(
    contributions: &[(Grid, f64)],
    interval: TimeInterval,
    parallel_min_cells: usize,
) -> Option<Grid> {
    let (base, _) = contributions.first()?;
    let len = base.len();
    if contributions.iter().any(|(g, _)| g.len() != len) {
        warn!("Contributing grids differ in size, cannot combine");
        return None;
    }

    let no_data = base.no_data();
    let data = fill_cells(len, parallel_min_cells, |i| {
        let mut total = 0.0f64;
        for (grid, weight) in contributions {
            let value = grid.data()[i];
            if grid.is_no_data(value) {
                return no_data;
            }
            total += value as f64 * weight;
        }
        total as f32
    });

    base.with_data(data, interval).ok()
}

/// Accumulated total over `query`.
///
/// Each record contributes the fraction of its own accumulation that falls
/// inside the segment it covers: an hourly total covering half an hour of
/// the window contributes half its value.
pub fn accumulate(
    parts: &[(Grid, CoverageSegment)],
    query: &TimeInterval,
    parallel_min_cells: usize,
) -> Option<Grid> {
    let contributions: Vec<(Grid, f64)> = parts
        .iter()
        .map(|(grid, seg)| {
            let weight = seg.interval.percent_overlapped(&seg.segment).unwrap_or(0.0);
            (grid.clone(), weight)
        })
        .collect();

    weighted_sum(&contributions, *query, parallel_min_cells)
}

/// Time-weighted mean over `query`.
///
/// Each record is weighted by the share of the query window it covers.
pub fn average(
    parts: &[(Grid, CoverageSegment)],
    query: &TimeInterval,
    parallel_min_cells: usize,
) -> Option<Grid> {
    let window = query.duration().num_milliseconds() as f64;
    if window <= 0.0 {
        return None;
    }

    let contributions: Vec<(Grid, f64)> = parts
        .iter()
        .map(|(grid, seg)| {
            let weight = seg.segment.duration().num_milliseconds() as f64 / window;
            (grid.clone(), weight)
        })
        .collect();

    weighted_sum(&contributions, *query, parallel_min_cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_common::DataType;
    use test_utils::{assert_grid_uniform, constant_grid, hour_span, NO_DATA};

    fn part(value: f32, record: (u32, u32), segment: (u32, u32, u32, u32)) -> (Grid, CoverageSegment) {
        let interval = hour_span(record.0, 0, record.1, 0);
        let grid = constant_grid(value, DataType::Accumulation, interval);
        let seg = CoverageSegment {
            record: 0,
            interval,
            segment: hour_span(segment.0, segment.1, segment.2, segment.3),
        };
        (grid, seg)
    }

    #[test]
    fn test_accumulate_partial_records() {
        let parts = vec![part(20.0, (1, 2), (1, 30, 2, 0)), part(20.0, (2, 3), (2, 0, 3, 0))];
        let out = accumulate(&parts, &hour_span(1, 30, 3, 0), usize::MAX).unwrap();
        assert_grid_uniform!(out, 30.0, 1e-5);
        assert_eq!(out.interval(), hour_span(1, 30, 3, 0));
    }

    #[test]
    fn test_average_partial_records() {
        let parts = vec![part(5.0, (1, 2), (1, 30, 2, 0)), part(2.0, (2, 3), (2, 0, 3, 0))];
        let out = average(&parts, &hour_span(1, 30, 3, 0), usize::MAX).unwrap();
        // 0.5h at 5 and 1h at 2 over 1.5h
        assert_grid_uniform!(out, 3.0, 1e-5);
    }

    #[test]
    fn test_no_data_is_infectious() {
        let interval = hour_span(1, 0, 2, 0);
        let a = constant_grid(1.0, DataType::Accumulation, interval);
        let b = a.with_data(vec![1.0, NO_DATA, f32::NAN, 1.0], interval).unwrap();

        let out = weighted_sum(&[(a, 0.5), (b, 0.5)], interval, usize::MAX).unwrap();
        assert_eq!(out.data()[0], 1.0);
        assert_eq!(out.is_no_data_at(1), Some(true));
        assert_eq!(out.is_no_data_at(2), Some(true));
        assert_eq!(out.data()[1], NO_DATA);
        assert_eq!(out.data()[3], 1.0);
    }

    #[test]
    fn test_nothing_to_combine() {
        assert!(weighted_sum(&[], hour_span(1, 0, 2, 0), usize::MAX).is_none());
        assert!(average(&[], &hour_span(1, 0, 1, 0), usize::MAX).is_none());
    }
}
