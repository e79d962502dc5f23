//! Reconstruction of instantaneous signals.
//!
//! Samples are treated as a piecewise-linear signal. A point query
//! interpolates between the two bracketing samples; a window query
//! integrates the signal with the trapezoid rule and divides by the window
//! length, giving its time-weighted mean.

use chrono::{DateTime, Utc};
use grid_common::{Grid, TimeInterval};
use tracing::{debug, error};

use super::fill_cells;

/// Value of the signal at `t` from one or two samples.
///
/// One sample is returned unchanged. Two samples (floor, ceiling) are
/// blended linearly. Anything else is malformed input and yields `None`.
pub fn interpolate_point(samples: &[Grid], t: DateTime<Utc>, parallel_min_cells: usize) -> Option<Grid> {
    match samples {
        [] => None,
        [only] => Some(only.clone()),
        [before, after] => {
            let t0 = before.interval().start();
            let t1 = after.interval().start();
            if t1 <= t0 || t < t0 || t > t1 {
                error!(%t0, %t1, %t, "Point interpolation samples do not bracket the requested time");
                return None;
            }
            if before.len() != after.len() {
                error!("Point interpolation samples differ in size");
                return None;
            }

            let frac = millis(t - t0) / millis(t1 - t0);
            let no_data = before.no_data();
            let data = fill_cells(before.len(), parallel_min_cells, |i| {
                let a = before.data()[i];
                let b = after.data()[i];
                if before.is_no_data(a) || after.is_no_data(b) {
                    return no_data;
                }
                ((1.0 - frac) * a as f64 + frac * b as f64) as f32
            });

            before.with_data(data, TimeInterval::instant(t)).ok()
        }
        _ => {
            error!(samples = samples.len(), "Point interpolation expects at most two samples");
            None
        }
    }
}

/// Part of the window covered by one pair of consecutive samples.
struct PairSpan<'a> {
    first: &'a Grid,
    second: &'a Grid,
    /// Minutes from the first sample to the start of the covered part.
    lo: f64,
    /// Minutes from the first sample to the end of the covered part.
    hi: f64,
    /// Minutes between the two samples.
    gap: f64,
}

/// Time-weighted mean of the piecewise-linear signal over `query`.
///
/// `samples` must be in time order and bracket the window: the first at or
/// before `query.start()`, the last at or after `query.end()`. Where a pair
/// of samples extends past the window, the edge values are found on the
/// line through the pair.
pub fn integrate_instantaneous(
    samples: &[Grid],
    query: &TimeInterval,
    parallel_min_cells: usize,
) -> Option<Grid> {
    let (first, last) = (samples.first()?, samples.last()?);
    if samples.len() < 2 || query.is_instant() {
        debug!(samples = samples.len(), "Not enough samples to integrate window");
        return None;
    }
    if first.interval().start() > query.start() || last.interval().start() < query.end() {
        debug!(%query, "Samples do not bracket the window");
        return None;
    }
    let len = first.len();
    if samples.iter().any(|g| g.len() != len) {
        error!("Instantaneous samples differ in size");
        return None;
    }

    let mut spans = Vec::with_capacity(samples.len() - 1);
    for pair in samples.windows(2) {
        let (t0, t1) = (pair[0].interval().start(), pair[1].interval().start());
        if t1 <= t0 {
            continue;
        }
        let lo = t0.max(query.start());
        let hi = t1.min(query.end());
        if hi <= lo {
            continue;
        }
        spans.push(PairSpan {
            first: &pair[0],
            second: &pair[1],
            lo: minutes(lo - t0),
            hi: minutes(hi - t0),
            gap: minutes(t1 - t0),
        });
    }

    let total = query.duration_minutes();
    let no_data = first.no_data();
    let data = fill_cells(len, parallel_min_cells, |i| {
        let mut area = 0.0f64;
        for span in &spans {
            let a = span.first.data()[i];
            let b = span.second.data()[i];
            if span.first.is_no_data(a) || span.second.is_no_data(b) {
                return no_data;
            }
            let slope = (b as f64 - a as f64) / span.gap;
            let v_lo = a as f64 + slope * span.lo;
            let v_hi = a as f64 + slope * span.hi;
            area += (v_lo + v_hi) / 2.0 * (span.hi - span.lo);
        }
        (area / total) as f32
    });

    first.with_data(data, *query).ok()
}

fn millis(d: chrono::Duration) -> f64 {
    d.num_milliseconds() as f64
}

fn minutes(d: chrono::Duration) -> f64 {
    millis(d) / 60_000.0
}
