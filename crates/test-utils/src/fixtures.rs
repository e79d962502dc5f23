//! Common test fixtures for temporal grid tests.
//!
//! All fixture times fall on 2024-01-15 UTC so hour/minute arguments read
//! directly as wall-clock positions in a test.

use chrono::{DateTime, Duration, TimeZone, Utc};
use grid_common::{GridSpec, TimeInterval};

/// No-data sentinel used by fixture grids.
pub const NO_DATA: f32 = -9999.0;

/// Midnight of the fixture day.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

/// A time on the fixture day, `h` hours and `m` minutes after midnight.
///
/// Hours past 23 roll into the next day.
pub fn hour(h: u32, m: u32) -> DateTime<Utc> {
    base_time() + Duration::hours(h as i64) + Duration::minutes(m as i64)
}

/// `[hour(h0, m0), hour(h1, m1))`.
pub fn hour_span(h0: u32, m0: u32, h1: u32, m1: u32) -> TimeInterval {
    TimeInterval::new(hour(h0, m0), hour(h1, m1)).expect("fixture span must be ordered")
}

/// Common grid specifications for testing.
pub mod spec {
    use super::GridSpec;

    /// 2x2 north-up grid with 2 km cells, the default fixture shape.
    pub fn small() -> GridSpec {
        GridSpec::new(2, 2, 2000.0, -2000.0, -2_000_000.0, 3_000_000.0)
            .with_crs("EPSG:5070")
    }

    /// 10x10 grid, useful for value-pattern checks.
    pub fn simple_10x10() -> GridSpec {
        GridSpec::new(10, 10, 1.0, -1.0, -10.0, 10.0).with_crs("EPSG:4326")
    }

    /// 256x256 grid, for exercising the parallel cell path.
    pub fn tile_256() -> GridSpec {
        GridSpec::new(256, 256, 1000.0, -1000.0, 0.0, 0.0).with_crs("EPSG:5070")
    }
}
