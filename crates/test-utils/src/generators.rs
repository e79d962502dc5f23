//! Test data generators for creating synthetic record sequences.
//!
//! These generators create predictable, verifiable grids and record
//! sequences that can be used across the test suite.

use grid_common::{DataType, Grid, GridSpec, TimeInterval};

use crate::fixtures::{hour, hour_span, spec, NO_DATA};

/// Creates test grid values with a predictable pattern.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Example
///
/// ```
/// use test_utils::create_test_values;
///
/// let values = create_test_values(10, 5);
/// assert_eq!(values.len(), 50);
/// assert_eq!(values[1], 1000.0); // col=1, row=0
/// assert_eq!(values[10], 1.0);   // col=0, row=1
/// ```
pub fn create_test_values(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates precipitation-like values in mm.
///
/// Deterministic for a given seed. Roughly a quarter of the cells are wet.
pub fn create_precipitation_values(width: usize, height: usize, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            let precip = if hash % 4 == 0 {
                (hash % 5000) as f32 / 100.0
            } else {
                0.0
            };
            data.push(precip);
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
pub fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// A fixture-shaped grid with every cell set to `value`.
pub fn constant_grid(value: f32, data_type: DataType, interval: TimeInterval) -> Grid {
    grid_with_values(spec::small(), vec![value; 4], data_type, interval)
}

/// A grid with explicit values on the given spec.
pub fn grid_with_values(
    spec: GridSpec,
    values: Vec<f32>,
    data_type: DataType,
    interval: TimeInterval,
) -> Grid {
    Grid::new(spec, values, NO_DATA, "MM", interval, data_type)
        .expect("fixture values must match fixture spec")
        .with_name("TEST-VAR")
}

/// Consecutive hourly period records: `values[k]` is valid for
/// `[first_hour + k, first_hour + k + 1)`.
///
/// # Example
///
/// ```
/// use grid_common::DataType;
/// use test_utils::{hour, hourly_records};
///
/// let records = hourly_records(&[20.0, 20.0, 30.0], DataType::Accumulation, 1);
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[2].interval().start(), hour(3, 0));
/// ```
pub fn hourly_records(values: &[f32], data_type: DataType, first_hour: u32) -> Vec<Grid> {
    values
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let h = first_hour + k as u32;
            constant_grid(v, data_type, hour_span(h, 0, h + 1, 0))
        })
        .collect()
}

/// Instantaneous samples: `values[k]` is observed at `first_hour + k`.
pub fn hourly_samples(values: &[f32], first_hour: u32) -> Vec<Grid> {
    values
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let t = hour(first_hour + k as u32, 0);
            constant_grid(v, DataType::Instantaneous, TimeInterval::instant(t))
        })
        .collect()
}
