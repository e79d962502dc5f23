//! Shared test utilities for the temporal grid workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic record sequences (hourly accumulations, instant samples)
//! - Grid value generators
//! - Common fixtures (times, grid specs)
//! - Test logging setup
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{hourly_records, hour, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a fmt subscriber for test output, honouring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that every cell of a grid is approximately `expected`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_grid_uniform;
///
/// assert_grid_uniform!(grid, 57.5, 1e-4);
/// ```
#[macro_export]
macro_rules! assert_grid_uniform {
    ($grid:expr, $expected:expr, $epsilon:expr) => {{
        for (i, value) in $grid.data().iter().enumerate() {
            let diff = (*value as f64 - $expected as f64).abs();
            if diff > $epsilon as f64 {
                panic!(
                    "assertion failed: cell {} = {:?}, expected {:?} (epsilon {:?})",
                    i, value, $expected, $epsilon
                );
            }
        }
    }};
}
