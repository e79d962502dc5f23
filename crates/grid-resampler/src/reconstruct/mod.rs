//! Pure functions that turn contributing grids into one output grid.
//!
//! Every output cell depends only on the same cell of the inputs, and any
//! contributing no-data cell makes the output cell no-data. Output grids
//! copy all metadata from a base grid and carry the requested time bounds.
//!
//! Large grids are filled with rayon; the result is the same either way.

mod envelope;
mod instantaneous;
mod weighted;

pub use envelope::envelope;
pub use instantaneous::{integrate_instantaneous, interpolate_point};
pub use weighted::{accumulate, average, weighted_sum};

use rayon::prelude::*;

/// Compute `len` cells with `cell`, in parallel once `len >= parallel_min_cells`.
pub(crate) fn fill_cells<F>(len: usize, parallel_min_cells: usize, cell: F) -> Vec<f32>
where
    F: Fn(usize) -> f32 + Sync + Send,
{
    if len >= parallel_min_cells.max(1) {
        (0..len).into_par_iter().map(cell).collect()
    } else {
        (0..len).map(cell).collect()
    }
}
