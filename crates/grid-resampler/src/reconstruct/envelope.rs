//! Cellwise minimum and maximum across contributing grids.

use grid_common::{Grid, TimeInterval};
use tracing::warn;

use super::fill_cells;

/// Cellwise (min, max) over `grids`.
///
/// Unlike the reconstructions, no-data cells are skipped; a cell is no-data
/// only when every grid is missing there.
pub fn envelope(grids: &[Grid], interval: TimeInterval, parallel_min_cells: usize) -> Option<(Grid, Grid)> {
    let base = grids.first()?;
    let len = base.len();
    if grids.iter().any(|g| g.len() != len) {
        warn!("Envelope grids differ in size");
        return None;
    }

    let no_data = base.no_data();
    let extreme = |pick_max: bool| {
        fill_cells(len, parallel_min_cells, |i| {
            grids
                .iter()
                .map(|g| (g, g.data()[i]))
                .filter(|(g, v)| !g.is_no_data(*v))
                .map(|(_, v)| v)
                .reduce(|a, b| if pick_max { a.max(b) } else { a.min(b) })
                .unwrap_or(no_data)
        })
    };

    let min = base.with_data(extreme(false), interval).ok()?;
    let max = base.with_data(extreme(true), interval).ok()?;
    Some((min, max))
}
