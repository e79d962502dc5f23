//! Immutable raster samples and their spatial specification.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::{GridError, GridResult};
use crate::time::TimeInterval;

/// Spatial layout of a regular grid.
///
/// Terminus coordinates are always derived from origin, cell size and
/// dimensions; they are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of columns
    pub nx: usize,
    /// Number of rows
    pub ny: usize,
    /// Cell width in CRS units
    pub dx: f64,
    /// Cell height in CRS units (negative for north-up rasters)
    pub dy: f64,
    /// X coordinate of the first cell corner
    pub origin_x: f64,
    /// Y coordinate of the first cell corner
    pub origin_y: f64,
    /// Opaque coordinate reference description (WKT, EPSG code, ...)
    pub crs: String,
}

impl GridSpec {
    /// Create a new grid specification with an empty CRS.
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64, origin_x: f64, origin_y: f64) -> Self {
        Self {
            nx,
            ny,
            dx,
            dy,
            origin_x,
            origin_y,
            crs: String::new(),
        }
    }

    /// Set the coordinate reference description.
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn terminus_x(&self) -> f64 {
        self.origin_x + self.dx * self.nx as f64
    }

    pub fn terminus_y(&self) -> f64 {
        self.origin_y + self.dy * self.ny as f64
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    /// Check if grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.nx == 0 || self.ny == 0
    }

    /// Row-major flat index for (col, row).
    pub fn flat_index(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.nx || row >= self.ny {
            return None;
        }
        Some(row * self.nx + col)
    }

    /// True when both grids can be combined cell by cell.
    pub fn same_shape(&self, other: &GridSpec) -> bool {
        self == other
    }
}

/// One timestamped raster sample.
///
/// Grids are never mutated once built. Derived grids (the output of a
/// window query) are created with [`Grid::with_data`], which copies every
/// unchanged field. Cell values are shared behind an `Arc`, so cloning a
/// grid is cheap.
#[derive(Debug, Clone)]
pub struct Grid {
    name: String,
    spec: GridSpec,
    data: Arc<[f32]>,
    no_data: f32,
    units: String,
    interval: TimeInterval,
    data_type: DataType,
}

impl Grid {
    /// Create a new grid, checking that `data` holds exactly `nx * ny` values.
    pub fn new(
        spec: GridSpec,
        data: Vec<f32>,
        no_data: f32,
        units: impl Into<String>,
        interval: TimeInterval,
        data_type: DataType,
    ) -> GridResult<Self> {
        if data.len() != spec.len() {
            return Err(GridError::DataLength {
                nx: spec.nx,
                ny: spec.ny,
                actual: data.len(),
            });
        }

        Ok(Self {
            name: String::new(),
            spec,
            data: data.into(),
            no_data,
            units: units.into(),
            interval,
            data_type,
        })
    }

    /// Set the parameter name (e.g. "PRECIP-INC").
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build a derived grid that keeps all metadata but substitutes the
    /// values and the time bounds.
    pub fn with_data(&self, data: Vec<f32>, interval: TimeInterval) -> GridResult<Self> {
        if data.len() != self.spec.len() {
            return Err(GridError::DataLength {
                nx: self.spec.nx,
                ny: self.spec.ny,
                actual: data.len(),
            });
        }

        Ok(Self {
            name: self.name.clone(),
            spec: self.spec.clone(),
            data: data.into(),
            no_data: self.no_data,
            units: self.units.clone(),
            interval,
            data_type: self.data_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn nx(&self) -> usize {
        self.spec.nx
    }

    pub fn ny(&self) -> usize {
        self.spec.ny
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn no_data(&self) -> f32 {
        self.no_data
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn interval(&self) -> TimeInterval {
        self.interval
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn terminus_x(&self) -> f64 {
        self.spec.terminus_x()
    }

    pub fn terminus_y(&self) -> f64 {
        self.spec.terminus_y()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at (col, row), or `None` outside the grid.
    pub fn value(&self, col: usize, row: usize) -> Option<f32> {
        self.spec.flat_index(col, row).map(|i| self.data[i])
    }

    /// Both the sentinel and NaN count as no-data.
    pub fn is_no_data(&self, value: f32) -> bool {
        value.is_nan() || value == self.no_data
    }

    /// Whether flat cell `i` holds no-data, or `None` outside the grid.
    pub fn is_no_data_at(&self, i: usize) -> Option<bool> {
        self.data.get(i).map(|&v| self.is_no_data(v))
    }

    /// Cellwise equality where two no-data cells are equal.
    pub fn data_equals(&self, other: &Grid) -> bool {
        if self.data.len() != other.data.len() {
            return false;
        }

        self.data.iter().zip(other.data.iter()).all(|(&a, &b)| {
            let a_missing = self.is_no_data(a);
            let b_missing = other.is_no_data(b);
            if a_missing || b_missing {
                a_missing && b_missing
            } else {
                a == b
            }
        })
    }
}
