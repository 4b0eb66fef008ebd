//! Inclusion mask of the farm grid
//!
//! A boolean matrix with the shape of the concentration field. Included cells
//! are updated by the 2D scheme; excluded cells (outside the farm, buildings,
//! ponds) keep their value for the whole run, while their neighbours still
//! read it.
//!
//! Masks usually come from shapes drawn on a map. [`InclusionMask::from_polygons`]
//! rasterises such shapes by testing the centre of every cell.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Polygon as a list of `(x, y)` vertices, implicitly closed
pub type Polygon = Vec<(f64, f64)>;

/// Physical rectangle covered by the grid
///
/// Row `i` spans x in `[x_min + i·Δx, x_min + (i+1)·Δx]` with
/// `Δx = (x_max − x_min) / rows`, and likewise for columns along y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridExtent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl GridExtent {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Centre of cell `(row, col)` on a `rows × cols` grid
    pub fn cell_centre(&self, row: usize, col: usize, rows: usize, cols: usize) -> (f64, f64) {
        let dx = (self.x_max - self.x_min) / rows as f64;
        let dy = (self.y_max - self.y_min) / cols as f64;
        (
            self.x_min + (row as f64 + 0.5) * dx,
            self.y_min + (col as f64 + 0.5) * dy,
        )
    }

    fn validate(&self) -> Result<()> {
        let finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.x_max <= self.x_min || self.y_max <= self.y_min {
            return Err(SimulationError::invalid(
                "extent",
                format!("{:?} is not a non-empty finite rectangle", self),
            ));
        }
        Ok(())
    }
}

/// Even-odd rule point-in-polygon test
pub fn contains_point(polygon: &[(f64, f64)], point: (f64, f64)) -> bool {
    let (px, py) = point;
    let mut inside = false;
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Which cells of the field take part in the simulation
///
/// # Example
///
/// ```rust
/// use fern_rs::models::InclusionMask;
///
/// let mask = InclusionMask::all_included(10, 10).exclude_rect(0..5, 0..10);
///
/// assert!(!mask.is_included(2, 3));
/// assert!(mask.is_included(7, 3));
/// assert_eq!(mask.included_count(), 50);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InclusionMask {
    cells: DMatrix<bool>,
}

impl InclusionMask {
    /// Every cell included
    pub fn all_included(rows: usize, cols: usize) -> Self {
        Self {
            cells: DMatrix::from_element(rows, cols, true),
        }
    }

    /// Wrap an existing boolean matrix
    pub fn from_matrix(cells: DMatrix<bool>) -> Self {
        Self { cells }
    }

    /// Build from a predicate on `(row, col)`
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        Self {
            cells: DMatrix::from_fn(rows, cols, |i, j| f(i, j)),
        }
    }

    /// Exclude a rectangle of cells; ranges are clamped to the grid
    pub fn exclude_rect(
        mut self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> Self {
        let row_end = rows.end.min(self.cells.nrows());
        let col_end = cols.end.min(self.cells.ncols());
        for i in rows.start..row_end {
            for j in cols.start..col_end {
                self.cells[(i, j)] = false;
            }
        }
        self
    }

    /// Rasterise drawn shapes onto a `rows × cols` grid covering `extent`
    ///
    /// A cell is included when its centre lies inside at least one `include`
    /// polygon (or `include` is empty) and inside no `exclude` polygon.
    pub fn from_polygons(
        rows: usize,
        cols: usize,
        extent: GridExtent,
        include: &[Polygon],
        exclude: &[Polygon],
    ) -> Result<Self> {
        extent.validate()?;
        if let Some(polygon) = include.iter().chain(exclude).find(|p| p.len() < 3) {
            return Err(SimulationError::invalid(
                "polygon",
                format!("needs at least 3 vertices, got {}", polygon.len()),
            ));
        }

        Ok(Self::from_fn(rows, cols, |i, j| {
            let centre = extent.cell_centre(i, j, rows, cols);
            let inside = include.is_empty() || include.iter().any(|p| contains_point(p, centre));
            inside && !exclude.iter().any(|p| contains_point(p, centre))
        }))
    }

    pub fn is_included(&self, row: usize, col: usize) -> bool {
        self.cells[(row, col)]
    }

    pub fn nrows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.cells.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    /// Number of included cells
    pub fn included_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn as_matrix(&self) -> &DMatrix<bool> {
        &self.cells
    }

    /// Fail unless the mask has shape `rows × cols`
    pub fn check_shape(&self, rows: usize, cols: usize) -> Result<()> {
        if self.shape() != (rows, cols) {
            return Err(SimulationError::invalid(
                "mask",
                format!(
                    "shape {}x{} does not match the {}x{} grid",
                    self.nrows(),
                    self.ncols(),
                    rows,
                    cols
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
        ]
    }

    #[test]
    fn test_contains_point() {
        let polygon = square(0.0, 0.0, 1.0);
        assert!(contains_point(&polygon, (0.5, 0.5)));
        assert!(!contains_point(&polygon, (1.5, 0.5)));
        assert!(!contains_point(&[(0.0, 0.0), (1.0, 1.0)], (0.5, 0.5)));
    }

    #[test]
    fn test_from_fn_and_count() {
        let mask = InclusionMask::from_fn(4, 4, |i, j| i == j);
        assert_eq!(mask.included_count(), 4);
        assert!(mask.is_included(2, 2));
        assert!(!mask.is_included(2, 1));
    }

    #[test]
    fn test_exclude_rect_is_clamped() {
        let mask = InclusionMask::all_included(3, 3).exclude_rect(2..10, 0..10);
        assert_eq!(mask.included_count(), 6);
    }

    #[test]
    fn test_from_polygons_include_and_exclude() {
        let extent = GridExtent::new(0.0, 10.0, 0.0, 10.0);
        let farm = square(0.0, 0.0, 10.0);
        let pond = square(0.0, 0.0, 5.0);

        let mask = InclusionMask::from_polygons(10, 10, extent, &[farm], &[pond]).unwrap();

        assert_eq!(mask.included_count(), 75);
        assert!(!mask.is_included(1, 1));
        assert!(mask.is_included(7, 1));
    }

    #[test]
    fn test_from_polygons_empty_include_means_everything() {
        let extent = GridExtent::new(0.0, 4.0, 0.0, 4.0);
        let mask = InclusionMask::from_polygons(4, 4, extent, &[], &[]).unwrap();
        assert_eq!(mask.included_count(), 16);
    }

    #[test]
    fn test_from_polygons_rejects_bad_input() {
        let extent = GridExtent::new(0.0, 0.0, 0.0, 4.0);
        assert!(InclusionMask::from_polygons(4, 4, extent, &[], &[]).is_err());

        let extent = GridExtent::new(0.0, 4.0, 0.0, 4.0);
        let degenerate = vec![(0.0, 0.0), (1.0, 1.0)];
        assert!(InclusionMask::from_polygons(4, 4, extent, &[degenerate], &[]).is_err());
    }

    #[test]
    fn test_check_shape() {
        let mask = InclusionMask::all_included(3, 4);
        assert!(mask.check_shape(3, 4).is_ok());
        assert!(mask.check_shape(4, 3).is_err());
    }
}
