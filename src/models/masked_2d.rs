//! Convection-diffusion over a masked farm grid
//!
//! # Equation
//!
//! ```text
//! ∂C/∂t = D·(∂²C/∂x² + ∂²C/∂y²) − u·∂C/∂x − v·∂C/∂y + source(x, y)
//! ```
//!
//! Central differences in space on a `rows × cols` grid. The model returns
//! dC/dt for the whole field; the border cells and the cells excluded by the
//! [`InclusionMask`] get a zero rate, so a forward Euler step leaves them
//! exactly as they were. Paired with [`EulerSolver`](crate::solver::EulerSolver)
//! this is the classic FTCS scheme.
//!
//! The rate field is computed entirely from the previous layer. With the
//! `parallel` feature and a grid above
//! [`parallel_threshold`](crate::solver::parallel_threshold) cells, columns
//! are computed concurrently; each worker writes its own column and reads the
//! shared, immutable previous layer.

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::FieldParameters;
use crate::error::{Result, SimulationError};
use crate::models::InclusionMask;
use crate::physics::operators::{StencilCoefficients, ftcs_rate, is_interior};
use crate::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};
use crate::solver::parallel_threshold;

/// 2D masked convection-diffusion model
#[derive(Clone, Debug)]
pub struct MaskedConvectionDiffusion2D {
    coefficients: StencilCoefficients,
    /// Persistent source rate per cell
    source: DMatrix<f64>,
    mask: InclusionMask,
    /// Field at t = 0
    initial: DMatrix<f64>,
}

impl MaskedConvectionDiffusion2D {
    /// Create the model
    ///
    /// `source`, `mask` and `initial` must all have shape
    /// `params.rows × params.cols`. A missing `initial` field means clean soil.
    /// Only the grid and coefficients of `params` are checked here; stability
    /// depends on the time step and is checked by
    /// [`FieldParameters::validate`].
    pub fn new(
        params: &FieldParameters,
        source: DMatrix<f64>,
        mask: InclusionMask,
        initial: Option<DMatrix<f64>>,
    ) -> Result<Self> {
        let (rows, cols) = (params.rows, params.cols);
        if rows < 3 || cols < 3 {
            return Err(SimulationError::invalid(
                "grid",
                format!("need at least 3x3 cells, got {}x{}", rows, cols),
            ));
        }

        check_field("source", &source, rows, cols)?;
        mask.check_shape(rows, cols)?;
        let initial = initial.unwrap_or_else(|| DMatrix::zeros(rows, cols));
        check_field("initial", &initial, rows, cols)?;

        Ok(Self {
            coefficients: params.coefficients(),
            source,
            mask,
            initial,
        })
    }

    pub fn rows(&self) -> usize {
        self.initial.nrows()
    }

    pub fn cols(&self) -> usize {
        self.initial.ncols()
    }

    pub fn mask(&self) -> &InclusionMask {
        &self.mask
    }

    pub fn source(&self) -> &DMatrix<f64> {
        &self.source
    }

    /// Rate dC/dt of every cell, zero on the border and on excluded cells
    pub fn rate(&self, field: &DMatrix<f64>) -> DMatrix<f64> {
        let (rows, cols) = field.shape();
        let mut rate = DMatrix::zeros(rows, cols);

        if rows * cols > parallel_threshold() {
            #[cfg(feature = "parallel")]
            rate.as_mut_slice()
                .par_chunks_mut(rows)
                .enumerate()
                .for_each(|(j, column)| self.fill_column(field, j, column));
            #[cfg(not(feature = "parallel"))]
            self.fill_sequential(field, &mut rate);
        } else {
            self.fill_sequential(field, &mut rate);
        }

        rate
    }

    fn fill_sequential(&self, field: &DMatrix<f64>, rate: &mut DMatrix<f64>) {
        let rows = field.nrows();
        for (j, column) in rate.as_mut_slice().chunks_mut(rows).enumerate() {
            self.fill_column(field, j, column);
        }
    }

    /// Column `j` of the rate field (nalgebra storage is column-major)
    fn fill_column(&self, field: &DMatrix<f64>, j: usize, column: &mut [f64]) {
        let (rows, cols) = field.shape();
        for (i, value) in column.iter_mut().enumerate() {
            if is_interior(i, j, rows, cols) && self.mask.is_included(i, j) {
                *value = ftcs_rate(field, i, j, self.source[(i, j)], &self.coefficients);
            }
        }
    }
}

fn check_field(name: &'static str, field: &DMatrix<f64>, rows: usize, cols: usize) -> Result<()> {
    if field.shape() != (rows, cols) {
        return Err(SimulationError::invalid(
            name,
            format!(
                "shape {}x{} does not match the {}x{} grid",
                field.nrows(),
                field.ncols(),
                rows,
                cols
            ),
        ));
    }
    if field.iter().any(|v| !v.is_finite()) {
        return Err(SimulationError::invalid(name, "must contain finite values only"));
    }
    Ok(())
}

impl PhysicalModel for MaskedConvectionDiffusion2D {
    fn points(&self) -> usize {
        self.initial.len()
    }

    /// # Panics
    ///
    /// Panics when `state` carries no 2D concentration field.
    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
        let field = state
            .get(PhysicalQuantity::Concentration)
            .and_then(PhysicalData::try_as_matrix)
            .expect("Concentration field is required");

        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::Matrix(self.rate(field)),
        )
    }

    fn setup_initial_state(&self) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::Matrix(self.initial.clone()),
        )
    }

    fn name(&self) -> &str {
        "Masked convection-diffusion 2D"
    }

    fn description(&self) -> Option<&str> {
        Some("Farm grid, central differences in space, frozen border and excluded cells")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::ThresholdGuard;
    use approx::assert_relative_eq;

    fn params(rows: usize, cols: usize) -> FieldParameters {
        FieldParameters {
            rows,
            cols,
            ..FieldParameters::default()
        }
    }

    #[test]
    fn test_border_and_masked_rates_are_zero() {
        let p = params(5, 5);
        let source = DMatrix::from_element(5, 5, 1.0);
        let mask = InclusionMask::all_included(5, 5).exclude_rect(2..3, 2..3);
        let model = MaskedConvectionDiffusion2D::new(&p, source, mask, None).unwrap();

        let rate = model.rate(&DMatrix::zeros(5, 5));

        for i in 0..5 {
            for j in 0..5 {
                let expected = if is_interior(i, j, 5, 5) && (i, j) != (2, 2) { 1.0 } else { 0.0 };
                assert_eq!(rate[(i, j)], expected, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_excluded_cell_is_still_read_by_neighbours() {
        let p = FieldParameters {
            diffusion: 1.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            ..params(5, 5)
        };
        let mask = InclusionMask::all_included(5, 5).exclude_rect(2..3, 2..3);
        let model = MaskedConvectionDiffusion2D::new(&p, DMatrix::zeros(5, 5), mask, None).unwrap();

        let mut field = DMatrix::zeros(5, 5);
        field[(2, 2)] = 4.0;
        let rate = model.rate(&field);

        assert_eq!(rate[(2, 2)], 0.0);
        assert_relative_eq!(rate[(1, 2)], 4.0);
        assert_relative_eq!(rate[(2, 3)], 4.0);
    }

    #[test]
    fn test_parallel_and_sequential_paths_agree() {
        let p = params(12, 9);
        let source = DMatrix::from_fn(12, 9, |i, j| (i * j) as f64 * 0.1);
        let field = DMatrix::from_fn(12, 9, |i, j| ((i + 2 * j) % 5) as f64);
        let model =
            MaskedConvectionDiffusion2D::new(&p, source, InclusionMask::all_included(12, 9), None)
                .unwrap();

        let sequential = model.rate(&field);
        let threaded = {
            let _guard = ThresholdGuard::save(1);
            model.rate(&field)
        };

        assert_eq!(sequential, threaded);
    }

    #[test]
    fn test_shape_checks() {
        let p = params(4, 4);
        let good = DMatrix::zeros(4, 4);
        let mask = InclusionMask::all_included(4, 4);

        assert!(MaskedConvectionDiffusion2D::new(&p, DMatrix::zeros(3, 4), mask.clone(), None).is_err());
        assert!(
            MaskedConvectionDiffusion2D::new(&p, good.clone(), InclusionMask::all_included(4, 3), None)
                .is_err()
        );
        assert!(
            MaskedConvectionDiffusion2D::new(&p, good.clone(), mask.clone(), Some(DMatrix::zeros(2, 2)))
                .is_err()
        );
        assert!(MaskedConvectionDiffusion2D::new(&params(2, 4), good, mask, None).is_err());
    }

    #[test]
    fn test_initial_state_and_points() {
        let p = params(3, 4);
        let mut initial = DMatrix::zeros(3, 4);
        initial[(1, 1)] = 2.0;
        let model = MaskedConvectionDiffusion2D::new(
            &p,
            DMatrix::zeros(3, 4),
            InclusionMask::all_included(3, 4),
            Some(initial.clone()),
        )
        .unwrap();

        assert_eq!(model.points(), 12);
        assert_eq!(
            model.setup_initial_state().get(PhysicalQuantity::Concentration).unwrap().as_matrix(),
            &initial
        );
    }
}
