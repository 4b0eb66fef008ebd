//! Finite-difference operators
//!
//! Discrete spatial operators shared by the transport models.
//!
//! # 1D operators
//!
//! [`gradient`] follows the usual "numerical gradient" convention:
//!
//! ```text
//! g[0]     = (c[1]   - c[0])   / dx          (forward, first order)
//! g[i]     = (c[i+1] - c[i-1]) / (2 dx)      (central, second order)
//! g[n-1]   = (c[n-1] - c[n-2]) / dx          (backward, first order)
//! ```
//!
//! [`laplacian`] is the gradient of the gradient, so it inherits the same
//! one-sided treatment at both ends of the profile. In the interior it is a
//! five-point stencil with spacing 2dx.
//!
//! # 2D operators
//!
//! [`ftcs_rate`] evaluates the explicit convection-diffusion right-hand side at
//! one interior cell of a `DMatrix` field, reading only the previous layer.

use nalgebra::{DMatrix, DVector};

/// Numerical gradient of a uniformly spaced profile
///
/// Profiles shorter than two points have no defined gradient and yield zeros.
///
/// # Example
///
/// ```rust
/// use fern_rs::physics::operators::gradient;
/// use nalgebra::DVector;
///
/// let c = DVector::from_vec(vec![0.0, 1.0, 4.0, 9.0]);
/// let g = gradient(&c, 1.0);
/// assert_eq!(g.as_slice(), &[1.0, 2.0, 4.0, 5.0]);
/// ```
pub fn gradient(values: &DVector<f64>, dx: f64) -> DVector<f64> {
    let n = values.len();
    let mut out = DVector::zeros(n);
    if n < 2 {
        return out;
    }

    out[0] = (values[1] - values[0]) / dx;
    out[n - 1] = (values[n - 1] - values[n - 2]) / dx;

    let two_dx = 2.0 * dx;
    for i in 1..n - 1 {
        out[i] = (values[i + 1] - values[i - 1]) / two_dx;
    }
    out
}

/// Second derivative as the gradient of the gradient
pub fn laplacian(values: &DVector<f64>, dx: f64) -> DVector<f64> {
    gradient(&gradient(values, dx), dx)
}

/// Coefficients of the explicit 2D convection-diffusion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StencilCoefficients {
    pub diffusion: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl StencilCoefficients {
    /// Diffusion number `dt·D·(1/dx² + 1/dy²)`
    pub fn diffusion_number(&self, dt: f64) -> f64 {
        dt * self.diffusion * (1.0 / (self.dx * self.dx) + 1.0 / (self.dy * self.dy))
    }

    /// Advective Courant number `dt·(|u|/dx + |v|/dy)`
    pub fn courant_number(&self, dt: f64) -> f64 {
        dt * (self.velocity_x.abs() / self.dx + self.velocity_y.abs() / self.dy)
    }
}

/// Right-hand side of the FTCS scheme at interior cell `(i, j)`
///
/// Rows run along x (spacing dx), columns along y (spacing dy). The caller
/// guarantees `1 <= i < rows - 1` and `1 <= j < cols - 1`.
#[inline]
pub fn ftcs_rate(
    field: &DMatrix<f64>,
    i: usize,
    j: usize,
    source: f64,
    k: &StencilCoefficients,
) -> f64 {
    let c = field[(i, j)];
    let east = field[(i + 1, j)];
    let west = field[(i - 1, j)];
    let north = field[(i, j + 1)];
    let south = field[(i, j - 1)];

    let d2x = (east - 2.0 * c + west) / (k.dx * k.dx);
    let d2y = (north - 2.0 * c + south) / (k.dy * k.dy);
    let dcx = (east - west) / (2.0 * k.dx);
    let dcy = (north - south) / (2.0 * k.dy);

    k.diffusion * (d2x + d2y) - k.velocity_x * dcx - k.velocity_y * dcy + source
}

/// True when `(i, j)` is an interior cell of a `rows × cols` grid
#[inline]
pub fn is_interior(i: usize, j: usize, rows: usize, cols: usize) -> bool {
    i > 0 && j > 0 && i + 1 < rows && j + 1 < cols
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gradient_of_linear_profile_is_constant() {
        let c = DVector::from_fn(10, |i, _| 3.0 * i as f64 * 0.5);
        let g = gradient(&c, 0.5);
        for value in g.iter() {
            assert_relative_eq!(*value, 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gradient_one_sided_ends() {
        let c = DVector::from_vec(vec![1.0, 2.0, 4.0, 8.0]);
        let g = gradient(&c, 2.0);
        assert_relative_eq!(g[0], 0.5);
        assert_relative_eq!(g[1], 0.75);
        assert_relative_eq!(g[2], 1.5);
        assert_relative_eq!(g[3], 2.0);
    }

    #[test]
    fn test_gradient_degenerate_lengths() {
        assert_eq!(gradient(&DVector::zeros(0), 1.0).len(), 0);
        assert_eq!(gradient(&DVector::from_vec(vec![5.0]), 1.0)[0], 0.0);
    }

    #[test]
    fn test_laplacian_of_quadratic() {
        // c = x², interior second derivative is exactly 2 on a wide stencil
        let c = DVector::from_fn(12, |i, _| (i as f64).powi(2));
        let l = laplacian(&c, 1.0);
        for i in 2..10 {
            assert_relative_eq!(l[i], 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_laplacian_of_constant_is_zero() {
        let c = DVector::from_element(7, 4.2);
        assert!(laplacian(&c, 0.3).iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_ftcs_rate_pure_source() {
        let field = DMatrix::zeros(3, 3);
        let k = StencilCoefficients {
            diffusion: 0.1,
            velocity_x: 0.5,
            velocity_y: -0.5,
            dx: 1.0,
            dy: 1.0,
        };
        assert_eq!(ftcs_rate(&field, 1, 1, 7.0, &k), 7.0);
    }

    #[test]
    fn test_ftcs_rate_spike() {
        let mut field = DMatrix::zeros(3, 3);
        field[(1, 1)] = 1.0;
        let k = StencilCoefficients {
            diffusion: 0.25,
            velocity_x: 0.0,
            velocity_y: 0.0,
            dx: 1.0,
            dy: 1.0,
        };
        assert_relative_eq!(ftcs_rate(&field, 1, 1, 0.0, &k), -1.0);
    }

    #[test]
    fn test_ftcs_rate_advection_direction() {
        let mut field = DMatrix::zeros(3, 3);
        field[(0, 1)] = 1.0;
        let k = StencilCoefficients {
            diffusion: 0.0,
            velocity_x: 1.0,
            velocity_y: 0.0,
            dx: 1.0,
            dy: 1.0,
        };
        // Upstream mass moves into the cell for positive u
        assert_relative_eq!(ftcs_rate(&field, 1, 1, 0.0, &k), 0.5);
    }

    #[test]
    fn test_stability_numbers() {
        let k = StencilCoefficients {
            diffusion: 0.1,
            velocity_x: 0.5,
            velocity_y: -0.5,
            dx: 1.0,
            dy: 1.0,
        };
        assert_relative_eq!(k.diffusion_number(0.01), 0.002);
        assert_relative_eq!(k.courant_number(0.01), 0.01);
    }

    #[test]
    fn test_is_interior() {
        assert!(is_interior(1, 1, 3, 3));
        assert!(!is_interior(0, 1, 3, 3));
        assert!(!is_interior(1, 2, 3, 3));
    }
}
