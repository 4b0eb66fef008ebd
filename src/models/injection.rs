//! Initial fertilizer placement
//!
//! Defines how the applied fertilizer is distributed at t = 0, either along
//! the soil column (1D profile) or over the farm grid (2D field).
//!
//! # Example
//!
//! ```rust
//! use fern_rs::models::Injection;
//!
//! // 50 kg on 10 ha, seeded at the surface of the column
//! let injection = Injection::point(0, 50.0 / 10.0);
//! let profile = injection.profile(100).unwrap();
//!
//! assert_eq!(profile[0], 5.0);
//! assert!(profile.iter().skip(1).all(|c| *c == 0.0));
//! ```

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::error::{Result, SimulationError};

/// Initial distribution of fertilizer
///
/// # Types
///
/// - **None**: clean soil
/// - **Point**: all fertilizer at one index of the column
/// - **Cell**: all fertilizer at one cell of the field
/// - **Uniform**: same concentration everywhere
/// - **Gaussian**: bell-shaped band along the column
/// - **Custom**: user-defined profile along the column
pub enum Injection {
    /// No fertilizer
    None,

    /// Concentration `amount` at column index `index`
    Point { index: usize, amount: f64 },

    /// Concentration `amount` at field cell `(row, col)`
    Cell { row: usize, col: usize, amount: f64 },

    /// Same concentration at every point or cell
    Uniform(f64),

    /// Gaussian band along the column
    ///
    /// ```text
    /// C(i) = peak · exp(-((i - center)² / (2·width²)))
    /// ```
    ///
    /// `center` and `width` are in grid points.
    Gaussian { center: f64, width: f64, peak: f64 },

    /// Profile computed from the grid index
    Custom(Arc<dyn Fn(usize) -> f64 + Send + Sync>),
}

// ==================== Manual Clone Implementation ====================

impl Clone for Injection {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Point { index, amount } => Self::Point {
                index: *index,
                amount: *amount,
            },
            Self::Cell { row, col, amount } => Self::Cell {
                row: *row,
                col: *col,
                amount: *amount,
            },
            Self::Uniform(value) => Self::Uniform(*value),
            Self::Gaussian {
                center,
                width,
                peak,
            } => Self::Gaussian {
                center: *center,
                width: *width,
                peak: *peak,
            },
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
        }
    }
}

// ==================== Manual Debug Implementation ====================

impl std::fmt::Debug for Injection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.debug_struct("None").finish(),
            Self::Point { index, amount } => f
                .debug_struct("Point")
                .field("index", index)
                .field("amount", amount)
                .finish(),
            Self::Cell { row, col, amount } => f
                .debug_struct("Cell")
                .field("row", row)
                .field("col", col)
                .field("amount", amount)
                .finish(),
            Self::Uniform(value) => f.debug_tuple("Uniform").field(value).finish(),
            Self::Gaussian {
                center,
                width,
                peak,
            } => f
                .debug_struct("Gaussian")
                .field("center", center)
                .field("width", width)
                .field("peak", peak)
                .finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
        }
    }
}

// ==================== Implementation ====================

impl Injection {
    /// Clean soil
    pub fn none() -> Self {
        Self::None
    }

    /// Seed one point of the column
    pub fn point(index: usize, amount: f64) -> Self {
        Self::Point { index, amount }
    }

    /// Seed one cell of the field
    pub fn cell(row: usize, col: usize, amount: f64) -> Self {
        Self::Cell { row, col, amount }
    }

    /// Uniform initial concentration
    pub fn uniform(value: f64) -> Self {
        Self::Uniform(value)
    }

    /// Gaussian band along the column
    pub fn gaussian(center: f64, width: f64, peak: f64) -> Self {
        Self::Gaussian {
            center,
            width,
            peak,
        }
    }

    /// User-defined profile along the column
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Initial profile of a column with `points` grid points
    pub fn profile(&self, points: usize) -> Result<DVector<f64>> {
        let profile = match self {
            Self::None => DVector::zeros(points),
            Self::Point { index, amount } => {
                check_index("index", *index, points)?;
                let mut profile = DVector::zeros(points);
                profile[*index] = *amount;
                profile
            }
            Self::Uniform(value) => DVector::from_element(points, *value),
            Self::Gaussian {
                center,
                width,
                peak,
            } => {
                if !width.is_finite() || *width <= 0.0 {
                    return Err(SimulationError::invalid(
                        "width",
                        format!("must be positive, got {}", width),
                    ));
                }
                DVector::from_fn(points, |i, _| {
                    let x = i as f64 - center;
                    peak * (-(x * x) / (2.0 * width * width)).exp()
                })
            }
            Self::Custom(f) => DVector::from_fn(points, |i, _| f(i)),
            Self::Cell { .. } => {
                return Err(SimulationError::invalid(
                    "injection",
                    "a field cell cannot seed a 1D column",
                ));
            }
        };

        check_finite(profile.as_slice())?;
        Ok(profile)
    }

    /// Initial field of a `rows × cols` grid
    pub fn field(&self, rows: usize, cols: usize) -> Result<DMatrix<f64>> {
        let field = match self {
            Self::None => DMatrix::zeros(rows, cols),
            Self::Cell { row, col, amount } => {
                check_index("row", *row, rows)?;
                check_index("col", *col, cols)?;
                let mut field = DMatrix::zeros(rows, cols);
                field[(*row, *col)] = *amount;
                field
            }
            Self::Uniform(value) => DMatrix::from_element(rows, cols, *value),
            Self::Point { .. } | Self::Gaussian { .. } | Self::Custom(_) => {
                return Err(SimulationError::invalid(
                    "injection",
                    "column profiles cannot seed a 2D field",
                ));
            }
        };

        check_finite(field.as_slice())?;
        Ok(field)
    }
}

fn check_index(name: &'static str, index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(SimulationError::invalid(
            name,
            format!("{} is outside a grid of {} points", index, len),
        ));
    }
    Ok(())
}

fn check_finite(values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            "injection",
            "initial concentration must be finite",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_profile() {
        let profile = Injection::point(3, 2.5).profile(5).unwrap();
        assert_eq!(profile.as_slice(), &[0.0, 0.0, 0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_point_out_of_range() {
        assert!(Injection::point(5, 1.0).profile(5).is_err());
    }

    #[test]
    fn test_gaussian_profile() {
        let profile = Injection::gaussian(10.0, 2.0, 1.0).profile(21).unwrap();
        assert_relative_eq!(profile[10], 1.0);
        assert_relative_eq!(profile[8], profile[12]);
        assert!(profile[0] < 1e-5);
        assert!(Injection::gaussian(10.0, 0.0, 1.0).profile(21).is_err());
    }

    #[test]
    fn test_custom_profile() {
        let injection = Injection::custom(|i| i as f64 * 0.5);
        let cloned = injection.clone();
        assert_eq!(cloned.profile(3).unwrap().as_slice(), &[0.0, 0.5, 1.0]);
        assert!(format!("{:?}", injection).contains("user-defined"));
    }

    #[test]
    fn test_cell_field() {
        let field = Injection::cell(1, 2, 7.0).field(3, 4).unwrap();
        assert_eq!(field[(1, 2)], 7.0);
        assert_eq!(field.iter().filter(|c| **c != 0.0).count(), 1);
        assert!(Injection::cell(3, 0, 1.0).field(3, 4).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(Injection::cell(0, 0, 1.0).profile(4).is_err());
        assert!(Injection::point(0, 1.0).field(3, 3).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Injection::uniform(f64::NAN).profile(3).is_err());
        assert!(Injection::none().field(2, 2).unwrap().iter().all(|c| *c == 0.0));
    }
}
