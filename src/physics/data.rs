//! Physical data types
//!
//! This module provides a container for physical quantities that can be
//! scalars, 1D profiles or 2D fields depending on the problem's dimensionality.

use nalgebra::{DMatrix, DVector};
use std::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::solver::parallel_threshold;

/// Physical data container supporting scalar, profile and field storage
///
/// # Storage Types
///
/// - **Scalar**: Single uniform value (0D)
/// - **Vector**: 1D concentration profile along a soil column
/// - **Matrix**: 2D concentration field, `A[row, col]` with rows along x and
///   columns along y
///
/// # Memory Layout
///
/// - **Scalar**: 8 bytes
/// - **Vector[n]**: 8n bytes
/// - **Matrix[n×m]**: 8nm bytes (column-major, as nalgebra stores it)
///
/// # Examples
///
/// ```rust
/// use fern_rs::physics::PhysicalData;
///
/// let profile = PhysicalData::uniform_vector(100, 0.0);
/// let field = PhysicalData::uniform_matrix(50, 40, 0.0);
///
/// assert_eq!(profile.shape(), vec![100]);
/// assert_eq!(field.shape(), vec![50, 40]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicalData {
    /// Scalar value (0D) - 8 bytes
    Scalar(f64),

    /// Vector (1D) - 8n bytes
    ///
    /// Use for: concentration along the soil column
    Vector(DVector<f64>),

    /// Matrix (2D) - 8nm bytes
    ///
    /// Use for: concentration over a farm grid, `A[x, y]`
    Matrix(DMatrix<f64>),
}

impl PhysicalData {
    // ======================================= constructors =======================================

    /// Create from scalar
    pub fn from_scalar(value: f64) -> Self {
        Self::Scalar(value)
    }

    /// Create from vector
    pub fn from_vec(vector: Vec<f64>) -> Self {
        Self::Vector(DVector::from_vec(vector))
    }

    /// Create from DVector
    pub fn from_vector(vector: DVector<f64>) -> Self {
        Self::Vector(vector)
    }

    /// Create from DMatrix
    pub fn from_matrix(matrix: DMatrix<f64>) -> Self {
        Self::Matrix(matrix)
    }

    /// Create uniform vector
    pub fn uniform_vector(size: usize, value: f64) -> Self {
        Self::Vector(DVector::from_element(size, value))
    }

    /// Create uniform matrix
    pub fn uniform_matrix(rows: usize, columns: usize, value: f64) -> Self {
        Self::Matrix(DMatrix::from_element(rows, columns, value))
    }

    // ========================================== Queries ==========================================

    /// Check data is scalar
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Check data is a vector
    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// Check data is a matrix
    pub fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix(_))
    }

    /// Get data dimension
    ///
    /// Returns: 0 (scalar), 1 (vector), 2 (matrix)
    pub fn ndim(&self) -> usize {
        match self {
            PhysicalData::Scalar(_) => 0,
            PhysicalData::Vector(_) => 1,
            PhysicalData::Matrix(_) => 2,
        }
    }

    /// Get shape as a vector
    pub fn shape(&self) -> Vec<usize> {
        match self {
            PhysicalData::Scalar(_) => vec![],
            PhysicalData::Vector(v) => vec![v.len()],
            PhysicalData::Matrix(m) => vec![m.nrows(), m.ncols()],
        }
    }

    /// Get length
    pub fn len(&self) -> usize {
        match self {
            PhysicalData::Scalar(_) => 1,
            PhysicalData::Vector(v) => v.len(),
            PhysicalData::Matrix(m) => m.len(),
        }
    }

    /// Check emptiness
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat view over every stored value
    ///
    /// Matrices are viewed in nalgebra's column-major order.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            PhysicalData::Scalar(value) => std::slice::from_ref(value),
            PhysicalData::Vector(v) => v.as_slice(),
            PhysicalData::Matrix(m) => m.as_slice(),
        }
    }

    /// True when no value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|x| x.is_finite())
    }

    // ======================================== Extractions ========================================

    /// Extract as a scalar (panic if not)
    pub fn as_scalar(&self) -> f64 {
        match self {
            PhysicalData::Scalar(value) => *value,
            _ => panic!("Not a scalar value"),
        }
    }

    /// Try to extract as a scalar
    pub fn try_as_scalar(&self) -> Option<f64> {
        match self {
            PhysicalData::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Extract as a DVector (panic if not)
    pub fn as_vector(&self) -> &DVector<f64> {
        match self {
            PhysicalData::Vector(value) => value,
            _ => panic!("Not a vector value"),
        }
    }

    /// Try to extract as a DVector
    pub fn try_as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            PhysicalData::Vector(value) => Some(value),
            _ => None,
        }
    }

    /// Extract as a DMatrix (panic if not)
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        match self {
            PhysicalData::Matrix(value) => value,
            _ => panic!("Not a matrix value"),
        }
    }

    /// Try to extract as a DMatrix
    pub fn try_as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            PhysicalData::Matrix(value) => Some(value),
            _ => None,
        }
    }

    // ====================================== Apply functions ======================================

    /// Apply a function f to every value in place
    ///
    /// Switches to rayon above [`parallel_threshold`] elements when the crate
    /// is built with the `parallel` feature.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64 + Sync + Send,
    {
        let values: &mut [f64] = match self {
            PhysicalData::Scalar(value) => {
                *value = f(*value);
                return;
            }
            PhysicalData::Vector(value) => value.as_mut_slice(),
            PhysicalData::Matrix(value) => value.as_mut_slice(),
        };

        if values.len() > parallel_threshold() {
            #[cfg(feature = "parallel")]
            values.par_iter_mut().for_each(|x| *x = f(*x));
            #[cfg(not(feature = "parallel"))]
            values.iter_mut().for_each(|x| *x = f(*x));
        } else {
            values.iter_mut().for_each(|x| *x = f(*x));
        }
    }
}

// ================================== Simple arithmetic functions ==================================

impl std::ops::Add for PhysicalData {
    type Output = PhysicalData;
    fn add(self, rhs: Self) -> Self::Output {
        use PhysicalData::*;
        match (self, rhs) {
            (Scalar(x), Scalar(y)) => Scalar(x + y),
            (Scalar(x), Vector(y)) | (Vector(y), Scalar(x)) => Vector(y.map(|e| e + x)),
            (Scalar(x), Matrix(y)) | (Matrix(y), Scalar(x)) => Matrix(y.map(|e| e + x)),

            (Vector(x), Vector(y)) => {
                assert_eq!(x.len(), y.len(), "Vector length must match");
                Vector(x + y)
            }

            (Matrix(x), Matrix(y)) => {
                assert_eq!(x.shape(), y.shape(), "Matrices dimensions must match");
                Matrix(x + y)
            }

            _ => panic!("Cannot add a vector to a matrix"),
        }
    }
}

impl std::ops::Mul<f64> for PhysicalData {
    type Output = PhysicalData;
    fn mul(self, scalar: f64) -> Self::Output {
        match self {
            PhysicalData::Scalar(x) => PhysicalData::Scalar(x * scalar),
            PhysicalData::Vector(x) => PhysicalData::Vector(x * scalar),
            PhysicalData::Matrix(x) => PhysicalData::Matrix(x * scalar),
        }
    }
}

impl std::ops::Mul<PhysicalData> for f64 {
    type Output = PhysicalData;
    fn mul(self, rhs: PhysicalData) -> Self::Output {
        rhs * self
    }
}

// ======================== Display ============================

impl fmt::Display for PhysicalData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalData::Scalar(value) => write!(f, "Scalar ({})", value),
            PhysicalData::Vector(value) => write!(f, "Vector [{}]", value.len()),
            PhysicalData::Matrix(value) => {
                write!(f, "Matrix [{} * {}]", value.nrows(), value.ncols())
            }
        }
    }
}

// ==================== Tests ====================
