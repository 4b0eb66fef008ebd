//! Runoff and safety analysis
//!
//! Summaries of a simulated concentration history against a safety threshold:
//!
//! - [`analyze`]: peak, trapezoidal exposure and number of unsafe samples of a
//!   time series (usually the injection point of the soil column)
//! - [`analyze_field`]: peak, mass and cells above the threshold of one 2D layer
//!
//! # Example
//!
//! ```rust
//! use fern_rs::analysis::analyze;
//!
//! let times = [0.0, 1.0, 2.0, 3.0];
//! let series = [10.0, 60.0, 55.0, 20.0];
//!
//! let metrics = analyze(&series, &times, 50.0).unwrap();
//! assert_eq!(metrics.peak, 60.0);
//! assert_eq!(metrics.peak_time, 1.0);
//! assert_eq!(metrics.unsafe_count, 2);
//! assert_eq!(metrics.total_exposure, 130.0);
//! ```

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::models::InclusionMask;

/// Safety summary of a concentration time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyMetrics {
    /// Largest concentration
    pub peak: f64,
    /// First time at which `peak` is reached
    pub peak_time: f64,
    /// Trapezoidal integral of the series over time
    pub total_exposure: f64,
    /// Samples strictly above `safe_level`
    pub unsafe_count: usize,
    pub safe_level: f64,
}

impl SafetyMetrics {
    /// `peak − safe_level`, positive when the threshold was crossed
    pub fn exceedance(&self) -> f64 {
        self.peak - self.safe_level
    }

    pub fn is_within_safe_level(&self) -> bool {
        self.unsafe_count == 0
    }
}

/// Trapezoidal integral of `y` over `x`
///
/// Returns 0 for fewer than two samples. Both slices must have the same length.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    debug_assert_eq!(y.len(), x.len());
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

/// Summarise `series` sampled at `time_points` against `safe_level`
pub fn analyze(series: &[f64], time_points: &[f64], safe_level: f64) -> Result<SafetyMetrics> {
    if series.is_empty() {
        return Err(SimulationError::EmptyInput("concentration series"));
    }
    if series.len() != time_points.len() {
        return Err(SimulationError::invalid(
            "time_points",
            format!(
                "{} time points for {} samples",
                time_points.len(),
                series.len()
            ),
        ));
    }
    if !safe_level.is_finite() {
        return Err(SimulationError::invalid("safe_level", "must be finite"));
    }
    if series.iter().chain(time_points).any(|v| !v.is_finite()) {
        return Err(SimulationError::invalid(
            "series",
            "samples and time points must be finite",
        ));
    }

    let (peak_index, peak) = series
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, c)| {
            if c > best.1 { (i, c) } else { best }
        });

    Ok(SafetyMetrics {
        peak,
        peak_time: time_points[peak_index],
        total_exposure: trapezoid(series, time_points),
        unsafe_count: series.iter().filter(|c| **c > safe_level).count(),
        safe_level,
    })
}

// =================================================================================================
// 2D fields
// =================================================================================================

/// Summary of one concentration layer of the farm grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldMetrics {
    /// Largest concentration over included cells
    pub peak: f64,
    /// `(row, col)` of `peak`
    pub peak_cell: (usize, usize),
    /// Σ C·dx·dy over included cells
    pub total_mass: f64,
    /// Included cells strictly above the safety threshold
    pub cells_above: usize,
}

/// Summarise a 2D layer, ignoring cells excluded by `mask`
///
/// Fails when the mask shape differs from the field, when no cell is
/// included, or when the field holds non-finite values.
pub fn analyze_field(
    field: &DMatrix<f64>,
    mask: &InclusionMask,
    dx: f64,
    dy: f64,
    safe_level: f64,
) -> Result<FieldMetrics> {
    mask.check_shape(field.nrows(), field.ncols())?;
    if !safe_level.is_finite() {
        return Err(SimulationError::invalid("safe_level", "must be finite"));
    }
    if field.iter().any(|c| !c.is_finite()) {
        return Err(SimulationError::invalid("field", "must contain finite values only"));
    }

    let mut peak = f64::NEG_INFINITY;
    let mut peak_cell = None;
    let mut sum = 0.0;
    let mut cells_above = 0;

    for j in 0..field.ncols() {
        for i in 0..field.nrows() {
            if !mask.is_included(i, j) {
                continue;
            }
            let c = field[(i, j)];
            sum += c;
            if c > safe_level {
                cells_above += 1;
            }
            if c > peak {
                peak = c;
                peak_cell = Some((i, j));
            }
        }
    }

    let peak_cell = peak_cell.ok_or(SimulationError::EmptyInput("included cells"))?;

    Ok(FieldMetrics {
        peak,
        peak_cell,
        total_mass: sum * dx * dy,
        cells_above,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trapezoid_linear_ramp() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_relative_eq!(trapezoid(&x, &x), 40.5);
    }

    #[test]
    fn test_trapezoid_degenerate() {
        assert_eq!(trapezoid(&[3.0], &[1.0]), 0.0);
        assert_eq!(trapezoid(&[], &[]), 0.0);
    }

    #[test]
    fn test_trapezoid_uneven_spacing() {
        assert_relative_eq!(trapezoid(&[2.0, 2.0, 4.0], &[0.0, 0.5, 2.0]), 1.0 + 4.5);
    }

    #[test]
    fn test_unsafe_count_matches_direct_count() {
        let series = [49.0, 50.0, 50.5, 80.0, 12.0, 51.0];
        let times = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

        let metrics = analyze(&series, &times, 50.0).unwrap();

        assert_eq!(metrics.unsafe_count, 3);
        assert_eq!(metrics.peak, 80.0);
        assert_eq!(metrics.peak_time, 3.0);
        assert_relative_eq!(metrics.exceedance(), 30.0);
        assert!(!metrics.is_within_safe_level());
    }

    #[test]
    fn test_peak_time_is_first_occurrence() {
        let metrics = analyze(&[1.0, 4.0, 4.0], &[0.0, 0.5, 1.0], 10.0).unwrap();
        assert_eq!(metrics.peak_time, 0.5);
        assert!(metrics.is_within_safe_level());
    }

    #[test]
    fn test_analyze_errors() {
        assert!(matches!(
            analyze(&[], &[], 50.0),
            Err(SimulationError::EmptyInput(_))
        ));
        assert!(matches!(
            analyze(&[1.0, 2.0], &[0.0], 50.0),
            Err(SimulationError::InvalidParameter { .. })
        ));
        assert!(analyze(&[1.0, f64::NAN], &[0.0, 1.0], 50.0).is_err());
        assert!(analyze(&[1.0], &[0.0], f64::INFINITY).is_err());
    }

    #[test]
    fn test_analyze_field_respects_mask() {
        let mut field = DMatrix::from_element(3, 3, 1.0);
        field[(0, 0)] = 100.0;
        field[(1, 2)] = 60.0;
        let mask = InclusionMask::all_included(3, 3).exclude_rect(0..1, 0..1);

        let metrics = analyze_field(&field, &mask, 2.0, 0.5, 50.0).unwrap();

        assert_eq!(metrics.peak, 60.0);
        assert_eq!(metrics.peak_cell, (1, 2));
        assert_eq!(metrics.cells_above, 1);
        assert_relative_eq!(metrics.total_mass, 67.0);
    }

    #[test]
    fn test_analyze_field_errors() {
        let field = DMatrix::zeros(3, 3);
        assert!(analyze_field(&field, &InclusionMask::all_included(3, 4), 1.0, 1.0, 50.0).is_err());
        assert!(matches!(
            analyze_field(&field, &InclusionMask::from_fn(3, 3, |_, _| false), 1.0, 1.0, 50.0),
            Err(SimulationError::EmptyInput(_))
        ));
    }
}
