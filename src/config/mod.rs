//! Simulation parameters
//!
//! Every run is described by an immutable [`SimulationParameters`] value:
//!
//! - [`FertilizerApplication`]: what the farmer puts on the land
//! - [`ColumnParameters`]: coefficients of the 1D soil column model
//! - [`FieldParameters`]: grid and coefficients of the 2D farm model
//! - `safe_level`: concentration threshold used by the runoff analysis
//!
//! All sections deserialize from JSON with per-field defaults, so a caller
//! only has to provide what differs from the reference scenario.
//!
//! ```rust
//! use fern_rs::config::SimulationParameters;
//!
//! let params = SimulationParameters::from_json_str(
//!     r#"{ "application": { "fertilizer_amount": 80.0, "land_size": 4.0 } }"#,
//! ).unwrap();
//!
//! assert_eq!(params.application.seed_concentration(), 20.0);
//! assert_eq!(params.column.points, 100);
//! assert_eq!(params.safe_level, 50.0);
//! ```

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::operators::StencilCoefficients;

/// Default safety threshold (ppm)
pub const DEFAULT_SAFE_LEVEL: f64 = 50.0;

/// Largest admissible diffusion number of the explicit 2D scheme
pub const MAX_DIFFUSION_NUMBER: f64 = 0.5;

/// Largest admissible advective Courant number of the explicit 2D scheme
pub const MAX_COURANT_NUMBER: f64 = 1.0;

/// Fraction of a stability limit above which a warning is logged
pub const STABILITY_WARNING_RATIO: f64 = 0.8;

/// Default bound on rows × cols × steps
pub const DEFAULT_MAX_CELL_UPDATES: u64 = 1_000_000_000;

fn default_safe_level() -> f64 {
    DEFAULT_SAFE_LEVEL
}

fn require_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(name, format!("must be finite, got {}", value)))
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(SimulationError::invalid(
            name,
            format!("must be non-negative, got {}", value),
        ));
    }
    Ok(())
}

fn require_positive(name: &'static str, value: f64) -> Result<()> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(SimulationError::invalid(
            name,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}

// =================================================================================================
// Top-level parameters
// =================================================================================================

/// Complete description of a simulation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    #[serde(default)]
    pub application: FertilizerApplication,
    #[serde(default)]
    pub column: ColumnParameters,
    #[serde(default)]
    pub field: FieldParameters,
    /// Concentration above which a sample counts as unsafe
    #[serde(default = "default_safe_level")]
    pub safe_level: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            application: FertilizerApplication::default(),
            column: ColumnParameters::default(),
            field: FieldParameters::default(),
            safe_level: DEFAULT_SAFE_LEVEL,
        }
    }
}

impl SimulationParameters {
    /// Parse from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every section
    ///
    /// The 2D section is checked for stability as well: a configuration the
    /// explicit scheme cannot integrate is rejected here.
    pub fn validate(&self) -> Result<()> {
        self.application.validate()?;
        self.column.validate()?;
        self.field.validate()?;
        require_finite("safe_level", self.safe_level)
    }
}

// =================================================================================================
// Fertilizer application
// =================================================================================================

/// What is spread, and where
///
/// The categorical labels are informational: they are carried along for
/// reporting and never change the transport coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FertilizerApplication {
    /// Amount of fertilizer (kg)
    pub fertilizer_amount: f64,
    /// Area of the land (hectares)
    pub land_size: f64,
    /// Simulated horizon (days)
    pub days: u32,
    pub fertilizer_type: Option<String>,
    pub crop_type: Option<String>,
    pub soil_type: Option<String>,
    pub soil_npk_ratio: Option<String>,
}

impl Default for FertilizerApplication {
    fn default() -> Self {
        Self {
            fertilizer_amount: 50.0,
            land_size: 10.0,
            days: 30,
            fertilizer_type: None,
            crop_type: None,
            soil_type: None,
            soil_npk_ratio: None,
        }
    }
}

impl FertilizerApplication {
    /// Validate amounts and horizon
    pub fn validate(&self) -> Result<()> {
        require_non_negative("fertilizer_amount", self.fertilizer_amount)?;
        require_positive("land_size", self.land_size)?;
        if self.days == 0 {
            return Err(SimulationError::invalid("days", "must be at least 1"));
        }
        Ok(())
    }

    /// Initial concentration at the injection point: amount per unit area
    pub fn seed_concentration(&self) -> f64 {
        self.fertilizer_amount / self.land_size
    }
}

// =================================================================================================
// 1D soil column
// =================================================================================================

/// Coefficients of `dC/dt = D·∂²C/∂x² − v·∂C/∂x − R·C + S`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnParameters {
    /// Diffusion coefficient D
    pub diffusion: f64,
    /// Convection velocity v
    pub velocity: f64,
    /// First-order decay rate R
    pub reaction_rate: f64,
    /// Uniform source S
    pub source_strength: f64,
    /// Number of grid points N
    pub points: usize,
    /// Grid spacing dx
    pub spacing: f64,
    pub relative_tolerance: f64,
    pub absolute_tolerance: f64,
    /// Integrator step budget
    pub max_steps: usize,
}

impl Default for ColumnParameters {
    fn default() -> Self {
        Self {
            diffusion: 0.1,
            velocity: 0.05,
            reaction_rate: 0.01,
            source_strength: 0.001,
            points: 100,
            spacing: 1.0,
            relative_tolerance: 1e-6,
            absolute_tolerance: 1e-9,
            max_steps: 500_000,
        }
    }
}

impl ColumnParameters {
    /// Validate coefficients, grid and integrator settings
    pub fn validate(&self) -> Result<()> {
        require_non_negative("diffusion", self.diffusion)?;
        require_finite("velocity", self.velocity)?;
        require_non_negative("reaction_rate", self.reaction_rate)?;
        require_non_negative("source_strength", self.source_strength)?;
        if self.points < 2 {
            return Err(SimulationError::invalid(
                "points",
                format!("need at least 2 grid points, got {}", self.points),
            ));
        }
        require_positive("spacing", self.spacing)?;
        require_positive("relative_tolerance", self.relative_tolerance)?;
        require_positive("absolute_tolerance", self.absolute_tolerance)?;
        if self.max_steps == 0 {
            return Err(SimulationError::invalid("max_steps", "must be at least 1"));
        }
        Ok(())
    }
}

// =================================================================================================
// 2D farm field
// =================================================================================================

/// Grid and coefficients of the explicit 2D convection-diffusion scheme
///
/// Rows run along x (spacing `dx`, velocity `velocity_x`), columns along y
/// (spacing `dy`, velocity `velocity_y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParameters {
    pub rows: usize,
    pub cols: usize,
    pub diffusion: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub dt: f64,
    pub dx: f64,
    pub dy: f64,
    /// Number of time steps T
    pub steps: usize,
    /// Upper bound on rows × cols × steps, `None` for no bound
    pub max_cell_updates: Option<u64>,
}

impl Default for FieldParameters {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            diffusion: 0.01,
            velocity_x: 0.1,
            velocity_y: 0.1,
            dt: 0.01,
            dx: 1.0,
            dy: 1.0,
            steps: 50,
            max_cell_updates: Some(DEFAULT_MAX_CELL_UPDATES),
        }
    }
}

/// Dimensionless numbers governing the stability of the explicit scheme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityReport {
    /// `dt·D·(1/dx² + 1/dy²)`, must not exceed 0.5
    pub diffusion_number: f64,
    /// `dt·(|u|/dx + |v|/dy)`, must not exceed 1
    pub courant_number: f64,
}

impl StabilityReport {
    /// Largest fraction of a limit in use
    pub fn margin(&self) -> f64 {
        (self.diffusion_number / MAX_DIFFUSION_NUMBER).max(self.courant_number / MAX_COURANT_NUMBER)
    }

    pub fn is_stable(&self) -> bool {
        self.diffusion_number <= MAX_DIFFUSION_NUMBER && self.courant_number <= MAX_COURANT_NUMBER
    }
}

impl FieldParameters {
    /// Stencil coefficients for [`ftcs_rate`](crate::physics::operators::ftcs_rate)
    pub fn coefficients(&self) -> StencilCoefficients {
        StencilCoefficients {
            diffusion: self.diffusion,
            velocity_x: self.velocity_x,
            velocity_y: self.velocity_y,
            dx: self.dx,
            dy: self.dy,
        }
    }

    /// Diffusion and Courant numbers of this configuration
    pub fn stability(&self) -> StabilityReport {
        let coefficients = self.coefficients();
        StabilityReport {
            diffusion_number: coefficients.diffusion_number(self.dt),
            courant_number: coefficients.courant_number(self.dt),
        }
    }

    /// rows × cols × steps
    pub fn cell_updates(&self) -> u128 {
        self.rows as u128 * self.cols as u128 * self.steps as u128
    }

    /// Validate grid, coefficients, stability and work bound
    pub fn validate(&self) -> Result<()> {
        if self.rows < 3 || self.cols < 3 {
            return Err(SimulationError::invalid(
                "grid",
                format!(
                    "need at least 3x3 cells to have an interior, got {}x{}",
                    self.rows, self.cols
                ),
            ));
        }
        require_non_negative("diffusion", self.diffusion)?;
        require_finite("velocity_x", self.velocity_x)?;
        require_finite("velocity_y", self.velocity_y)?;
        require_positive("dt", self.dt)?;
        require_positive("dx", self.dx)?;
        require_positive("dy", self.dy)?;

        self.check_stability()?;
        self.check_work_budget()
    }

    /// Reject configurations beyond the explicit-scheme limits
    ///
    /// Logs a warning when either number is above 80% of its limit.
    pub fn check_stability(&self) -> Result<StabilityReport> {
        let report = self.stability();

        if report.diffusion_number > MAX_DIFFUSION_NUMBER {
            return Err(SimulationError::UnstableConfiguration {
                diffusion_number: report.diffusion_number,
                courant_number: report.courant_number,
                reason: format!(
                    "diffusion number exceeds {}, reduce dt or increase dx/dy",
                    MAX_DIFFUSION_NUMBER
                ),
            });
        }
        if report.courant_number > MAX_COURANT_NUMBER {
            return Err(SimulationError::UnstableConfiguration {
                diffusion_number: report.diffusion_number,
                courant_number: report.courant_number,
                reason: format!(
                    "Courant number exceeds {}, reduce dt or the velocities",
                    MAX_COURANT_NUMBER
                ),
            });
        }

        if report.margin() > STABILITY_WARNING_RATIO {
            warn!(
                "Explicit scheme close to its stability limit: diffusion number {:.4}, Courant number {:.4}",
                report.diffusion_number, report.courant_number
            );
        }

        Ok(report)
    }

    /// Reject runs above `max_cell_updates`
    pub fn check_work_budget(&self) -> Result<()> {
        if let Some(limit) = self.max_cell_updates {
            let requested = self.cell_updates();
            if requested > limit as u128 {
                return Err(SimulationError::WorkBudgetExceeded { requested, limit });
            }
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_are_valid() {
        let params = SimulationParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.application.seed_concentration(), 5.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params = SimulationParameters::from_json_str(
            r#"{
                "application": { "fertilizer_amount": 120.0, "crop_type": "Maize" },
                "field": { "rows": 20, "cols": 30 },
                "safe_level": 35.0
            }"#,
        )
        .unwrap();

        assert_eq!(params.application.fertilizer_amount, 120.0);
        assert_eq!(params.application.land_size, 10.0);
        assert_eq!(params.application.crop_type.as_deref(), Some("Maize"));
        assert_eq!(params.field.rows, 20);
        assert_eq!(params.field.steps, 50);
        assert_eq!(params.safe_level, 35.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut params = SimulationParameters::default();
        params.application.soil_type = Some("Loam".to_string());
        params.field.max_cell_updates = None;

        let json = params.to_json_string().unwrap();
        let parsed = SimulationParameters::from_json_str(&json).unwrap();
        assert_eq!(parsed, params);
    }

    #[test]
    fn test_malformed_json() {
        let err = SimulationParameters::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationParameters::from_json_file("/nonexistent/fern.json").unwrap_err();
        assert!(matches!(err, SimulationError::Io(_)));
    }

    #[test]
    fn test_application_validation() {
        let mut application = FertilizerApplication::default();
        application.land_size = 0.0;
        assert!(matches!(
            application.validate(),
            Err(SimulationError::InvalidParameter { name: "land_size", .. })
        ));

        application.land_size = 1.0;
        application.fertilizer_amount = -1.0;
        assert!(application.validate().is_err());

        application.fertilizer_amount = 0.0;
        application.days = 0;
        assert!(application.validate().is_err());
    }

    #[test]
    fn test_column_validation() {
        let mut column = ColumnParameters::default();
        column.points = 1;
        assert!(column.validate().is_err());

        column.points = 2;
        column.spacing = 0.0;
        assert!(column.validate().is_err());

        column.spacing = 1.0;
        column.velocity = f64::NAN;
        assert!(column.validate().is_err());

        column.velocity = -0.3;
        assert!(column.validate().is_ok());
    }

    #[test]
    fn test_stability_numbers() {
        let field = FieldParameters::default();
        let report = field.stability();

        assert_relative_eq!(report.diffusion_number, 0.0002);
        assert_relative_eq!(report.courant_number, 0.002);
        assert!(report.is_stable());
    }

    #[test]
    fn test_diffusion_limit_rejected() {
        let field = FieldParameters {
            diffusion: 1.0,
            dt: 0.3,
            ..FieldParameters::default()
        };

        match field.validate() {
            Err(SimulationError::UnstableConfiguration {
                diffusion_number, ..
            }) => assert_relative_eq!(diffusion_number, 0.6),
            other => panic!("expected instability, got {other:?}"),
        }
    }

    #[test]
    fn test_courant_limit_rejected() {
        let field = FieldParameters {
            velocity_x: 60.0,
            velocity_y: -60.0,
            ..FieldParameters::default()
        };
        assert!(matches!(
            field.validate(),
            Err(SimulationError::UnstableConfiguration { .. })
        ));
    }

    #[test]
    fn test_limit_itself_is_accepted() {
        let field = FieldParameters {
            diffusion: 25.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            ..FieldParameters::default()
        };
        // 0.01 · 25 · 2 = 0.5
        assert!(field.check_stability().is_ok());
    }

    #[test]
    fn test_work_budget() {
        let field = FieldParameters {
            steps: 1_000,
            max_cell_updates: Some(1_000_000),
            ..FieldParameters::default()
        };

        assert!(matches!(
            field.validate(),
            Err(SimulationError::WorkBudgetExceeded {
                requested: 10_000_000,
                limit: 1_000_000
            })
        ));

        let unbounded = FieldParameters {
            max_cell_updates: None,
            ..field
        };
        assert!(unbounded.validate().is_ok());
    }

    #[test]
    fn test_small_grid_rejected() {
        let field = FieldParameters {
            rows: 2,
            ..FieldParameters::default()
        };
        assert!(field.validate().is_err());
    }
}
