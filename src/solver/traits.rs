//! Numerical solver traits and types
//!
//! # Design Philosophy
//!
//! This module follows the same pattern as `PhysicalQuantity`:
//! - Central enum `SolverType` defines the type of numerical integration
//! - `SolverConfiguration` adapts its parameters based on `SolverType`
//! - `SimulationResult` carries the recorded trajectory plus metadata
//!
//! # Stability Guarantee
//!
//! - `Solver` trait: stable interface for every method
//! - `SolverType` enum: extensible (new variants can be added)

use std::collections::HashMap;

use crate::error::{Result, SimulationError};
use crate::physics::{PhysicalData, PhysicalQuantity, PhysicalState};
use crate::solver::{CancellationToken, Scenario};

// =================================================================================================
// Central Solver Type Enumeration
// =================================================================================================

/// Type of numerical time integration
///
/// Each variant carries the data specific to that integration type.
///
/// # Examples
///
/// ```rust
/// use fern_rs::solver::SolverType;
///
/// // Uniform steps over a horizon
/// let evolution = SolverType::TimeEvolution { total_time: 10.0, time_steps: 1000 };
///
/// // Explicit step size, possibly zero steps
/// let fixed = SolverType::FixedStep { dt: 0.01, steps: 0 };
///
/// // Error-controlled integration reporting at given times
/// let adaptive = SolverType::Adaptive {
///     time_points: vec![0.0, 0.5, 1.0],
///     relative_tolerance: 1e-6,
///     absolute_tolerance: 1e-9,
///     max_steps: 100_000,
/// };
///
/// assert!(evolution.validate().is_ok());
/// assert!(fixed.validate().is_ok());
/// assert!(adaptive.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum SolverType {
    /// Uniform time evolution over `[0, total_time]`
    ///
    /// Used by: Euler, Runge-Kutta
    ///
    /// # Parameters
    /// - `total_time`: Total simulation time
    /// - `time_steps`: Number of time steps (dt = total_time / time_steps)
    TimeEvolution { total_time: f64, time_steps: usize },

    /// Explicit step size and step count
    ///
    /// Used by: Euler, Runge-Kutta. Zero steps returns the initial state.
    FixedStep { dt: f64, steps: usize },

    /// Adaptive error-controlled integration
    ///
    /// Used by: Dormand-Prince. The solution is reported at each of
    /// `time_points`, which must be strictly increasing; the first entry is
    /// the time of the initial condition.
    Adaptive {
        time_points: Vec<f64>,
        relative_tolerance: f64,
        absolute_tolerance: f64,
        max_steps: usize,
    },
}

impl SolverType {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolverType::TimeEvolution { .. } => "TimeEvolution",
            SolverType::FixedStep { .. } => "FixedStep",
            SolverType::Adaptive { .. } => "Adaptive",
        }
    }

    /// Validate that parameters are numerically meaningful
    pub fn validate(&self) -> Result<()> {
        match self {
            SolverType::TimeEvolution {
                total_time,
                time_steps,
            } => {
                if !total_time.is_finite() || *total_time <= 0.0 {
                    return Err(SimulationError::invalid(
                        "total_time",
                        format!("must be positive and finite, got {}", total_time),
                    ));
                }
                if *time_steps == 0 {
                    return Err(SimulationError::invalid(
                        "time_steps",
                        "must be greater than 0",
                    ));
                }
                Ok(())
            }
            SolverType::FixedStep { dt, .. } => {
                if !dt.is_finite() || *dt <= 0.0 {
                    return Err(SimulationError::invalid(
                        "dt",
                        format!("must be positive and finite, got {}", dt),
                    ));
                }
                Ok(())
            }
            SolverType::Adaptive {
                time_points,
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => {
                if time_points.is_empty() {
                    return Err(SimulationError::EmptyInput("time_points"));
                }
                if time_points.iter().any(|t| !t.is_finite()) {
                    return Err(SimulationError::invalid(
                        "time_points",
                        "must contain finite values only",
                    ));
                }
                if let Some(pair) = time_points.windows(2).find(|w| w[1] <= w[0]) {
                    return Err(SimulationError::invalid(
                        "time_points",
                        format!("must be strictly increasing ({} then {})", pair[0], pair[1]),
                    ));
                }
                if !relative_tolerance.is_finite() || *relative_tolerance <= 0.0 {
                    return Err(SimulationError::invalid(
                        "relative_tolerance",
                        format!("must be positive, got {}", relative_tolerance),
                    ));
                }
                if !absolute_tolerance.is_finite() || *absolute_tolerance <= 0.0 {
                    return Err(SimulationError::invalid(
                        "absolute_tolerance",
                        format!("must be positive, got {}", absolute_tolerance),
                    ));
                }
                if *max_steps == 0 {
                    return Err(SimulationError::invalid(
                        "max_steps",
                        "must be greater than 0",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Step size and step count of a fixed-step configuration
    ///
    /// Returns `None` for adaptive configurations.
    pub fn fixed_step(&self) -> Option<(f64, usize)> {
        match self {
            SolverType::TimeEvolution {
                total_time,
                time_steps,
            } => Some((total_time / *time_steps as f64, *time_steps)),
            SolverType::FixedStep { dt, steps } => Some((*dt, *steps)),
            SolverType::Adaptive { .. } => None,
        }
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration for numerical solver
///
/// Contains the `SolverType` plus run controls shared by every method:
///
/// - `record_interval`: store every k-th step in the trajectory. `0` keeps
///   only the initial and final states. Adaptive runs always record every
///   requested time point.
/// - `cancel`: optional cooperative cancellation token
///
/// # Examples
///
/// ```rust
/// use fern_rs::solver::{CancellationToken, SolverConfiguration};
///
/// let token = CancellationToken::new();
/// let config = SolverConfiguration::fixed_step(0.01, 500)
///     .with_record_interval(0)
///     .with_cancellation(token.clone());
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfiguration {
    /// Type of solver and its parameters
    pub solver_type: SolverType,

    /// Store every `record_interval`-th step (0 = initial and final only)
    pub record_interval: usize,

    /// Cooperative cancellation
    pub cancel: Option<CancellationToken>,
}

impl SolverConfiguration {
    /// Create a new configuration with a given solver type
    pub fn new(solver_type: SolverType) -> Self {
        Self {
            solver_type,
            record_interval: 1,
            cancel: None,
        }
    }

    /// Create a time evolution configuration
    pub fn time_evolution(total_time: f64, time_steps: usize) -> Self {
        Self::new(SolverType::TimeEvolution {
            total_time,
            time_steps,
        })
    }

    /// Create a fixed-step configuration
    pub fn fixed_step(dt: f64, steps: usize) -> Self {
        Self::new(SolverType::FixedStep { dt, steps })
    }

    /// Create an adaptive configuration reporting at `time_points`
    pub fn adaptive(
        time_points: Vec<f64>,
        relative_tolerance: f64,
        absolute_tolerance: f64,
        max_steps: usize,
    ) -> Self {
        Self::new(SolverType::Adaptive {
            time_points,
            relative_tolerance,
            absolute_tolerance,
            max_steps,
        })
    }

    /// Set the recording interval
    pub fn with_record_interval(mut self, interval: usize) -> Self {
        self.record_interval = interval;
        self
    }

    /// Attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.solver_type.validate()
    }
}

// =================================================================================================
// Simulation result
// =================================================================================================

/// Result of a simulation run
///
/// `time_points[k]` is the time of `trajectory[k]`. The first entry is always
/// the initial condition and `final_state` is the state after the last step.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Recorded times
    pub time_points: Vec<f64>,

    /// Recorded states
    pub trajectory: Vec<PhysicalState>,

    /// State at the end of the run
    pub final_state: PhysicalState,

    /// Diagnostics (solver name, step counts, ...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Create a result without metadata
    pub fn new(
        time_points: Vec<f64>,
        trajectory: Vec<PhysicalState>,
        final_state: PhysicalState,
    ) -> Self {
        Self {
            time_points,
            trajectory,
            final_state,
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }

    /// Number of recorded states
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    /// Final concentration data
    pub fn final_concentration(&self) -> Option<&PhysicalData> {
        self.final_state.get(PhysicalQuantity::Concentration)
    }

    /// Concentration history at one point of a 1D profile
    ///
    /// Index 0 is the injection point of the soil column.
    pub fn observation_series(&self, index: usize) -> Result<Vec<f64>> {
        self.trajectory
            .iter()
            .map(|state| {
                let profile = concentration(state)?.try_as_vector().ok_or_else(|| {
                    SimulationError::invalid("trajectory", "concentration is not a 1D profile")
                })?;
                profile.get(index).copied().ok_or_else(|| {
                    SimulationError::invalid(
                        "index",
                        format!("{} is outside a profile of {} points", index, profile.len()),
                    )
                })
            })
            .collect()
    }

    /// Concentration history at one cell of a 2D field
    pub fn cell_series(&self, row: usize, col: usize) -> Result<Vec<f64>> {
        self.trajectory
            .iter()
            .map(|state| {
                let field = concentration(state)?.try_as_matrix().ok_or_else(|| {
                    SimulationError::invalid("trajectory", "concentration is not a 2D field")
                })?;
                field.get((row, col)).copied().ok_or_else(|| {
                    SimulationError::invalid(
                        "cell",
                        format!(
                            "({}, {}) is outside a {}x{} field",
                            row,
                            col,
                            field.nrows(),
                            field.ncols()
                        ),
                    )
                })
            })
            .collect()
    }
}

fn concentration(state: &PhysicalState) -> Result<&PhysicalData> {
    state
        .get(PhysicalQuantity::Concentration)
        .ok_or_else(|| SimulationError::invalid("trajectory", "state has no concentration"))
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method applied to a [`Scenario`]
///
/// Solvers are stateless and can be reused across runs.
pub trait Solver {
    /// Integrate the scenario with the given configuration
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult>;

    /// Human-readable method name
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn profile_state(values: Vec<f64>) -> PhysicalState {
        PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(values))
    }

    #[test]
    fn test_time_evolution_validation() {
        assert!(SolverType::TimeEvolution { total_time: 1.0, time_steps: 10 }.validate().is_ok());
        assert!(SolverType::TimeEvolution { total_time: 0.0, time_steps: 10 }.validate().is_err());
        assert!(SolverType::TimeEvolution { total_time: 1.0, time_steps: 0 }.validate().is_err());
    }

    #[test]
    fn test_fixed_step_allows_zero_steps() {
        assert!(SolverType::FixedStep { dt: 0.1, steps: 0 }.validate().is_ok());
        assert!(SolverType::FixedStep { dt: -0.1, steps: 3 }.validate().is_err());
        assert!(SolverType::FixedStep { dt: f64::NAN, steps: 3 }.validate().is_err());
    }

    #[test]
    fn test_adaptive_validation() {
        let config = |time_points: Vec<f64>| SolverType::Adaptive {
            time_points,
            relative_tolerance: 1e-6,
            absolute_tolerance: 1e-9,
            max_steps: 10,
        };

        assert!(config(vec![0.0]).validate().is_ok());
        assert!(matches!(
            config(vec![]).validate(),
            Err(SimulationError::EmptyInput(_))
        ));
        assert!(config(vec![0.0, 1.0, 1.0]).validate().is_err());
        assert!(config(vec![0.0, f64::INFINITY]).validate().is_err());
    }

    #[test]
    fn test_fixed_step_extraction() {
        let (dt, steps) = SolverType::TimeEvolution { total_time: 2.0, time_steps: 4 }
            .fixed_step()
            .unwrap();
        assert_eq!(dt, 0.5);
        assert_eq!(steps, 4);
        assert!(
            SolverType::Adaptive {
                time_points: vec![0.0],
                relative_tolerance: 1e-3,
                absolute_tolerance: 1e-6,
                max_steps: 1,
            }
            .fixed_step()
            .is_none()
        );
    }

    #[test]
    fn test_configuration_builders() {
        let config = SolverConfiguration::fixed_step(0.1, 5).with_record_interval(0);
        assert_eq!(config.record_interval, 0);
        assert!(config.cancel.is_none());
        assert_eq!(SolverConfiguration::time_evolution(1.0, 1).record_interval, 1);
    }

    #[test]
    fn test_observation_series() {
        let result = SimulationResult::new(
            vec![0.0, 1.0],
            vec![profile_state(vec![5.0, 0.0]), profile_state(vec![4.0, 1.0])],
            profile_state(vec![4.0, 1.0]),
        );

        assert_eq!(result.observation_series(0).unwrap(), vec![5.0, 4.0]);
        assert_eq!(result.observation_series(1).unwrap(), vec![0.0, 1.0]);
        assert!(result.observation_series(2).is_err());
        assert!(result.cell_series(0, 0).is_err());
    }

    #[test]
    fn test_cell_series() {
        let layer = |value: f64| {
            PhysicalState::new(
                PhysicalQuantity::Concentration,
                PhysicalData::from_matrix(DMatrix::from_element(3, 3, value)),
            )
        };
        let result = SimulationResult::new(
            vec![0.0, 0.5, 1.0],
            vec![layer(0.0), layer(1.0), layer(2.0)],
            layer(2.0),
        );

        assert_eq!(result.cell_series(1, 1).unwrap(), vec![0.0, 1.0, 2.0]);
        assert!(result.cell_series(3, 0).is_err());
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_metadata() {
        let mut result = SimulationResult::new(vec![0.0], vec![profile_state(vec![1.0])], profile_state(vec![1.0]));
        result.add_metadata("solver", "Forward Euler");
        assert_eq!(result.metadata.get("solver"), Some(&"Forward Euler".to_string()));
    }
}
