//! Classical fourth-order Runge-Kutta solver
//!
//! # Mathematical Background
//!
//! ```text
//! k₁ = f(yₙ)
//! k₂ = f(yₙ + dt/2·k₁)
//! k₃ = f(yₙ + dt/2·k₂)
//! k₄ = f(yₙ + dt·k₃)
//! yₙ₊₁ = yₙ + dt/6·(k₁ + 2k₂ + 2k₃ + k₄)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: Fourth-order accurate (global error ~ O(dt⁴))
//! - **Stability**: Conditionally stable, larger region than Euler
//! - **Complexity**: 4 function evaluations per step
//!
//! Fixed-step cross-check for the adaptive
//! [`DormandPrinceSolver`](crate::solver::DormandPrinceSolver) on the soil
//! column, and an alternative when a uniform time grid is wanted.

use log::debug;

use crate::error::{Result, SimulationError};
use crate::solver::{
    Recorder, Scenario, SimulationResult, Solver, SolverConfiguration, poll_cancellation,
    validate_state,
};

/// Classical Runge-Kutta 4 solver
///
/// Accepts `TimeEvolution` and `FixedStep` configurations.
///
/// # Example
///
/// ```rust
/// use fern_rs::solver::{RK4Solver, Solver};
///
/// let solver = RK4Solver::new();
/// assert_eq!(solver.name(), "Runge-Kutta 4");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RK4Solver;

impl RK4Solver {
    /// Create a new RK4 solver
    pub fn new() -> Self {
        Self
    }
}

impl Solver for RK4Solver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (dt, time_steps) = config.solver_type.fixed_step().ok_or_else(|| {
            SimulationError::UnsupportedConfiguration {
                solver: self.name(),
                configuration: config.solver_type.name().to_string(),
            }
        })?;

        // ====== Step 2: Setup ======

        let mut state = scenario.initial_state()?.clone();
        let mut recorder = Recorder::new(config.record_interval, time_steps, &state);

        debug!(
            "{}: {} steps of dt = {} on '{}'",
            self.name(),
            time_steps,
            dt,
            scenario.get_model_name()
        );

        // ====== Step 3: Time Integration ======

        for step in 0..time_steps {
            poll_cancellation(config, step)?;

            // ====== RK4 Stages ======

            let k1 = scenario.model.compute_physics(&state);

            let state_k2 = state.clone() + k1.clone() * (dt / 2.0);
            let k2 = scenario.model.compute_physics(&state_k2);

            let state_k3 = state.clone() + k2.clone() * (dt / 2.0);
            let k3 = scenario.model.compute_physics(&state_k3);

            let state_k4 = state.clone() + k3.clone() * dt;
            let k4 = scenario.model.compute_physics(&state_k4);

            // ====== RK4 Update ======

            // Simpson weights: endpoints 1/6, midpoints 1/3
            let weighted_slope = k1 + k2 * 2.0 + k3 * 2.0 + k4;
            state = state + weighted_slope * (dt / 6.0);

            let t = (step as f64 + 1.0) * dt;

            validate_state(&state, step + 1)?;
            recorder.record(step + 1, t, &state);
        }

        // ====== Step 4: Build Result ======

        let total_time = time_steps as f64 * dt;
        let (time_points, trajectory) = recorder.finish(time_steps, total_time, &state);
        let mut result = SimulationResult::new(time_points, trajectory, state);

        result.add_metadata("solver", self.name());
        result.add_metadata("time steps", &time_steps.to_string());
        result.add_metadata("dt", &dt.to_string());
        result.add_metadata("total time", &total_time.to_string());
        result.add_metadata("function evaluations", &(4 * time_steps).to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
