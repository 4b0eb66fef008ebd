//! Forward Euler numerical solver
//!
//! # Mathematical Background
//!
//! The Forward Euler method is the simplest explicit time-stepping scheme
//! for solving ordinary differential equations (ODEs):
//!
//! ```text
//! dy/dt = f(y)
//! y_{n+1} = y_n + dt * f(y_n)
//! ```
//!
//! # Characteristics
//!
//! - **Order**: First-order accurate (error ~ O(dt))
//! - **Stability**: Conditionally stable (requires small time steps)
//! - **Complexity**: 1 function evaluation per step
//!
//! # Role in this crate
//!
//! Combined with [`MaskedConvectionDiffusion2D`](crate::models::MaskedConvectionDiffusion2D),
//! whose right-hand side is a central-difference stencil, this is the FTCS
//! scheme used for the farm field. The derivative is computed entirely from
//! `y_n` before `y_{n+1}` is formed, so every update in a step reads the
//! previous layer only.
//!
//! # Example
//!
//! ```rust
//! use fern_rs::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};
//! use fern_rs::solver::{DomainBoundaries, EulerSolver, Scenario, Solver, SolverConfiguration};
//!
//! struct Growth;
//!
//! impl PhysicalModel for Growth {
//!     fn points(&self) -> usize { 1 }
//!     fn compute_physics(&self, _state: &PhysicalState) -> PhysicalState {
//!         PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(vec![2.0]))
//!     }
//!     fn setup_initial_state(&self) -> PhysicalState {
//!         PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(vec![0.0]))
//!     }
//!     fn name(&self) -> &str { "Growth" }
//! }
//!
//! # fn main() -> fern_rs::error::Result<()> {
//! let boundaries = DomainBoundaries::temporal(Growth.setup_initial_state());
//! let scenario = Scenario::new(Box::new(Growth), boundaries);
//!
//! let result = EulerSolver::new().solve(&scenario, &SolverConfiguration::time_evolution(1.0, 10))?;
//! assert!((result.observation_series(0)?[10] - 2.0).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

use log::debug;

use crate::error::{Result, SimulationError};
use crate::physics::PhysicalState;
use crate::solver::{
    Recorder, Scenario, SimulationResult, Solver, SolverConfiguration, poll_cancellation,
    validate_state,
};

// =================================================================================================
// Forward Euler Solver
// =================================================================================================

/// Forward Euler time-stepping solver
///
/// # Algorithm
///
/// 1. Start with initial state y_0
/// 2. For each time step n = 0, 1, ..., N-1:
///    - Compute physics: k = f(y_n)
///    - Update state: y_{n+1} = y_n + dt * k
///    - Record the state if it falls on the recording interval
/// 3. Return the recorded trajectory
///
/// Accepts `TimeEvolution` and `FixedStep` configurations. A `FixedStep`
/// configuration with zero steps returns the initial state unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSolver;

impl EulerSolver {
    /// Create a new Forward Euler solver
    pub fn new() -> Self {
        Self
    }
}

impl Solver for EulerSolver {
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

        let mut state: PhysicalState = scenario.initial_state()?.clone();
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

            // f(y_n) is evaluated on the whole previous layer first
            let physics = scenario.model.compute_physics(&state);
            state = state + physics * dt;

            // Time from the index, not by accumulation
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

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Forward Euler"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
