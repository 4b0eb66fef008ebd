//! Numerical solvers
//!
//! This module provides traits and implementations for numerical solvers.
//! A numerical solver applies a time-integration method to the equations
//! provided by a physical model within a specific scenario.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Physical model (equations)
//!    - Domain boundaries (initial condition)
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Solver type (uniform, fixed step, adaptive)
//!    - Recording interval and cancellation
//!
//! 3. **Solver** (`Solver` trait) - The numerical method
//!    - `EulerSolver`: forward Euler, used for the explicit 2D field scheme
//!    - `RK4Solver`: classical fourth-order Runge-Kutta
//!    - `DormandPrinceSolver`: adaptive 5(4) pair, used for the soil column
//!
//! # Quick Start Example
//!
//! ```rust
//! use fern_rs::config::ColumnParameters;
//! use fern_rs::models::{Injection, ReactionConvectionDiffusion1D};
//! use fern_rs::physics::PhysicalModel;
//! use fern_rs::solver::{
//!     DomainBoundaries, DormandPrinceSolver, Scenario, Solver, SolverConfiguration,
//! };
//!
//! # fn main() -> fern_rs::error::Result<()> {
//! let params = ColumnParameters { points: 20, ..Default::default() };
//! let model = ReactionConvectionDiffusion1D::from_injection(&params, &Injection::point(0, 5.0))?;
//! let boundaries = DomainBoundaries::temporal(model.setup_initial_state());
//! let scenario = Scenario::new(Box::new(model), boundaries);
//!
//! let config = SolverConfiguration::adaptive(vec![0.0, 0.5, 1.0], 1e-6, 1e-9, 10_000);
//! let result = DormandPrinceSolver::new().solve(&scenario, &config)?;
//!
//! assert_eq!(result.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │  Physical Model │  (equations)
//! └────────┬────────┘
//!          │
//!          ├──────────────┐
//!          │              │
//! ┌────────▼────────┐ ┌──▼──────────────┐
//! │ Domain          │ │ Scenario        │ ← WHAT to solve
//! │ Boundaries      │ │ (model + bounds)│
//! └─────────────────┘ └────────┬────────┘
//!                              │
//!                     ┌────────▼─────────────┐
//!                     │ Solver Configuration │ ← HOW to solve
//!                     │ (type + run control) │
//!                     └────────┬─────────────┘
//!                              │
//!                     ┌────────▼────────┐
//!                     │ Numerical Solver│ ← The method
//!                     │ (Euler, RK4...) │
//!                     └────────┬────────┘
//!                              │
//!                     ┌────────▼────────────┐
//!                     │ Simulation Result   │ ← The solution
//!                     │ (trajectory + meta) │
//!                     └─────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Every solver returns [`SimulationError`]:
//! - invalid configuration (negative time, unordered time points)
//! - invalid scenario (missing initial condition, size mismatch)
//! - numerical instability (NaN or Inf in the state)
//! - integration failure (adaptive step size collapse)
//! - cancellation

// =================================================================================================
// Module Declarations
// =================================================================================================
mod boundary;
mod cancel;
mod methods;
mod scenario;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is a numerical-execution concern,
// so it lives here rather than in physics/data.rs.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (benchmarks, tests) without a mutex on every `apply()` call.
// Relaxed ordering is enough: the value is a performance hint.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of elements above which [`PhysicalData::apply()`](crate::physics::PhysicalData::apply)
/// and the 2D stencil switch to parallel iteration.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// Sequential iteration is used below this many elements. Above it, Rayon is
/// used, but only when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use fern_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.
///
/// # Example
///
/// ```rust
/// use fern_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold and restores it on drop.
///
/// Only compiled in test builds.
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use boundary::DomainBoundaries;
pub use cancel::{CANCEL_POLL_INTERVAL, CancellationToken};
pub use methods::{DormandPrinceSolver, EulerSolver, RK4Solver};
pub use scenario::Scenario;
pub use traits::{SimulationResult, Solver, SolverConfiguration, SolverType};

// =================================================================================================
// Helper Functions
// =================================================================================================

use log::warn;

use crate::error::{Result, SimulationError};
use crate::physics::PhysicalState;

/// Validate physical state for numerical issues
///
/// Fails with [`SimulationError::NumericalInstability`] on the first NaN or
/// infinite value.
pub(crate) fn validate_state(state: &PhysicalState, step: usize) -> Result<()> {
    for (quantity, data) in state.iter() {
        if !data.is_finite() {
            return Err(SimulationError::NumericalInstability {
                quantity: quantity.to_string(),
                step,
            });
        }
    }
    Ok(())
}

/// Poll the cancellation token every [`CANCEL_POLL_INTERVAL`] steps
pub(crate) fn poll_cancellation(config: &SolverConfiguration, step: usize) -> Result<()> {
    if step % CANCEL_POLL_INTERVAL != 0 {
        return Ok(());
    }
    if let Some(token) = &config.cancel
        && token.is_cancelled()
    {
        warn!("Simulation cancelled at step {}", step);
        return Err(SimulationError::Cancelled { step });
    }
    Ok(())
}

/// Trajectory storage for fixed-step methods
///
/// Keeps the initial state, every `interval`-th step, and always the final
/// state. With `interval == 0` only the first and last states are kept.
pub(crate) struct Recorder {
    interval: usize,
    last_step: usize,
    time_points: Vec<f64>,
    trajectory: Vec<PhysicalState>,
}

impl Recorder {
    pub(crate) fn new(interval: usize, steps: usize, initial: &PhysicalState) -> Self {
        let capacity = match interval {
            0 => 2,
            k => steps / k + 2,
        };
        let mut time_points = Vec::with_capacity(capacity);
        let mut trajectory = Vec::with_capacity(capacity);
        time_points.push(0.0);
        trajectory.push(initial.clone());

        Self {
            interval,
            last_step: 0,
            time_points,
            trajectory,
        }
    }

    /// Record `state` reached after `step` steps if it falls on the interval
    pub(crate) fn record(&mut self, step: usize, time: f64, state: &PhysicalState) {
        if self.interval > 0 && step % self.interval == 0 {
            self.push(step, time, state);
        }
    }

    /// Make sure the final state is the last recorded entry
    pub(crate) fn finish(
        mut self,
        step: usize,
        time: f64,
        state: &PhysicalState,
    ) -> (Vec<f64>, Vec<PhysicalState>) {
        if step != self.last_step {
            self.push(step, time, state);
        }
        (self.time_points, self.trajectory)
    }

    fn push(&mut self, step: usize, time: f64, state: &PhysicalState) {
        self.last_step = step;
        self.time_points.push(time);
        self.trajectory.push(state.clone());
    }
}

// =================================================================================================
// Tests
// =================================================================================================
