//! Adaptive Dormand-Prince 5(4) solver
//!
//! # Mathematical Background
//!
//! An embedded explicit Runge-Kutta pair: seven stages give a fifth-order
//! solution and a fourth-order companion whose difference estimates the local
//! error. The last stage is evaluated at the new solution, so it is reused as
//! the first stage of the next step (FSAL).
//!
//! ```text
//! err = ‖ h·Σ eᵢ kᵢ ‖,   ‖x‖ = sqrt( mean( (xᵢ / (atol + rtol·max(|yᵢ|, |ŷᵢ|)))² ) )
//! ```
//!
//! A step is accepted when `err ≤ 1`. The next step size is
//! `h·clamp(0.9·err^(-1/5), 0.2, 5)`, never growing after a rejection.
//!
//! # Output
//!
//! Steps are clipped so that every requested time point is hit exactly; the
//! state is recorded at each of them. The first time point is the time of the
//! initial condition.
//!
//! # Failure
//!
//! The run fails with [`SimulationError::IntegrationFailure`] when the step
//! size collapses below floating-point resolution, when `max_steps` attempts
//! are exhausted, or when the model keeps producing non-finite values.

use log::debug;

use crate::error::{Result, SimulationError};
use crate::physics::PhysicalState;
use crate::solver::{Scenario, SimulationResult, Solver, SolverConfiguration, SolverType};

// ====== Butcher tableau ======

// Models are autonomous, so the nodes c₂..c₇ never appear explicitly.
const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also the seventh stage row)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between fifth- and fourth-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

// ====== Step size control ======

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Adaptive Dormand-Prince 5(4) solver
///
/// Accepts `Adaptive` configurations only. `record_interval` is ignored:
/// the state is recorded at every requested time point.
///
/// # Example
///
/// ```rust
/// use fern_rs::solver::{DormandPrinceSolver, Solver};
///
/// assert_eq!(DormandPrinceSolver::new().name(), "Dormand-Prince 5(4)");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrinceSolver;

impl DormandPrinceSolver {
    /// Create a new adaptive solver
    pub fn new() -> Self {
        Self
    }
}

/// Tolerances of one run
#[derive(Debug, Clone, Copy)]
struct Tolerance {
    relative: f64,
    absolute: f64,
}

impl Tolerance {
    /// Weighted RMS norm of `x`, scaled by `y` and optionally `y_new`
    fn norm(&self, x: &PhysicalState, y: &PhysicalState, y_new: Option<&PhysicalState>) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;

        for (quantity, data) in x.iter() {
            let Some(reference) = y.get(*quantity) else {
                continue;
            };
            let reference = reference.as_slice();
            let updated = y_new
                .and_then(|state| state.get(*quantity))
                .map(|data| data.as_slice());

            for (i, value) in data.as_slice().iter().enumerate() {
                let mut magnitude = reference[i].abs();
                if let Some(updated) = updated {
                    magnitude = magnitude.max(updated[i].abs());
                }
                let scaled = value / (self.absolute + self.relative * magnitude);
                sum += scaled * scaled;
                count += 1;
            }
        }

        if count == 0 {
            0.0
        } else {
            (sum / count as f64).sqrt()
        }
    }
}

/// `y + h·Σ cᵢ·kᵢ`, skipping zero weights
fn combine(y: &PhysicalState, h: f64, terms: &[(f64, &PhysicalState)]) -> PhysicalState {
    terms
        .iter()
        .filter(|(weight, _)| *weight != 0.0)
        .fold(y.clone(), |acc, (weight, k)| acc + (*k).clone() * (h * weight))
}

/// `h·Σ cᵢ·kᵢ`
fn weighted_sum(h: f64, terms: &[(f64, &PhysicalState)]) -> PhysicalState {
    terms
        .iter()
        .fold(PhysicalState::empty(), |acc, (weight, k)| {
            acc + (*k).clone() * (h * weight)
        })
}

fn is_finite(state: &PhysicalState) -> bool {
    state.iter().all(|(_, data)| data.is_finite())
}

impl DormandPrinceSolver {
    /// Initial step size estimate (Hairer, Nørsett & Wanner, II.4)
    fn initial_step(
        &self,
        scenario: &Scenario,
        y0: &PhysicalState,
        f0: &PhysicalState,
        tolerance: Tolerance,
        span: f64,
    ) -> f64 {
        let d0 = tolerance.norm(y0, y0, None);
        let d1 = tolerance.norm(f0, y0, None);

        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        let h0 = h0.min(span);

        let y1 = combine(y0, h0, &[(1.0, f0)]);
        let f1 = scenario.model.compute_physics(&y1);
        let d2 = tolerance.norm(&(f1 + f0.clone() * -1.0), y0, None) / h0;

        let h1 = if d1.max(d2) <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / 5.0)
        };

        let h = (100.0 * h0).min(h1).min(span);
        if h.is_finite() && h > 0.0 { h } else { span }
    }
}

impl Solver for DormandPrinceSolver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        let (time_points, tolerance, max_steps) = match &config.solver_type {
            SolverType::Adaptive {
                time_points,
                relative_tolerance,
                absolute_tolerance,
                max_steps,
            } => (
                time_points.clone(),
                Tolerance {
                    relative: *relative_tolerance,
                    absolute: *absolute_tolerance,
                },
                *max_steps,
            ),
            other => {
                return Err(SimulationError::UnsupportedConfiguration {
                    solver: self.name(),
                    configuration: other.name().to_string(),
                });
            }
        };

        // ====== Step 2: Setup ======

        let t_start = time_points[0];
        let t_end = time_points[time_points.len() - 1];

        let mut y = scenario.initial_state()?.clone();
        let mut t = t_start;

        let mut trajectory = Vec::with_capacity(time_points.len());
        trajectory.push(y.clone());

        let mut k1 = scenario.model.compute_physics(&y);
        let mut evaluations = 1usize;

        let mut h = if t_end > t_start {
            evaluations += 1;
            self.initial_step(scenario, &y, &k1, tolerance, t_end - t_start)
        } else {
            0.0
        };

        let mut attempts = 0usize;
        let mut accepted = 0usize;
        let mut rejected = 0usize;

        // ====== Step 3: Integration ======

        for &target in &time_points[1..] {
            while t < target {
                if attempts >= max_steps {
                    return Err(SimulationError::IntegrationFailure {
                        time: t,
                        reason: format!("step budget of {} attempts exhausted", max_steps),
                    });
                }
                crate::solver::poll_cancellation(config, attempts)?;
                attempts += 1;

                let min_step = 10.0 * f64::EPSILON * t.abs().max(target.abs()).max(1.0);
                if h < min_step {
                    return Err(SimulationError::IntegrationFailure {
                        time: t,
                        reason: format!("step size {:e} fell below {:e}", h, min_step),
                    });
                }

                // Clip to land on the requested time
                let reaches_target = t + h >= target;
                let step = if reaches_target { target - t } else { h };

                // ====== Stages ======

                let k2 = scenario
                    .model
                    .compute_physics(&combine(&y, step, &[(A21, &k1)]));
                let k3 = scenario
                    .model
                    .compute_physics(&combine(&y, step, &[(A31, &k1), (A32, &k2)]));
                let k4 = scenario.model.compute_physics(&combine(
                    &y,
                    step,
                    &[(A41, &k1), (A42, &k2), (A43, &k3)],
                ));
                let k5 = scenario.model.compute_physics(&combine(
                    &y,
                    step,
                    &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)],
                ));
                let k6 = scenario.model.compute_physics(&combine(
                    &y,
                    step,
                    &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
                ));

                let y_new = combine(
                    &y,
                    step,
                    &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
                );
                let k7 = scenario.model.compute_physics(&y_new);
                evaluations += 6;

                let error_estimate = weighted_sum(
                    step,
                    &[(E1, &k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
                );
                let error = tolerance.norm(&error_estimate, &y, Some(&y_new));

                // ====== Accept / reject ======

                if !error.is_finite() || !is_finite(&y_new) || !is_finite(&k7) {
                    rejected += 1;
                    h = step * MIN_FACTOR;
                    continue;
                }

                if error <= 1.0 {
                    t = if reaches_target { target } else { t + step };
                    y = y_new;
                    k1 = k7;
                    accepted += 1;

                    let factor = if error == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * error.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    // A clipped step says nothing about the natural step size
                    h = if reaches_target {
                        h.max(step * factor)
                    } else {
                        step * factor
                    };
                } else {
                    rejected += 1;
                    let factor = (SAFETY * error.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, 1.0);
                    h = step * factor;
                }
            }

            trajectory.push(y.clone());
        }

        // ====== Step 4: Build Result ======

        debug!(
            "{}: {} accepted, {} rejected steps, {} evaluations on '{}'",
            self.name(),
            accepted,
            rejected,
            evaluations,
            scenario.get_model_name()
        );

        let mut result = SimulationResult::new(time_points, trajectory, y);
        result.add_metadata("solver", self.name());
        result.add_metadata("accepted steps", &accepted.to_string());
        result.add_metadata("rejected steps", &rejected.to_string());
        result.add_metadata("function evaluations", &evaluations.to_string());
        result.add_metadata("relative tolerance", &tolerance.relative.to_string());
        result.add_metadata("absolute tolerance", &tolerance.absolute.to_string());

        Ok(result)
    }

    fn name(&self) -> &'static str {
        "Dormand-Prince 5(4)"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
