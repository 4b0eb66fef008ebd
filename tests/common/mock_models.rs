//! Mock physical models for testing
//!
//! These models have known analytical solutions, making them
//! ideal for validating numerical solver accuracy.

use fern_rs::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};

// =================================================================================================
// Exponential Decay: dy/dt = -k*y
// =================================================================================================

/// Exponential decay model: dy/dt = -k*y
///
/// Analytical solution: y(t) = y₀ * exp(-k*t)
pub struct ExponentialDecay {
    pub points: usize,
    pub decay_rate: f64,
}

impl ExponentialDecay {
    pub fn new(points: usize, decay_rate: f64) -> Self {
        Self { points, decay_rate }
    }

    /// Compute analytical solution at time t
    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 * (-self.decay_rate * t).exp()
    }
}

impl PhysicalModel for ExponentialDecay {
    fn points(&self) -> usize {
        self.points
    }

    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
        let mut result = state.clone();

        if let Some(conc) = result.get_mut(PhysicalQuantity::Concentration) {
            conc.apply(|y| -self.decay_rate * y);
        }

        result
    }

    fn setup_initial_state(&self) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::uniform_vector(self.points, 1.0),
        )
    }

    fn name(&self) -> &str {
        "Exponential Decay"
    }
}

// =================================================================================================
// Constant Growth: dy/dt = c
// =================================================================================================

/// Constant growth model: dy/dt = c
///
/// Analytical solution: y(t) = y₀ + c*t. Every method in the crate is exact on it.
pub struct ConstantGrowth {
    pub points: usize,
    pub growth_rate: f64,
}

impl ConstantGrowth {
    pub fn new(points: usize, growth_rate: f64) -> Self {
        Self {
            points,
            growth_rate,
        }
    }

    pub fn analytical_solution(&self, t: f64, y0: f64) -> f64 {
        y0 + self.growth_rate * t
    }
}

impl PhysicalModel for ConstantGrowth {
    fn points(&self) -> usize {
        self.points
    }

    fn compute_physics(&self, _state: &PhysicalState) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::uniform_vector(self.points, self.growth_rate),
        )
    }

    fn setup_initial_state(&self) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::uniform_vector(self.points, 0.0),
        )
    }

    fn name(&self) -> &str {
        "Constant Growth"
    }
}
