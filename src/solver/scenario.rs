//! Simulation scenario definition
//!
//! A scenario combines a physical model with boundary conditions.

use crate::error::{Result, SimulationError};
use crate::physics::{PhysicalModel, PhysicalState};
use crate::solver::DomainBoundaries;

/// Simulation scenario
///
/// Defines a specific case to simulate:
/// - Physical model (equations)
/// - Boundary conditions (initial condition)
///
/// The same scenario can be solved with different numerical methods.
/// This is the "WHAT to solve" (not "HOW to solve").
pub struct Scenario {
    /// Physical model (equations)
    pub model: Box<dyn PhysicalModel>,

    /// Conditions and boundaries
    pub conditions: DomainBoundaries,
}

impl Scenario {
    /// Create a scenario
    pub fn new(model: Box<dyn PhysicalModel>, conditions: DomainBoundaries) -> Self {
        Self { model, conditions }
    }

    /// Verify boundaries and that the initial condition matches the model grid
    pub fn validate(&self) -> Result<()> {
        self.conditions.validate()?;

        let initial = self.initial_state()?;
        let points = self.model.points();
        for (quantity, data) in initial.iter() {
            if data.len() != points {
                return Err(SimulationError::invalid(
                    "initial_condition",
                    format!(
                        "{} holds {} values but '{}' has {} points",
                        quantity,
                        data.len(),
                        self.model.name(),
                        points
                    ),
                ));
            }
            if !data.is_finite() {
                return Err(SimulationError::invalid(
                    "initial_condition",
                    format!("{} contains non-finite values", quantity),
                ));
            }
        }
        Ok(())
    }

    /// Initial condition from the temporal boundary
    pub fn initial_state(&self) -> Result<&PhysicalState> {
        self.conditions.initial_condition().ok_or_else(|| {
            SimulationError::invalid(
                "initial_condition",
                "no initial condition found in domain boundaries",
            )
        })
    }

    /// Get model name
    pub fn get_model_name(&self) -> &str {
        self.model.name()
    }

    /// Number of spatial dimensions
    pub fn sdim(&self) -> usize {
        self.conditions.sdim()
    }

    /// Time dependant equations
    pub fn is_time_dependent(&self) -> bool {
        self.conditions.is_time_dependent()
    }
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.get_model_name())
            .field("points", &self.model.points())
            .field("is time dependent", &self.is_time_dependent())
            .field("Boundaries / conditions", &self.conditions)
            .finish()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
