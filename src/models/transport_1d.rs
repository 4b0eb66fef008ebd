//! Reaction-convection-diffusion along a soil column
//!
//! # Equation
//!
//! ```text
//! ∂C/∂t = D·∂²C/∂x² − v·∂C/∂x − R·C + S
//! ```
//!
//! Discretised with the method of lines on a uniform grid of `N` points:
//! the first derivative is the numerical [`gradient`] and the second derivative
//! is the gradient of the gradient, both one-sided at the two ends of the
//! column. The resulting ODE system is handed to a time integrator, usually
//! [`DormandPrinceSolver`](crate::solver::DormandPrinceSolver).
//!
//! # Example
//!
//! ```rust
//! use fern_rs::config::ColumnParameters;
//! use fern_rs::models::{Injection, ReactionConvectionDiffusion1D};
//! use fern_rs::physics::PhysicalModel;
//!
//! let params = ColumnParameters::default();
//! let model = ReactionConvectionDiffusion1D::from_injection(&params, &Injection::point(0, 5.0)).unwrap();
//!
//! assert_eq!(model.points(), 100);
//! ```

use nalgebra::DVector;

use crate::config::ColumnParameters;
use crate::error::{Result, SimulationError};
use crate::models::Injection;
use crate::physics::operators::{gradient, laplacian};
use crate::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};

/// 1D reaction-convection-diffusion model
#[derive(Clone, Debug)]
pub struct ReactionConvectionDiffusion1D {
    /// Diffusion coefficient D
    diffusion: f64,
    /// Convection velocity v
    velocity: f64,
    /// Decay rate R
    reaction_rate: f64,
    /// Uniform source S
    source_strength: f64,
    /// Grid spacing dx
    spacing: f64,
    /// Profile at t = 0
    initial: DVector<f64>,
}

impl ReactionConvectionDiffusion1D {
    /// Create a model from coefficients and an explicit initial profile
    ///
    /// The number of grid points is the length of `initial_profile`;
    /// `params.points` is only used by [`from_injection`](Self::from_injection).
    pub fn new(params: &ColumnParameters, initial_profile: DVector<f64>) -> Result<Self> {
        let column = ColumnParameters {
            points: initial_profile.len(),
            ..params.clone()
        };
        column.validate()?;

        if initial_profile.iter().any(|c| !c.is_finite()) {
            return Err(SimulationError::invalid(
                "initial_profile",
                "must contain finite values only",
            ));
        }

        Ok(Self {
            diffusion: params.diffusion,
            velocity: params.velocity,
            reaction_rate: params.reaction_rate,
            source_strength: params.source_strength,
            spacing: params.spacing,
            initial: initial_profile,
        })
    }

    /// Create a model of `params.points` points seeded by `injection`
    pub fn from_injection(params: &ColumnParameters, injection: &Injection) -> Result<Self> {
        params.validate()?;
        Self::new(params, injection.profile(params.points)?)
    }

    /// Right-hand side `D·L(C) − v·G(C) − R·C + S`
    pub fn rate(&self, concentration: &DVector<f64>) -> DVector<f64> {
        let dx = self.spacing;
        let diffusion = laplacian(concentration, dx) * self.diffusion;
        let convection = gradient(concentration, dx) * self.velocity;

        let mut rate = diffusion - convection - concentration * self.reaction_rate;
        rate.add_scalar_mut(self.source_strength);
        rate
    }

    /// Initial profile
    pub fn initial_profile(&self) -> &DVector<f64> {
        &self.initial
    }
}

impl PhysicalModel for ReactionConvectionDiffusion1D {
    fn points(&self) -> usize {
        self.initial.len()
    }

    /// # Panics
    ///
    /// Panics when `state` carries no 1D concentration profile. Scenarios
    /// built from [`setup_initial_state`](Self::setup_initial_state) always do.
    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
        let profile = state
            .get(PhysicalQuantity::Concentration)
            .and_then(PhysicalData::try_as_vector)
            .expect("Concentration profile is required");

        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::Vector(self.rate(profile)),
        )
    }

    fn setup_initial_state(&self) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::Vector(self.initial.clone()),
        )
    }

    fn name(&self) -> &str {
        "Reaction-convection-diffusion 1D"
    }

    fn description(&self) -> Option<&str> {
        Some("Soil column, method of lines with one-sided differences at both ends")
    }
}

// =================================================================================================
// Tests
// =================================================================================================
