//! Physical models traits and types
//!
//! This module defines the core API for physical models:
//! - `PhysicalModel`: trait for all transport models
//! - `PhysicalState`: flexible state container
//! - `PhysicalQuantity`: type-safe quantity identifiers

use std::collections::HashMap;
use std::fmt;

use crate::physics::PhysicalData;

// =================================================================================================
// Physical quantities (Type-safe Identifiers)
// =================================================================================================

/// Known physical quantities (type-safe enum)
///
/// # Example
/// ```
/// use fern_rs::physics::{PhysicalQuantity, PhysicalState, PhysicalData};
///
/// let nitrate = PhysicalQuantity::Custom("Nitrate");
/// let mut state = PhysicalState::empty();
/// state.set(nitrate, PhysicalData::uniform_vector(100, 0.0));
/// assert!(state.get(nitrate).is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalQuantity {
    /// Fertilizer concentration in soil water (ppm)
    Concentration,

    /// Custom quantity (for use extension)
    Custom(&'static str),
}

impl fmt::Display for PhysicalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalQuantity::Concentration => write!(f, "Concentration"),
            PhysicalQuantity::Custom(name) => write!(f, "{}", name),
        }
    }
}

// =================================================================================================
// Physical State (Flexible State Container)
// =================================================================================================

/// Physical state of the system
///
/// Contains every physical quantity at a given time. A state is also used to
/// carry time derivatives: `compute_physics` returns a `PhysicalState` whose
/// entries are dC/dt.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalState {
    quantities: HashMap<PhysicalQuantity, PhysicalData>,
}

impl PhysicalState {
    /// Create a new state with primary quantity
    pub fn new(quantity: PhysicalQuantity, value: PhysicalData) -> Self {
        let mut quantities = HashMap::new();
        quantities.insert(quantity, value);
        Self { quantities }
    }

    /// Create an empty state
    pub fn empty() -> Self {
        Self {
            quantities: HashMap::new(),
        }
    }

    /// Get a quantity by type
    pub fn get(&self, quantity: PhysicalQuantity) -> Option<&PhysicalData> {
        self.quantities.get(&quantity)
    }

    /// Get mutable reference to a quantity
    pub fn get_mut(&mut self, quantity: PhysicalQuantity) -> Option<&mut PhysicalData> {
        self.quantities.get_mut(&quantity)
    }

    /// Set a quantity
    pub fn set(&mut self, quantity: PhysicalQuantity, value: PhysicalData) {
        self.quantities.insert(quantity, value);
    }

    /// List of available physical state quantities
    pub fn available_quantities(&self) -> Vec<PhysicalQuantity> {
        self.quantities.keys().copied().collect()
    }

    /// Iterate over `(quantity, data)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&PhysicalQuantity, &PhysicalData)> {
        self.quantities.iter()
    }

    /// Number of stored quantities
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// True when no quantity is stored
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

// Operator overloading for numerical operations

impl std::ops::Add for PhysicalState {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (quantity, value) in rhs.quantities {
            match self.quantities.remove(&quantity) {
                Some(existing) => {
                    self.quantities.insert(quantity, existing + value);
                }
                None => {
                    self.quantities.insert(quantity, value);
                }
            }
        }
        self
    }
}

impl std::ops::Mul<f64> for PhysicalState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        let quantities = self
            .quantities
            .into_iter()
            .map(|(quantity, data)| (quantity, data * scalar))
            .collect();
        Self { quantities }
    }
}

// =================================================================================================
// Physical Model Trait
// =================================================================================================

/// Trait for physical models
///
/// # Responsibility
/// Computes the right-hand side of the semi-discrete transport equations
/// at a given state. Does NOT integrate them (that's the Solver's job).
///
/// The model provides the "physics" (spatial discretisation, sources,
/// boundary handling), the Solver provides the "numerics" (time stepping).
pub trait PhysicalModel: Send + Sync {
    /// Number of spatial points
    ///
    /// Used by the solver to check state sizes.
    fn points(&self) -> usize;

    /// Computes dC/dt at a given state
    ///
    /// Implementations must read `state` only: the returned derivative is
    /// computed entirely from the previous layer, and the solver combines it
    /// with the state afterwards.
    fn compute_physics(&self, state: &PhysicalState) -> PhysicalState;

    /// Creates the initial state for this physical model
    fn setup_initial_state(&self) -> PhysicalState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Description of the model (option)
    fn description(&self) -> Option<&str> {
        None
    }
}
