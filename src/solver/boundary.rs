//! Domain boundaries with time convention
//!
//! # Design Philosophy
//!
//! A domain is a list of named dimensions, each carrying the physical states
//! that bound it, plus a [`TimeAxisConvention`] telling which dimension (if
//! any) is time. For a time-dependent run the temporal dimension holds the
//! initial condition.
//!
//! Spatial edge treatment of the transport models (one-sided differences at
//! the column ends, frozen border cells on the field) lives in the models
//! themselves, so the scenarios built by this crate only carry a temporal
//! dimension.

use std::fmt;

use crate::error::{Result, SimulationError};
use crate::physics::PhysicalState;

// =================================================================================================
// Domain Boundaries
// =================================================================================================

/// n-dimensional domain boundaries
///
/// # Examples
///
/// ```rust
/// use fern_rs::physics::{PhysicalData, PhysicalQuantity, PhysicalState};
/// use fern_rs::solver::DomainBoundaries;
///
/// let initial = PhysicalState::new(
///     PhysicalQuantity::Concentration,
///     PhysicalData::uniform_vector(10, 0.0),
/// );
/// let boundaries = DomainBoundaries::temporal(initial);
///
/// assert_eq!(boundaries.ndim(), 1);
/// assert_eq!(boundaries.sdim(), 0);
/// assert!(boundaries.is_time_dependent());
/// ```
#[derive(Debug, Clone)]
pub struct DomainBoundaries {
    /// Boundaries for each dimension
    pub dimensions: Vec<DimensionBoundary>,

    /// Convention for identifying the time dimension
    pub convention: TimeAxisConvention,
}

impl DomainBoundaries {
    /// Create with the default convention (time is the last dimension)
    pub fn new(dimensions: Vec<DimensionBoundary>) -> Self {
        Self {
            dimensions,
            convention: TimeAxisConvention::Last,
        }
    }

    /// Create temporal-only domain (ODE after spatial discretisation)
    pub fn temporal(initial: PhysicalState) -> Self {
        Self::new(vec![DimensionBoundary::new("t", vec![initial])])
    }

    // ===================================== Query methods =========================================

    /// Total number of dimensions
    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// Number of spatial dimensions
    pub fn sdim(&self) -> usize {
        match self.convention {
            TimeAxisConvention::None => self.ndim(),
            _ => self.ndim().saturating_sub(1),
        }
    }

    /// Check time dependant equation
    pub fn is_time_dependent(&self) -> bool {
        self.convention != TimeAxisConvention::None
    }

    /// Get time dimension index
    pub fn time_index(&self) -> Option<usize> {
        match self.convention {
            TimeAxisConvention::Last => self.ndim().checked_sub(1),
            TimeAxisConvention::First => Some(0),
            TimeAxisConvention::None => None,
        }
    }

    /// Initial condition: first state of the temporal dimension
    pub fn initial_condition(&self) -> Option<&PhysicalState> {
        self.time_index()
            .and_then(|index| self.dimensions.get(index))
            .and_then(|boundary| boundary.first())
    }

    /// Get dimension by its name
    pub fn get_boundary(&self, name: &str) -> Option<&DimensionBoundary> {
        self.dimensions.iter().find(|boundary| boundary.name == name)
    }

    /// Validate the object contents
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.is_empty() {
            return Err(SimulationError::invalid(
                "boundaries",
                "dimension boundaries cannot be empty",
            ));
        }

        for dimension in &self.dimensions {
            dimension.validate()?;
        }

        let names: std::collections::HashSet<&str> =
            self.dimensions.iter().map(|d| d.name.as_str()).collect();
        if names.len() != self.dimensions.len() {
            return Err(SimulationError::invalid(
                "boundaries",
                "two dimensions share the same name",
            ));
        }

        Ok(())
    }
}

impl Default for DomainBoundaries {
    fn default() -> Self {
        Self {
            dimensions: Vec::new(),
            convention: TimeAxisConvention::None,
        }
    }
}

// =================================================================================================
// Dimension Boundary
// =================================================================================================

/// Boundary for one dimension
///
/// - 1 state: temporal dimension (initial condition)
/// - 2 states: spatial dimension (lower, upper)
#[derive(Debug, Clone)]
pub struct DimensionBoundary {
    /// Dimension name
    pub name: String,

    /// Physical states at boundaries
    pub states: Vec<PhysicalState>,
}

impl DimensionBoundary {
    /// Generic constructor
    pub fn new(name: impl Into<String>, states: Vec<PhysicalState>) -> Self {
        Self {
            name: name.into(),
            states,
        }
    }

    /// Get first boundary state
    pub fn first(&self) -> Option<&PhysicalState> {
        self.states.first()
    }

    /// Get last boundary state
    pub fn last(&self) -> Option<&PhysicalState> {
        self.states.last()
    }

    /// Number of boundary states
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Verify if there are no boundaries
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(SimulationError::invalid(
                "boundaries",
                format!("dimension '{}' has no boundary state", self.name),
            ));
        }
        Ok(())
    }
}

// =================================================================================================
// Time Axis Convention
// =================================================================================================

/// Which dimension carries time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAxisConvention {
    /// No time dimension (steady-state)
    None,

    /// First dimension is time (t, x, y, ...)
    First,

    /// Last dimension is time (x, y, ..., t)
    Last,
}

impl fmt::Display for TimeAxisConvention {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeAxisConvention::None => write!(f, "None"),
            TimeAxisConvention::First => write!(f, "First"),
            TimeAxisConvention::Last => write!(f, "Last"),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PhysicalData, PhysicalQuantity};

    fn profile(values: &[f64]) -> PhysicalState {
        PhysicalState::new(
            PhysicalQuantity::Concentration,
            PhysicalData::from_vec(values.to_vec()),
        )
    }

    #[test]
    fn test_axis_convention_display() {
        assert_eq!(TimeAxisConvention::First.to_string(), "First");
        assert_eq!(TimeAxisConvention::Last.to_string(), "Last");
        assert_eq!(TimeAxisConvention::None.to_string(), "None");
    }

    #[test]
    fn test_dimension_boundary_content() {
        let dimension = DimensionBoundary::new("x", vec![profile(&[1.0]), profile(&[2.0])]);

        assert_eq!(dimension.size(), 2);
        assert_eq!(
            dimension.first().unwrap().get(PhysicalQuantity::Concentration).unwrap().as_slice(),
            &[1.0]
        );
        assert_eq!(
            dimension.last().unwrap().get(PhysicalQuantity::Concentration).unwrap().as_slice(),
            &[2.0]
        );
    }

    #[test]
    fn test_temporal_initial_condition() {
        let boundaries = DomainBoundaries::temporal(profile(&[5.0, 0.0]));

        assert!(boundaries.validate().is_ok());
        assert_eq!(boundaries.time_index(), Some(0));
        assert!(boundaries.get_boundary("t").is_some());
        assert_eq!(
            boundaries
                .initial_condition()
                .unwrap()
                .get(PhysicalQuantity::Concentration)
                .unwrap()
                .as_slice(),
            &[5.0, 0.0]
        );
    }

    #[test]
    fn test_default_has_no_initial_condition() {
        let boundaries = DomainBoundaries::default();

        assert!(!boundaries.is_time_dependent());
        assert!(boundaries.initial_condition().is_none());
        assert!(boundaries.validate().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let boundaries = DomainBoundaries::new(vec![
            DimensionBoundary::new("t", vec![profile(&[0.0])]),
            DimensionBoundary::new("t", vec![profile(&[0.0])]),
        ]);
        assert!(boundaries.validate().is_err());
        assert_eq!(boundaries.sdim(), 1);
    }

    #[test]
    fn test_empty_dimension_rejected() {
        let boundaries = DomainBoundaries::new(vec![DimensionBoundary::new("t", vec![])]);
        assert!(boundaries.validate().is_err());
    }
}
