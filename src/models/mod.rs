//! Physical models for fertilizer transport
//!
//! All models implement the [`PhysicalModel`](crate::physics::PhysicalModel) trait.
//! The solver calls `compute_physics` at each time step: models are responsible
//! for the physics (transport, decay, sources), the solver for the time integration.
//!
//! # Available Models
//!
//! ## [`ReactionConvectionDiffusion1D`]: soil column
//!
//! Fertilizer moving down a one-dimensional column with diffusion, downward
//! convection, first-order decay and a uniform source. Integrated with the
//! adaptive [`DormandPrinceSolver`](crate::solver::DormandPrinceSolver).
//!
//! ## [`MaskedConvectionDiffusion2D`]: farm field
//!
//! Fertilizer spreading over a rectangular farm grid driven by a uniform wind
//! or surface flow. Cells outside the farm are excluded by an
//! [`InclusionMask`]. Integrated with explicit forward Euler steps.
//!
//! # Initial placement
//!
//! [`Injection`] describes where the fertilizer sits at t = 0, as a column
//! profile or as a field.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod injection;
pub mod mask;
pub mod masked_2d;
pub mod transport_1d;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use injection::Injection;
pub use mask::{GridExtent, InclusionMask, Polygon};
pub use masked_2d::MaskedConvectionDiffusion2D;
pub use transport_1d::ReactionConvectionDiffusion1D;
