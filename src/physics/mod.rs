//! Physical models
//!
//! This module provides traits and implementations for physical models.
//! A physical model encapsulates the transport equations of a system
//! (fertilizer moving through a soil column, or spreading over a farm).
//!
//! # Core Concepts
//!
//! - **Physical Model**: Computes dC/dt at a given state
//! - **Physical State**: Container for all physical quantities
//! - **Physical Quantity**: Type-safe identifier for physical variables
//! - **Operators**: Finite-difference stencils shared by the models
//!
//! # Architecture
//!
//! Physical models are **separate from numerical solvers**:
//! - The model provides the **equations** (physics)
//! - The solver provides the **method** to integrate them (numerics)
//!
//! # Example
//!
//! ```rust
//! use fern_rs::physics::{PhysicalModel, PhysicalState, PhysicalQuantity, PhysicalData};
//!
//! struct Decay {
//!     rate: f64,
//! }
//!
//! impl PhysicalModel for Decay {
//!     fn points(&self) -> usize { 1 }
//!
//!     fn compute_physics(&self, state: &PhysicalState) -> PhysicalState {
//!         let c = state.get(PhysicalQuantity::Concentration).unwrap().clone();
//!         PhysicalState::new(PhysicalQuantity::Concentration, c * -self.rate)
//!     }
//!
//!     fn setup_initial_state(&self) -> PhysicalState {
//!         PhysicalState::new(PhysicalQuantity::Concentration, PhysicalData::from_vec(vec![1.0]))
//!     }
//!
//!     fn name(&self) -> &str { "Decay" }
//! }
//!
//! let model = Decay { rate: 0.5 };
//! let initial_state = model.setup_initial_state();
//! let derivative = model.compute_physics(&initial_state);
//! assert_eq!(derivative.get(PhysicalQuantity::Concentration).unwrap().as_slice(), &[-0.5]);
//! ```

pub mod data;
pub mod operators;
pub mod traits;

pub use data::PhysicalData;
pub use traits::{PhysicalModel, PhysicalQuantity, PhysicalState};
