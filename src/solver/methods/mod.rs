//! Numerical methods for solving differential equations
//!
//! This module contains concrete implementations of the [`Solver`](crate::solver::Solver) trait.
//!
//! # Available Methods
//!
//! ## Fixed-step explicit methods
//!
//! - **[`EulerSolver`]**: Forward Euler method
//!   - Order: First-order O(dt)
//!   - Cost: 1 function evaluation per step
//!   - Use: the explicit 2D field scheme (FTCS)
//!
//! - **[`RK4Solver`]**: Classical fourth-order Runge-Kutta
//!   - Order: Fourth-order O(dt⁴)
//!   - Cost: 4 function evaluations per step
//!   - Use: uniform-grid runs of the soil column, cross-checks
//!
//! ## Adaptive methods
//!
//! - **[`DormandPrinceSolver`]**: embedded Runge-Kutta 5(4) pair
//!   - Order: fifth-order solution, fourth-order error estimate
//!   - Cost: 6 function evaluations per accepted step (FSAL)
//!   - Use: the soil column, reported at caller-chosen times
//!
//! # Design Philosophy
//!
//! Each solver is:
//! - **Self-contained**: No shared mutable state
//! - **Stateless**: Can be reused for multiple simulations

mod dopri5;
mod euler;
mod rk4;

pub use dopri5::DormandPrinceSolver;
pub use euler::EulerSolver;
pub use rk4::RK4Solver;
