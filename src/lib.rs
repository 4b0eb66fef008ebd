//! fern-rs: Fertilizer Transport Simulation
//!
//! Numerical simulation of fertilizer moving through soil and over farm land,
//! with a runoff safety analysis on top.
//!
//! # Architecture
//!
//! fern-rs is built on two core principles:
//!
//! 1. **Separation of Physics and Numerics**
//!    - Physical models define equations (what to solve)
//!    - Numerical solvers provide methods (how to solve)
//!
//! 2. **Explicit, validated inputs**
//!    - Every run takes an immutable parameter set
//!    - Invalid or unstable configurations are rejected before any work
//!
//! # Components
//!
//! - **Soil column** ([`models::ReactionConvectionDiffusion1D`]): diffusion,
//!   convection, decay and a uniform source along one dimension, integrated
//!   with an adaptive Dormand-Prince scheme
//! - **Farm field** ([`models::MaskedConvectionDiffusion2D`]): explicit
//!   convection-diffusion on a grid where a mask excludes cells outside the farm
//! - **Safety analysis** ([`analysis`]): peak, exposure, samples above a
//!   threshold
//!
//! # Quick Start
//!
//! ```rust
//! use fern_rs::analysis::analyze;
//! use fern_rs::config::ColumnParameters;
//! use fern_rs::simulation::generate_sample_data;
//!
//! # fn main() -> fern_rs::error::Result<()> {
//! // 1. Coefficients of the soil column
//! let column = ColumnParameters { points: 20, ..Default::default() };
//!
//! // 2. 50 kg on 10 ha, followed for 2 days
//! let series = generate_sample_data(2, 50.0, 10.0, &column)?;
//!
//! // 3. Compare against the safety threshold
//! let metrics = analyze(&series.concentration, &series.time_points, 50.0)?;
//!
//! println!("Peak {:.2} at day {:.2}", metrics.peak, metrics.peak_time);
//! assert!(metrics.is_within_safe_level());
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! # Modules
//!
//! - [`physics`]: model trait, state containers, finite-difference operators
//! - [`models`]: soil column, farm field, masks, initial placement
//! - [`solver`]: numerical solvers (methods)
//! - [`simulation`]: top-level entry points
//! - [`analysis`]: safety metrics
//! - [`config`]: parameters, JSON loading, validation
//! - [`output`]: CSV export and charts

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod analysis;
pub mod config;
pub mod simulation;

pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use fern_rs::prelude::*;
    //! ```
    pub use crate::analysis::{FieldMetrics, SafetyMetrics, analyze, analyze_field};
    pub use crate::config::{
        ColumnParameters, FertilizerApplication, FieldParameters, SimulationParameters,
    };
    pub use crate::error::{Result, SimulationError};
    pub use crate::models::{
        InclusionMask, Injection, MaskedConvectionDiffusion2D, ReactionConvectionDiffusion1D,
    };
    pub use crate::physics::{PhysicalData, PhysicalModel, PhysicalQuantity, PhysicalState};
    pub use crate::simulation::{
        RunControl, RunoffSeries, generate_sample_data, simulate_1d, simulate_2d,
        simulate_2d_with,
    };
    pub use crate::solver::{
        CancellationToken, DomainBoundaries, DormandPrinceSolver, EulerSolver, RK4Solver,
        Scenario, SimulationResult, Solver, SolverConfiguration, SolverType,
    };
}
