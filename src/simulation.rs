//! Top-level entry points
//!
//! Thin functions that validate parameters, assemble a model and a
//! [`Scenario`], and run the matching solver:
//!
//! | Function | Model | Solver |
//! |---|---|---|
//! | [`simulate_1d`] | [`ReactionConvectionDiffusion1D`] | [`DormandPrinceSolver`] |
//! | [`simulate_2d`] / [`simulate_2d_with`] | [`MaskedConvectionDiffusion2D`] | [`EulerSolver`] |
//! | [`generate_sample_data`] | 1D column seeded at the surface | [`DormandPrinceSolver`] |
//!
//! Time is expressed in days throughout.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::config::{ColumnParameters, FertilizerApplication, FieldParameters};
use crate::error::Result;
use crate::models::{InclusionMask, MaskedConvectionDiffusion2D, ReactionConvectionDiffusion1D};
use crate::physics::PhysicalModel;
use crate::solver::{
    CancellationToken, DomainBoundaries, DormandPrinceSolver, EulerSolver, Scenario,
    SimulationResult, Solver, SolverConfiguration,
};

// =================================================================================================
// 1D soil column
// =================================================================================================

/// Integrate the soil column from `initial_profile`, reporting at `time_points`
///
/// The number of grid points is the length of `initial_profile`. Entry `k` of
/// the result is the profile at `time_points[k]`; entry 0 is `initial_profile`.
///
/// # Errors
///
/// - [`SimulationError::EmptyInput`](crate::error::SimulationError::EmptyInput) when `time_points` is empty
/// - [`SimulationError::InvalidParameter`](crate::error::SimulationError::InvalidParameter) for bad coefficients, a profile
///   shorter than 2 points, non-finite values, unordered time points
/// - [`SimulationError::IntegrationFailure`](crate::error::SimulationError::IntegrationFailure) when the integrator cannot reach
///   the last time point
pub fn simulate_1d(
    initial_profile: DVector<f64>,
    time_points: &[f64],
    params: &ColumnParameters,
) -> Result<SimulationResult> {
    let model = ReactionConvectionDiffusion1D::new(params, initial_profile)?;
    let points = model.points();

    let boundaries = DomainBoundaries::temporal(model.setup_initial_state());
    let scenario = Scenario::new(Box::new(model), boundaries);
    let config = SolverConfiguration::adaptive(
        time_points.to_vec(),
        params.relative_tolerance,
        params.absolute_tolerance,
        params.max_steps,
    );

    info!(
        "1D run: {} points, {} output times up to t = {}",
        points,
        time_points.len(),
        time_points.last().copied().unwrap_or(0.0)
    );

    let result = DormandPrinceSolver::new().solve(&scenario, &config)?;

    info!(
        "1D run finished: {} accepted / {} rejected steps",
        result.metadata.get("accepted steps").map_or("?", String::as_str),
        result.metadata.get("rejected steps").map_or("?", String::as_str)
    );

    Ok(result)
}

/// `days·24` evenly spaced times over `[0, days]`, both ends included
///
/// ```rust
/// use fern_rs::simulation::hourly_time_points;
///
/// let t = hourly_time_points(30);
/// assert_eq!(t.len(), 720);
/// assert_eq!(t[0], 0.0);
/// assert_eq!(t[719], 30.0);
/// ```
pub fn hourly_time_points(days: u32) -> Vec<f64> {
    let n = days as usize * 24;
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = days as f64 / (n - 1) as f64;
            (0..n)
                .map(|k| if k == n - 1 { days as f64 } else { k as f64 * step })
                .collect()
        }
    }
}

/// Concentration history at the injection point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunoffSeries {
    /// Days since application
    pub time_points: Vec<f64>,
    pub concentration: Vec<f64>,
}

impl RunoffSeries {
    pub fn len(&self) -> usize {
        self.concentration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentration.is_empty()
    }
}

/// Simulate the surface concentration after an application
///
/// Seeds the first point of the column with `fertilizer_amount / land_size`,
/// integrates over [`hourly_time_points`]`(days)` and returns the series at
/// index 0.
pub fn generate_sample_data(
    days: u32,
    fertilizer_amount: f64,
    land_size: f64,
    params: &ColumnParameters,
) -> Result<RunoffSeries> {
    let application = FertilizerApplication {
        fertilizer_amount,
        land_size,
        days,
        ..FertilizerApplication::default()
    };
    application.validate()?;
    params.validate()?;

    let mut initial = DVector::zeros(params.points);
    initial[0] = application.seed_concentration();

    let time_points = hourly_time_points(days);
    let result = simulate_1d(initial, &time_points, params)?;

    Ok(RunoffSeries {
        concentration: result.observation_series(0)?,
        time_points: result.time_points,
    })
}

/// Memoised [`generate_sample_data`] for one set of column coefficients
///
/// Entries are keyed on `(days, fertilizer_amount, land_size)`, floats by
/// their bit pattern.
///
/// ```rust
/// use fern_rs::config::ColumnParameters;
/// use fern_rs::simulation::SampleCache;
///
/// let mut cache = SampleCache::new(ColumnParameters { points: 10, ..Default::default() });
/// let first = cache.get_or_generate(1, 50.0, 10.0).unwrap().clone();
/// let again = cache.get_or_generate(1, 50.0, 10.0).unwrap();
///
/// assert_eq!(&first, again);
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SampleCache {
    column: ColumnParameters,
    entries: HashMap<(u32, u64, u64), RunoffSeries>,
}

impl SampleCache {
    pub fn new(column: ColumnParameters) -> Self {
        Self {
            column,
            entries: HashMap::new(),
        }
    }

    /// Cached series, generated on first request
    pub fn get_or_generate(
        &mut self,
        days: u32,
        fertilizer_amount: f64,
        land_size: f64,
    ) -> Result<&RunoffSeries> {
        let key = (days, fertilizer_amount.to_bits(), land_size.to_bits());
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                debug!("Sample cache hit for {:?}", (days, fertilizer_amount, land_size));
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let series =
                    generate_sample_data(days, fertilizer_amount, land_size, &self.column)?;
                Ok(entry.insert(series))
            }
        }
    }

    pub fn column(&self) -> &ColumnParameters {
        &self.column
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =================================================================================================
// 2D farm field
// =================================================================================================

/// Recording and cancellation for a 2D run
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    /// Keep every k-th layer; 0 keeps the initial and final layers only
    pub record_interval: usize,
    pub cancel: Option<CancellationToken>,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record_interval(mut self, interval: usize) -> Self {
        self.record_interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Run the farm grid for `params.steps` steps with the default [`RunControl`]
///
/// See [`simulate_2d_with`].
pub fn simulate_2d(
    params: &FieldParameters,
    source: DMatrix<f64>,
    mask: InclusionMask,
    initial: Option<DMatrix<f64>>,
) -> Result<SimulationResult> {
    simulate_2d_with(params, source, mask, initial, &RunControl::default())
}

/// Run the farm grid for `params.steps` explicit steps
///
/// Parameters are validated before any work is done: grid size,
/// coefficients, stability of the explicit scheme and the
/// `max_cell_updates` budget.
///
/// # Errors
///
/// - [`SimulationError::InvalidParameter`](crate::error::SimulationError::InvalidParameter) for bad coefficients or shapes
/// - [`SimulationError::UnstableConfiguration`](crate::error::SimulationError::UnstableConfiguration) beyond the stability limits
/// - [`SimulationError::WorkBudgetExceeded`](crate::error::SimulationError::WorkBudgetExceeded) when rows·cols·steps is too large
/// - [`SimulationError::NumericalInstability`](crate::error::SimulationError::NumericalInstability) if a non-finite value appears
/// - [`SimulationError::Cancelled`](crate::error::SimulationError::Cancelled) when `control.cancel` fires
pub fn simulate_2d_with(
    params: &FieldParameters,
    source: DMatrix<f64>,
    mask: InclusionMask,
    initial: Option<DMatrix<f64>>,
    control: &RunControl,
) -> Result<SimulationResult> {
    params.validate()?;
    let stability = params.stability();

    let model = MaskedConvectionDiffusion2D::new(params, source, mask, initial)?;
    let included = model.mask().included_count();

    let boundaries = DomainBoundaries::temporal(model.setup_initial_state());
    let scenario = Scenario::new(Box::new(model), boundaries);

    let mut config = SolverConfiguration::fixed_step(params.dt, params.steps)
        .with_record_interval(control.record_interval);
    if let Some(token) = &control.cancel {
        config = config.with_cancellation(token.clone());
    }

    info!(
        "2D run: {}x{} grid ({} included cells), {} steps of dt = {}",
        params.rows, params.cols, included, params.steps, params.dt
    );
    debug!(
        "Diffusion number {:.4}, Courant number {:.4}",
        stability.diffusion_number, stability.courant_number
    );

    let mut result = EulerSolver::new().solve(&scenario, &config)?;
    result.add_metadata(
        "diffusion number",
        &format!("{:.6}", stability.diffusion_number),
    );
    result.add_metadata("courant number", &format!("{:.6}", stability.courant_number));

    info!("2D run finished: {} layers recorded", result.len());

    Ok(result)
}

// =================================================================================================
// Tests
// =================================================================================================
