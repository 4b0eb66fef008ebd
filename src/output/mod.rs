//! Output module for simulation results
//!
//! This module provides tools to output simulation results in various formats:
//! - **Visualization**: PNG/SVG charts using plotters
//! - **Export**: CSV data export for external analysis
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file (OutputError)
//! ├── visualization/      ← Plots and graphics
//! │   ├── mod.rs
//! │   ├── config.rs
//! │   ├── series.rs       ← concentration vs time, safe-level line
//! │   └── heatmap.rs      ← one layer of the farm grid
//! └── export/             ← Data export
//!     ├── mod.rs
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fern_rs::config::ColumnParameters;
//! use fern_rs::output::{export_series_csv, plot_series};
//! use fern_rs::simulation::generate_sample_data;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let series = generate_sample_data(30, 50.0, 10.0, &ColumnParameters::default())?;
//!
//! export_series_csv(&series.time_points, &series.concentration, "runoff.csv", None)?;
//! plot_series(&series.time_points, &series.concentration, Some(50.0), "runoff.svg", None)?;
//! # Ok(())
//! # }
//! ```
//!
//! Both sub-modules accept plain `&[f64]` slices and `DMatrix<f64>` layers.

pub mod export;
pub mod visualization;

/// Errors raised while writing files or drawing charts
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Empty data: {0}")]
    EmptyData(&'static str),

    #[error("Data length mismatch: expected {expected} values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Invalid data: NaN or Inf detected in {0}")]
    NonFinite(&'static str),

    #[error("Simulation result has no {0}")]
    MissingData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Plotting failed: {0}")]
    Plot(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for OutputError
where
    E: std::error::Error + Send + Sync,
{
    fn from(error: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::Plot(error.to_string())
    }
}

/// Fail on empty, mismatched or non-finite series
pub(crate) fn check_series(time_points: &[f64], values: &[f64]) -> Result<(), OutputError> {
    if time_points.is_empty() || values.is_empty() {
        return Err(OutputError::EmptyData("time and concentration series"));
    }
    if time_points.len() != values.len() {
        return Err(OutputError::LengthMismatch {
            expected: time_points.len(),
            found: values.len(),
        });
    }
    if time_points.iter().any(|t| !t.is_finite()) {
        return Err(OutputError::NonFinite("time series"));
    }
    if values.iter().any(|c| !c.is_finite()) {
        return Err(OutputError::NonFinite("concentration series"));
    }
    Ok(())
}

pub use export::{CsvConfig, CsvExporter, CsvMetadata, Exporter, export_field_csv, export_series_csv};
pub use visualization::{PlotConfig, plot_field_heatmap, plot_series};
