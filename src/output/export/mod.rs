//! Export module for simulation results.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use fern_rs::output::export::{CsvExporter, Exporter};
//! # use fern_rs::solver::SimulationResult;
//! # fn run(result: &SimulationResult) -> Result<(), fern_rs::output::OutputError> {
//! let exporter = CsvExporter::default();
//!
//! // Surface concentration, every recorded sample
//! exporter.export_series(result, 0, None, Path::new("runoff.csv"))?;
//!
//! // Downsampled to 100 rows
//! exporter.export_series(result, 0, Some(100), Path::new("runoff_light.csv"))?;
//! # Ok(())
//! # }
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvExporter, CsvMetadata, export_field_csv, export_series_csv};

use std::path::Path;

use crate::solver::SimulationResult;

/// Abstraction trait for all export formats.
///
/// # Parameter `n_points`
///
/// - `None`: exports all recorded samples
/// - `Some(n)`: uniformly downsamples to `n` samples, always keeping the
///   first and last ones
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Export the time series at grid point `index` of a 1D result
    fn export_series(
        &self,
        result: &SimulationResult,
        index: usize,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error>;

    /// Export the final layer of a 2D result
    fn export_final_field(&self, result: &SimulationResult, path: &Path)
    -> Result<(), Self::Error>;
}
