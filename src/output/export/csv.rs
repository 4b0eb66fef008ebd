//! CSV export for fertilizer simulation results
//!
//! This module provides tools to export simulation data to CSV (Comma-Separated Values)
//! format, which is compatible with spreadsheets, Python pandas and most data analysis tools.
//!
//! # Features
//!
//! - **Simple interface**: Export with `&[f64]` slices or a `DMatrix<f64>` layer
//! - **Metadata support**: Optional headers with run parameters and a timestamp
//! - **Customizable**: Delimiter, precision, decimal separator
//! - **Validation**: Checks for NaN, empty data, mismatched lengths
//!
//! # Quick Examples
//!
//! ## Runoff series
//!
//! ```rust,no_run
//! use fern_rs::output::export_series_csv;
//!
//! let time = vec![0.0, 1.0, 2.0, 3.0];
//! let conc = vec![5.0, 4.2, 3.9, 3.1];
//!
//! export_series_csv(&time, &conc, "runoff.csv", None).unwrap();
//! ```
//!
//! **Output** (`runoff.csv`):
//! ```csv
//! Time (days),Concentration (ppm)
//! 0.000000,5.000000
//! 1.000000,4.200000
//! ...
//! ```
//!
//! ## With Metadata
//!
//! ```rust,no_run
//! use fern_rs::output::{CsvConfig, CsvMetadata, export_series_csv};
//!
//! let mut metadata = CsvMetadata::from_simulation("Reaction-convection-diffusion 1D", "Dormand-Prince 5(4)", 30.0, 720);
//! metadata.fertilizer_amount = Some(50.0);
//! metadata.land_size = Some(10.0);
//!
//! let config = CsvConfig::default().with_metadata(metadata);
//! export_series_csv(&[0.0, 1.0], &[5.0, 4.0], "runoff.csv", Some(&config)).unwrap();
//! ```
//!
//! **Output**:
//! ```csv
//! # Fertilizer Simulation Data
//! # Generated: 2026-10-19T09:30:00+00:00
//! # Model: Reaction-convection-diffusion 1D
//! # Solver: Dormand-Prince 5(4)
//! # Total Time: 30 days
//! # Time Steps: 720
//! # Fertilizer Amount: 50 kg
//! # Land Size: 10 ha
//! #
//! Time (days),Concentration (ppm)
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use super::Exporter;
use crate::output::{OutputError, check_series};
use crate::physics::{PhysicalData, PhysicalQuantity};
use crate::solver::SimulationResult;

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use fern_rs::output::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert!(!config.include_metadata);
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "Time (days)")
    pub time_header: String,

    /// Header of the concentration column (default: "Concentration (ppm)")
    pub concentration_header: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time (days)".to_string(),
            concentration_header: "Concentration (ppm)".to_string(),
        }
    }
}

impl CsvConfig {
    /// Semicolon delimiter and comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    pub model_name: Option<String>,
    pub solver_name: Option<String>,

    /// Simulated time span (days)
    pub total_time: Option<f64>,

    /// Number of recorded samples or steps
    pub time_steps: Option<usize>,

    /// Applied fertilizer (kg)
    pub fertilizer_amount: Option<f64>,

    /// Treated land (ha)
    pub land_size: Option<f64>,

    /// Safety threshold used for the analysis
    pub safe_level: Option<f64>,

    /// Additional key/value pairs, e.g. crop or soil labels
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    pub fn from_simulation(model: &str, solver: &str, total_time: f64, time_steps: usize) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: Some(solver.to_string()),
            total_time: Some(total_time),
            time_steps: Some(time_steps),
            ..Default::default()
        }
    }

    /// Metadata from a finished run; the solver name is read from its metadata
    pub fn from_result(result: &SimulationResult, model: &str) -> Self {
        Self {
            model_name: Some(model.to_string()),
            solver_name: result.metadata.get("solver").cloned(),
            total_time: result.time_points.last().copied(),
            time_steps: Some(result.len()),
            ..Default::default()
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.push((key.into(), value.into()));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> std::io::Result<()> {
    writeln!(out, "# Fertilizer Simulation Data")?;
    writeln!(out, "# Generated: {}", chrono::Utc::now().to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(out, "# Model: {}", model)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(total_time) = metadata.total_time {
        writeln!(out, "# Total Time: {} days", total_time)?;
    }
    if let Some(time_steps) = metadata.time_steps {
        writeln!(out, "# Time Steps: {}", time_steps)?;
    }
    if let Some(amount) = metadata.fertilizer_amount {
        writeln!(out, "# Fertilizer Amount: {} kg", amount)?;
    }
    if let Some(land) = metadata.land_size {
        writeln!(out, "# Land Size: {} ha", land)?;
    }
    if let Some(level) = metadata.safe_level {
        writeln!(out, "# Safe Level: {}", level)?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")
}

fn write_optional_header<W: Write>(out: &mut W, config: &CsvConfig) -> std::io::Result<()> {
    if config.include_metadata
        && let Some(metadata) = &config.metadata
    {
        write_metadata_header(out, metadata)?;
    }
    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

/// Indices of `n` evenly spread samples out of `len`, first and last included
fn downsample_indices(len: usize, n: Option<usize>) -> Vec<usize> {
    match n {
        Some(n) if n >= 2 && n < len => {
            let stride = (len - 1) as f64 / (n - 1) as f64;
            let mut indices: Vec<usize> = (0..n).map(|k| (k as f64 * stride).round() as usize).collect();
            indices.dedup();
            indices
        }
        _ => (0..len).collect(),
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export a concentration time series to CSV
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths
/// - NaN or Inf values
/// - File creation errors
pub fn export_series_csv<P: AsRef<Path>>(
    time_points: &[f64],
    concentrations: &[f64],
    output_path: P,
    configuration: Option<&CsvConfig>,
) -> Result<(), OutputError> {
    check_series(time_points, concentrations)?;

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    let mut out = BufWriter::new(File::create(output_path)?);
    write_optional_header(&mut out, configuration)?;

    writeln!(
        out,
        "{}{}{}",
        configuration.time_header, configuration.delimiter, configuration.concentration_header
    )?;

    for (time, concentration) in time_points.iter().zip(concentrations) {
        writeln!(
            out,
            "{}{}{}",
            format_number(*time, configuration),
            configuration.delimiter,
            format_number(*concentration, configuration)
        )?;
    }

    out.flush()?;
    Ok(())
}

/// Export one layer of the farm grid to CSV
///
/// One line per grid row, one column per grid column, no header row.
pub fn export_field_csv<P: AsRef<Path>>(
    field: &DMatrix<f64>,
    output_path: P,
    configuration: Option<&CsvConfig>,
) -> Result<(), OutputError> {
    if field.is_empty() {
        return Err(OutputError::EmptyData("concentration field"));
    }
    if field.iter().any(|c| !c.is_finite()) {
        return Err(OutputError::NonFinite("concentration field"));
    }

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    let mut out = BufWriter::new(File::create(output_path)?);
    write_optional_header(&mut out, configuration)?;

    for row in field.row_iter() {
        let line: Vec<String> = row.iter().map(|c| format_number(*c, configuration)).collect();
        writeln!(out, "{}", line.join(&configuration.delimiter.to_string()))?;
    }

    out.flush()?;
    Ok(())
}

// =============================================================================
// Exporter implementation
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    type Error = OutputError;

    fn export_series(
        &self,
        result: &SimulationResult,
        index: usize,
        n_points: Option<usize>,
        path: &Path,
    ) -> Result<(), Self::Error> {
        let series = result
            .observation_series(index)
            .map_err(|e| OutputError::MissingData(e.to_string()))?;

        let indices = downsample_indices(series.len(), n_points);
        let times: Vec<f64> = indices.iter().map(|&k| result.time_points[k]).collect();
        let values: Vec<f64> = indices.iter().map(|&k| series[k]).collect();

        export_series_csv(&times, &values, path, Some(&self.config))
    }

    fn export_final_field(&self, result: &SimulationResult, path: &Path) -> Result<(), Self::Error> {
        match result.final_state.get(PhysicalQuantity::Concentration) {
            Some(PhysicalData::Matrix(field)) => export_field_csv(field, path, Some(&self.config)),
            _ => Err(OutputError::MissingData("2D concentration field".to_string())),
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
