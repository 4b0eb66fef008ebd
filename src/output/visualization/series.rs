//! Concentration time series chart
//!
//! Draws a runoff series (usually the surface point of the soil column)
//! with an optional dashed horizontal line at the safety threshold.
//!
//! # Usage
//!
//! ```rust,no_run
//! use fern_rs::output::plot_series;
//!
//! let time = vec![0.0, 1.0, 2.0];
//! let conc = vec![5.0, 62.0, 40.0];
//!
//! plot_series(&time, &conc, Some(50.0), "runoff.svg", None).unwrap();
//! ```

use std::path::Path;

use plotters::prelude::*;

use super::config::{ImageFormat, NO_TITLE, PlotConfig};
use crate::output::{OutputError, check_series};

/// Number of dashes across the safe-level line
const DASH_COUNT: usize = 40;

/// Plot `values` against `time_points`
///
/// The output format follows the extension of `output_path`: `.svg` for
/// vector output, anything else for a bitmap.
///
/// # Errors
///
/// Empty, mismatched or non-finite input, a non-finite `safe_level`, or a
/// backend failure.
pub fn plot_series<P: AsRef<Path>>(
    time_points: &[f64],
    values: &[f64],
    safe_level: Option<f64>,
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), OutputError> {
    check_series(time_points, values)?;
    if safe_level.is_some_and(|level| !level.is_finite()) {
        return Err(OutputError::NonFinite("safe level"));
    }

    let default_config = PlotConfig::runoff(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let path = output_path.as_ref();
    let format = ImageFormat::from_path(path);
    let size = (config.width, config.height);

    match format {
        ImageFormat::Svg => plot_series_impl(
            SVGBackend::new(path, size),
            time_points,
            values,
            safe_level,
            config,
            format.draws_text(),
        ),
        ImageFormat::Bitmap => plot_series_impl(
            BitMapBackend::new(path, size),
            time_points,
            values,
            safe_level,
            config,
            format.draws_text(),
        ),
    }
}

/// `[start, end]` pairs of the visible dashes over `[from, to]`
fn dash_segments(from: f64, to: f64, dashes: usize) -> Vec<(f64, f64)> {
    let piece = (to - from) / (2 * dashes) as f64;
    (0..dashes)
        .map(|k| {
            let start = from + 2.0 * k as f64 * piece;
            (start, start + piece)
        })
        .collect()
}

fn plot_series_impl<DB: DrawingBackend>(
    backend: DB,
    time_points: &[f64],
    values: &[f64],
    safe_level: Option<f64>,
    config: &PlotConfig,
    draw_text: bool,
) -> Result<(), OutputError> {
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let t_min = time_points.iter().copied().fold(f64::INFINITY, f64::min);
    let mut t_max = time_points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if t_max <= t_min {
        t_max = t_min + 1.0;
    }

    let y_min = values.iter().copied().fold(0.0_f64, f64::min);
    let y_max = values
        .iter()
        .copied()
        .chain(safe_level)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-10)
        * 1.1;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(45).y_label_area_size(60);
    if draw_text {
        builder.caption(&config.title, ("sans-serif", 40).into_font());
    }
    let mut chart = builder.build_cartesian_2d(t_min..t_max, y_min..y_max)?;

    let x_format = |x: &f64| format!("{:.1}", x);
    let y_format = |y: &f64| format!("{:.2}", y);
    let mut mesh = chart.configure_mesh();
    if !config.show_grid {
        mesh.disable_mesh();
    }
    if draw_text {
        mesh.x_desc(config.xlabel.as_str())
            .y_desc(config.ylabel.as_str())
            .x_label_formatter(&x_format)
            .y_label_formatter(&y_format);
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    let line_style = ShapeStyle::from(&config.line_color).stroke_width(config.line_width);
    let curve = chart.draw_series(LineSeries::new(
        time_points.iter().zip(values).map(|(t, c)| (*t, *c)),
        line_style,
    ))?;
    if draw_text {
        curve
            .label("Concentration")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    if let Some(level) = safe_level {
        let dash_style =
            ShapeStyle::from(&config.safe_level_color).stroke_width(config.line_width);
        let line = chart.draw_series(
            dash_segments(t_min, t_max, DASH_COUNT)
                .into_iter()
                .map(move |(a, b)| PathElement::new(vec![(a, level), (b, level)], dash_style)),
        )?;
        if draw_text {
            line.label(format!("Safe level ({})", level))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], dash_style));
        }
    }

    if draw_text {
        chart
            .configure_series_labels()
            .background_style(&config.background.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;

    #[test]
    fn test_dash_segments() {
        let dashes = dash_segments(0.0, 8.0, 2);
        assert_eq!(dashes.len(), 2);
        assert_relative_eq!(dashes[0].0, 0.0);
        assert_relative_eq!(dashes[0].1, 2.0);
        assert_relative_eq!(dashes[1].0, 4.0);
        assert_relative_eq!(dashes[1].1, 6.0);
    }

    #[test]
    fn test_plot_series_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runoff.svg");
        let time: Vec<f64> = (0..48).map(|k| k as f64 / 24.0).collect();
        let conc: Vec<f64> = time.iter().map(|t| 60.0 * (-t).exp()).collect();

        plot_series(&time, &conc, Some(50.0), &path, None).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Fertilizer Runoff"));
        assert!(svg.contains("Safe level (50)"));
    }

    #[test]
    fn test_plot_series_rejects_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.svg");

        assert!(matches!(
            plot_series(&[], &[], None, &path, None),
            Err(OutputError::EmptyData(_))
        ));
        assert!(matches!(
            plot_series(&[0.0], &[1.0], Some(f64::NAN), &path, None),
            Err(OutputError::NonFinite(_))
        ));
    }
}
