//! Heatmap of one layer of the farm grid
//!
//! Each cell is drawn as a filled rectangle spanning `[i, i+1] × [j, j+1]`
//! in index space. Cells excluded by an [`InclusionMask`] are drawn in
//! `config.excluded_color` and do not take part in the colour scale.

use std::path::Path;

use nalgebra::DMatrix;
use plotters::prelude::*;

use super::config::{ImageFormat, NO_TITLE, PlotConfig};
use crate::models::InclusionMask;
use crate::output::OutputError;

/// Colour stops from low to high concentration
const STOPS: [(u8, u8, u8); 3] = [(68, 1, 84), (33, 145, 140), (253, 231, 37)];

/// Map `value` in `[min, max]` onto the colour stops
pub(crate) fn heat_color(value: f64, min: f64, max: f64) -> RGBColor {
    let span = (max - min).max(1e-12);
    let t = ((value - min) / span).clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let k = (t.floor() as usize).min(STOPS.len() - 2);
    let f = t - k as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    let (lo, hi) = (STOPS[k], STOPS[k + 1]);
    RGBColor(lerp(lo.0, hi.0), lerp(lo.1, hi.1), lerp(lo.2, hi.2))
}

/// Plot a concentration layer as a heatmap
///
/// Rows run along the x axis, columns along the y axis.
///
/// # Errors
///
/// Empty or non-finite field, a mask of a different shape, or a backend failure.
pub fn plot_field_heatmap<P: AsRef<Path>>(
    field: &DMatrix<f64>,
    mask: Option<&InclusionMask>,
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), OutputError> {
    if field.is_empty() {
        return Err(OutputError::EmptyData("concentration field"));
    }
    if field.iter().any(|c| !c.is_finite()) {
        return Err(OutputError::NonFinite("concentration field"));
    }
    if let Some(mask) = mask
        && mask.shape() != field.shape()
    {
        return Err(OutputError::LengthMismatch {
            expected: field.len(),
            found: mask.nrows() * mask.ncols(),
        });
    }

    let default_config = PlotConfig::heatmap(NO_TITLE);
    let config = config.unwrap_or(&default_config);

    let path = output_path.as_ref();
    let format = ImageFormat::from_path(path);
    let size = (config.width, config.height);

    match format {
        ImageFormat::Svg => plot_heatmap_impl(
            SVGBackend::new(path, size),
            field,
            mask,
            config,
            format.draws_text(),
        ),
        ImageFormat::Bitmap => plot_heatmap_impl(
            BitMapBackend::new(path, size),
            field,
            mask,
            config,
            format.draws_text(),
        ),
    }
}

fn plot_heatmap_impl<DB: DrawingBackend>(
    backend: DB,
    field: &DMatrix<f64>,
    mask: Option<&InclusionMask>,
    config: &PlotConfig,
    draw_text: bool,
) -> Result<(), OutputError> {
    let (rows, cols) = field.shape();
    let included = |i: usize, j: usize| mask.is_none_or(|m| m.is_included(i, j));

    let (mut vmin, mut vmax) = (f64::INFINITY, f64::NEG_INFINITY);
    for j in 0..cols {
        for i in 0..rows {
            if included(i, j) {
                vmin = vmin.min(field[(i, j)]);
                vmax = vmax.max(field[(i, j)]);
            }
        }
    }
    if !vmin.is_finite() {
        (vmin, vmax) = (0.0, 1.0);
    }

    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20).x_label_area_size(50).y_label_area_size(50);
    if draw_text {
        builder.caption(
            format!("{} (max {:.3})", config.title, vmax),
            ("sans-serif", 36).into_font(),
        );
    }
    let mut chart = builder.build_cartesian_2d(0f64..rows as f64, 0f64..cols as f64)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_mesh();
    if draw_text {
        mesh.x_desc(config.xlabel.as_str()).y_desc(config.ylabel.as_str());
    } else {
        mesh.x_labels(0).y_labels(0);
    }
    mesh.draw()?;

    let excluded = config.excluded_color;
    chart.draw_series((0..cols).flat_map(|j| {
        (0..rows).map(move |i| {
            let color = if included(i, j) {
                heat_color(field[(i, j)], vmin, vmax)
            } else {
                excluded
            };
            Rectangle::new(
                [(i as f64, j as f64), (i as f64 + 1.0, j as f64 + 1.0)],
                color.filled(),
            )
        })
    }))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0, 0.0, 1.0), RGBColor(68, 1, 84));
        assert_eq!(heat_color(1.0, 0.0, 1.0), RGBColor(253, 231, 37));
        assert_eq!(heat_color(0.5, 0.0, 1.0), RGBColor(33, 145, 140));
        // Out of range and flat fields clamp
        assert_eq!(heat_color(9.0, 0.0, 1.0), RGBColor(253, 231, 37));
        assert_eq!(heat_color(3.0, 3.0, 3.0), RGBColor(68, 1, 84));
    }

    #[test]
    fn test_plot_heatmap_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("field.svg");
        let field = DMatrix::from_fn(6, 5, |i, j| (i * j) as f64);
        let mask = InclusionMask::all_included(6, 5).exclude_rect(0..2, 0..2);

        plot_field_heatmap(&field, Some(&mask), &path, None).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Field Concentration"));
    }

    #[test]
    fn test_plot_heatmap_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.svg");
        let field = DMatrix::zeros(3, 3);

        assert!(matches!(
            plot_field_heatmap(&field, Some(&InclusionMask::all_included(3, 4)), &path, None),
            Err(OutputError::LengthMismatch { .. })
        ));
        assert!(matches!(
            plot_field_heatmap(&DMatrix::from_element(2, 2, f64::NAN), None, &path, None),
            Err(OutputError::NonFinite(_))
        ));
    }
}
