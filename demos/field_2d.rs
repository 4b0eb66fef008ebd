//! Example: spreading over a farm field
//!
//! 100×100 grid with a point source at the centre, a light wind along both
//! axes and 50 explicit steps. The centre cell is followed over time and the
//! final layer is summarised, exported and drawn.
//!
//! Run with `--features parallel` to evaluate the stencil with rayon.

use fern_rs::{
    analysis::{analyze, analyze_field},
    config::{DEFAULT_SAFE_LEVEL, FieldParameters},
    models::{InclusionMask, Injection},
    output::{PlotConfig, export_field_csv, plot_field_heatmap},
    physics::PhysicalQuantity,
    simulation::{RunControl, simulate_2d_with},
};

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("═══════════════════════════════════════════════════════");
    println!("  Fertilizer Spreading - Farm Field");
    println!("═══════════════════════════════════════════════════════\n");

    let params = FieldParameters::default();
    let report = params.stability();

    println!("Grid       : {} × {}", params.rows, params.cols);
    println!("dt / steps : {} / {}", params.dt, params.steps);
    println!("Diffusion number : {:.4} (limit 0.5)", report.diffusion_number);
    println!("Courant number   : {:.4} (limit 1.0)\n", report.courant_number);

    let centre = (params.rows / 2, params.cols / 2);
    let source = Injection::cell(centre.0, centre.1, 50.0).field(params.rows, params.cols)?;
    let mask = InclusionMask::all_included(params.rows, params.cols);

    let start = Instant::now();
    let control = RunControl::new().with_record_interval(5);
    let result = simulate_2d_with(&params, source, mask.clone(), None, &control)?;
    println!(
        "Simulated {} steps in {:.3}s ({} layers recorded)\n",
        params.steps,
        start.elapsed().as_secs_f64(),
        result.len()
    );

    let centre_series = result.cell_series(centre.0, centre.1)?;
    let metrics = analyze(&centre_series, &result.time_points, DEFAULT_SAFE_LEVEL)?;
    println!("Centre cell:");
    println!("  Peak     : {:.4} at t = {:.2}", metrics.peak, metrics.peak_time);
    println!("  Exposure : {:.4}\n", metrics.total_exposure);

    let field = result
        .final_state
        .get(PhysicalQuantity::Concentration)
        .ok_or("missing concentration")?
        .as_matrix();
    let summary = analyze_field(field, &mask, params.dx, params.dy, DEFAULT_SAFE_LEVEL)?;
    println!("Final layer:");
    println!("  Peak        : {:.4} at {:?}", summary.peak, summary.peak_cell);
    println!("  Total mass  : {:.4}", summary.total_mass);
    println!("  Cells above : {}", summary.cells_above);

    let tmp_dir = std::env::temp_dir();
    let csv_path = tmp_dir.join("fern_field.csv");
    let svg_path = tmp_dir.join("fern_field.svg");
    export_field_csv(field, &csv_path, None)?;
    plot_field_heatmap(field, None, &svg_path, Some(&PlotConfig::heatmap("Final Field")))?;

    println!("\nSaved:");
    println!("  {}", csv_path.display());
    println!("  {}", svg_path.display());

    Ok(())
}
