//! Performance benchmarks for the two transport models
//!
//! # What We're Measuring
//!
//! 1. **Soil column** (1D, Dormand-Prince): cost of one day of simulated
//!    time as the column gets finer. The step count is chosen by the
//!    integrator, so the time grows faster than the number of points once
//!    diffusion starts limiting the step size.
//!
//! 2. **Farm field** (2D, explicit FTCS): cost per cell update. Each step
//!    evaluates one 5-point stencil per interior cell, so the time should be
//!    proportional to `rows × cols × steps`.
//!
//! 3. **Fixed-step comparison** on the soil column: Euler against RK4 with
//!    the same step count. RK4 does 4 evaluations per step, so a ratio close
//!    to 4 is expected.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench --bench solver_performance
//!
//! # Only the 2D field, with the rayon path enabled
//! cargo bench --bench solver_performance --features parallel field
//! ```

use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fern_rs::config::{ColumnParameters, FieldParameters};
use fern_rs::models::{InclusionMask, Injection, ReactionConvectionDiffusion1D};
use fern_rs::physics::PhysicalModel;
use fern_rs::simulation::{RunControl, hourly_time_points, simulate_1d, simulate_2d_with};
use fern_rs::solver::{DomainBoundaries, EulerSolver, RK4Solver, Scenario, Solver, SolverConfiguration};
use nalgebra::{DMatrix, DVector};

// =================================================================================================
// 1D soil column
// =================================================================================================

fn benchmark_column(c: &mut Criterion) {
    let mut group = c.benchmark_group("Soil column (DOPRI5)");
    group.measurement_time(Duration::from_secs(10));

    let time_points = hourly_time_points(1);

    for points in [20, 50, 100, 200] {
        let params = ColumnParameters {
            points,
            ..ColumnParameters::default()
        };
        let mut initial = DVector::zeros(points);
        initial[0] = 5.0;

        group.bench_with_input(BenchmarkId::from_parameter(points), &points, |b, _| {
            b.iter(|| {
                simulate_1d(
                    black_box(initial.clone()),
                    black_box(&time_points),
                    black_box(&params),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

// =================================================================================================
// 2D farm field
// =================================================================================================

fn benchmark_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("Farm field (FTCS)");
    let steps = 20;

    for size in [50, 100, 200] {
        let params = FieldParameters {
            rows: size,
            cols: size,
            steps,
            ..FieldParameters::default()
        };
        let mut source = DMatrix::zeros(size, size);
        source[(size / 2, size / 2)] = 50.0;
        let mask = InclusionMask::all_included(size, size);
        let control = RunControl::new();

        group.throughput(Throughput::Elements((size * size * steps) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                simulate_2d_with(
                    black_box(&params),
                    source.clone(),
                    mask.clone(),
                    None,
                    &control,
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

// =================================================================================================
// Fixed-step comparison
// =================================================================================================

fn column_scenario(points: usize) -> Scenario {
    let params = ColumnParameters {
        points,
        ..ColumnParameters::default()
    };
    let model = ReactionConvectionDiffusion1D::from_injection(&params, &Injection::point(0, 5.0))
        .unwrap();
    let initial = model.setup_initial_state();
    Scenario::new(Box::new(model), DomainBoundaries::temporal(initial))
}

fn benchmark_fixed_step_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fixed-step comparison");

    for (points, time_steps) in [(50, 500), (100, 2000)] {
        let scenario = column_scenario(points);
        let config = SolverConfiguration::time_evolution(5.0, time_steps);

        group.throughput(Throughput::Elements((points * time_steps) as u64));
        group.bench_function(
            format!("Forward Euler {} points & {} steps", points, time_steps),
            |b| b.iter(|| EulerSolver::new().solve(black_box(&scenario), black_box(&config)).unwrap()),
        );

        group.throughput(Throughput::Elements((points * time_steps * 4) as u64));
        group.bench_function(
            format!("Runge-Kutta 4 {} points & {} steps", points, time_steps),
            |b| b.iter(|| RK4Solver::new().solve(black_box(&scenario), black_box(&config)).unwrap()),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_column,
    benchmark_field,
    benchmark_fixed_step_comparison
);
criterion_main!(benches);
