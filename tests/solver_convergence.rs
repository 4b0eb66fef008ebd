//! Convergence tests for numerical solvers
//!
//! These tests verify that solvers exhibit the expected
//! convergence rates when refining the time step or the tolerance.

use fern_rs::physics::PhysicalQuantity;
use fern_rs::solver::{DormandPrinceSolver, EulerSolver, RK4Solver, Solver, SolverConfiguration};

mod common;
use common::{ConstantGrowth, ExponentialDecay, create_simple_scenario, relative_error};

fn final_value(result: &fern_rs::solver::SimulationResult) -> f64 {
    result
        .final_state
        .get(PhysicalQuantity::Concentration)
        .unwrap()
        .as_vector()[0]
}

#[test]
fn test_euler_first_order_convergence() {
    // error ~ O(dt): halving dt halves the error
    let decay_rate = 0.3;
    let total_time = 10.0;
    let exact = ExponentialDecay::new(1, decay_rate).analytical_solution(total_time, 1.0);

    let euler = EulerSolver::new();
    let errors: Vec<f64> = [100, 200, 400, 800]
        .iter()
        .map(|&steps| {
            let scenario = create_simple_scenario(Box::new(ExponentialDecay::new(5, decay_rate)));
            let config = SolverConfiguration::time_evolution(total_time, steps);
            let result = euler.solve(&scenario, &config).unwrap();
            (final_value(&result) - exact).abs()
        })
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(
            ratio > 1.8 && ratio < 2.2,
            "Convergence ratio {} not first-order",
            ratio
        );
    }
}

#[test]
fn test_rk4_fourth_order_convergence() {
    // error ~ O(dt^4): halving dt divides the error by 16
    let decay_rate = 0.3;
    let total_time = 5.0;
    let exact = ExponentialDecay::new(1, decay_rate).analytical_solution(total_time, 1.0);

    let rk4 = RK4Solver::new();
    let errors: Vec<f64> = [10, 20, 40, 80]
        .iter()
        .map(|&steps| {
            let scenario = create_simple_scenario(Box::new(ExponentialDecay::new(5, decay_rate)));
            let config = SolverConfiguration::time_evolution(total_time, steps);
            let result = rk4.solve(&scenario, &config).unwrap();
            (final_value(&result) - exact).abs()
        })
        .collect();

    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(
            ratio > 12.0 && ratio < 20.0,
            "Convergence ratio {} not fourth-order",
            ratio
        );
    }
}

#[test]
fn test_dormand_prince_error_follows_tolerance() {
    let decay_rate = 0.3;
    let total_time = 5.0;
    let exact = ExponentialDecay::new(1, decay_rate).analytical_solution(total_time, 1.0);

    let solver = DormandPrinceSolver::new();
    let mut previous = f64::INFINITY;

    for rtol in [1e-4, 1e-6, 1e-8] {
        let scenario = create_simple_scenario(Box::new(ExponentialDecay::new(3, decay_rate)));
        let config =
            SolverConfiguration::adaptive(vec![0.0, total_time], rtol, rtol * 1e-3, 100_000);
        let result = solver.solve(&scenario, &config).unwrap();

        let error = relative_error(final_value(&result), exact);
        assert!(error < 10.0 * rtol, "rtol {}: error {}", rtol, error);
        assert!(error <= previous, "error grew from {} to {}", previous, error);
        previous = error;
    }
}

#[test]
fn test_all_methods_exact_on_constant_growth() {
    let model = ConstantGrowth::new(4, 2.0);
    let expected = model.analytical_solution(3.0, 0.0);

    let fixed = SolverConfiguration::time_evolution(3.0, 7);
    let adaptive = SolverConfiguration::adaptive(vec![0.0, 1.5, 3.0], 1e-6, 1e-9, 10_000);

    let runs: [(&dyn Solver, &SolverConfiguration); 3] = [
        (&EulerSolver::new(), &fixed),
        (&RK4Solver::new(), &fixed),
        (&DormandPrinceSolver::new(), &adaptive),
    ];

    for (solver, config) in runs {
        let scenario = create_simple_scenario(Box::new(ConstantGrowth::new(4, 2.0)));
        let result = solver.solve(&scenario, config).unwrap();
        assert!(
            (final_value(&result) - expected).abs() < 1e-10,
            "{} is not exact on constant growth",
            solver.name()
        );
    }
}
