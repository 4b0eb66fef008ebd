//! Helper functions for integration tests

use fern_rs::physics::{PhysicalModel, PhysicalQuantity, PhysicalState};
use fern_rs::solver::{DomainBoundaries, Scenario};
use nalgebra::{DMatrix, DVector};

/// Assert that the concentrations of two states are close (within tolerance)
pub fn assert_states_close(
    state1: &PhysicalState,
    state2: &PhysicalState,
    tolerance: f64,
    message: &str,
) {
    let data1 = state1.get(PhysicalQuantity::Concentration).unwrap();
    let data2 = state2.get(PhysicalQuantity::Concentration).unwrap();
    assert_eq!(data1.len(), data2.len(), "{}: Dimension mismatch", message);

    for (i, (v1, v2)) in data1.as_slice().iter().zip(data2.as_slice()).enumerate() {
        let diff = (v1 - v2).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message,
            i,
            diff,
            tolerance
        );
    }
}

/// Create a simple scenario for testing
pub fn create_simple_scenario(model: Box<dyn PhysicalModel>) -> Scenario {
    let initial = model.setup_initial_state();
    let boundaries = DomainBoundaries::temporal(initial);
    Scenario::new(model, boundaries)
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Clean column of `points` points with `amount` at the surface
pub fn seeded_profile(points: usize, amount: f64) -> DVector<f64> {
    let mut profile = DVector::zeros(points);
    profile[0] = amount;
    profile
}

/// Zero source except `amount` at the centre cell
pub fn centre_source(rows: usize, cols: usize, amount: f64) -> DMatrix<f64> {
    let mut source = DMatrix::zeros(rows, cols);
    source[(rows / 2, cols / 2)] = amount;
    source
}

/// 2D concentration of a state
pub fn concentration_field(state: &PhysicalState) -> &DMatrix<f64> {
    state
        .get(PhysicalQuantity::Concentration)
        .unwrap()
        .as_matrix()
}
