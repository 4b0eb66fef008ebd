//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{ConstantGrowth, ExponentialDecay};
pub use test_helpers::{
    assert_states_close, centre_source, concentration_field, create_simple_scenario,
    relative_error, seeded_profile,
};
