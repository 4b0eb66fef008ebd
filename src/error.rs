//! Error taxonomy for simulation runs
//!
//! Every public entry point of the crate returns [`SimulationError`]. Errors are
//! local to one invocation: nothing is retried, and a failed run never hands
//! back partially-filled or NaN-bearing output.

/// Errors raised while validating inputs or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// A parameter is outside its admissible range (non-positive spacing,
    /// mismatched shapes, non-finite coefficients, ...).
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The explicit 2D scheme would be unstable with the requested steps.
    #[error(
        "Unstable configuration (diffusion number {diffusion_number:.4}, \
         Courant number {courant_number:.4}): {reason}"
    )]
    UnstableConfiguration {
        diffusion_number: f64,
        courant_number: f64,
        reason: String,
    },

    /// The adaptive integrator could not advance the solution.
    #[error("Integration failed at t = {time}: {reason}")]
    IntegrationFailure { time: f64, reason: String },

    /// A reducer received a zero-length series.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// NaN or infinity appeared in the state during fixed-step integration.
    #[error(
        "Non-finite value detected in {quantity} at step {step}; \
         reduce the time step or check the model coefficients"
    )]
    NumericalInstability { quantity: String, step: usize },

    /// The run was cancelled through its [`CancellationToken`](crate::solver::CancellationToken).
    #[error("Simulation cancelled at step {step}")]
    Cancelled { step: usize },

    /// rows × cols × steps exceeds the configured work bound.
    #[error("Requested {requested} cell updates, limit is {limit}")]
    WorkBudgetExceeded { requested: u128, limit: u64 },

    /// The solver configuration does not fit the chosen method.
    #[error("{solver} does not support {configuration} configuration")]
    UnsupportedConfiguration {
        solver: &'static str,
        configuration: String,
    },

    #[error("Configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Shorthand for [`SimulationError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = SimulationError::invalid("dx", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid parameter `dx`: must be positive, got 0"
        );
    }

    #[test]
    fn test_unstable_message_contains_numbers() {
        let err = SimulationError::UnstableConfiguration {
            diffusion_number: 0.75,
            courant_number: 0.1,
            reason: "dt too large".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("0.7500"));
        assert!(message.contains("dt too large"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: SimulationError = io.into();
        assert!(matches!(err, SimulationError::Io(_)));
    }
}
