//! Cooperative cancellation
//!
//! A [`CancellationToken`] is shared between the caller and a running solver.
//! Solvers poll it every [`CANCEL_POLL_INTERVAL`] steps and abort with
//! [`SimulationError::Cancelled`](crate::error::SimulationError::Cancelled).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Number of steps between two polls of the token
pub const CANCEL_POLL_INTERVAL: usize = 64;

/// Shared cancellation flag
///
/// # Example
///
/// ```rust
/// use fern_rs::solver::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
///
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token_is_not_cancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();

        std::thread::spawn(move || clone.cancel()).join().unwrap();

        assert!(token.is_cancelled());
    }
}
