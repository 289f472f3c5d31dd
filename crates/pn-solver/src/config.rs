//! Solver configuration.

use pn_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};

/// Iteration budget and convergence threshold.
///
/// Read from the `solver` section of a scenario file; missing fields take
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Passes allowed per tick before giving up
    pub max_iterations: usize,
    /// Largest per-pass channel change still counted as settled
    pub convergence_epsilon: Real,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            convergence_epsilon: 1e-6,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> SolverResult<()> {
        if self.max_iterations == 0 {
            return Err(SolverError::InvalidConfig {
                what: "max_iterations must be at least 1",
            });
        }
        if !self.convergence_epsilon.is_finite() || self.convergence_epsilon <= 0.0 {
            return Err(SolverError::InvalidConfig {
                what: "convergence_epsilon must be finite and positive",
            });
        }
        Ok(())
    }
}
