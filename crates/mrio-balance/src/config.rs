use serde::{Deserialize, Serialize};

use crate::error::BalanceError;

/// Central configuration for a GRAS balancing run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    /// Stop once the largest change in the column multipliers between two
    /// sweeps is at or below this value.
    pub tolerance: f64,
    /// Hard cap on the number of sweeps.
    pub max_iterations: usize,
    /// Log the convergence metric on every sweep.
    pub verbose: bool,
    /// Sweep interval for the periodic debug-level progress message.
    pub log_interval: usize,
}

impl BalanceConfig {
    pub const DEFAULT_TOLERANCE: f64 = 1e-5;
    pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

    pub fn new(tolerance: f64, verbose: bool) -> Self {
        Self {
            tolerance,
            verbose,
            ..Self::default()
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Reject settings that would make the iteration meaningless.
    pub fn validate(&self) -> Result<(), BalanceError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(BalanceError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(BalanceError::InvalidIterationCap);
        }
        Ok(())
    }
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            verbose: false,
            log_interval: 1000,
        }
    }
}
