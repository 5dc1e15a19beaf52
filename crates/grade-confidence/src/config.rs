//! Simulation settings for bootstrap intervals

use grade_core::{Error, ExecutionStrategy, Result};
use serde::{Deserialize, Serialize};

/// Default number of bootstrap simulations
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Simulations for quick, rough estimates
pub const FAST_SIMULATIONS: usize = 1_000;

/// Simulations when tighter Monte Carlo error is worth the time
pub const HIGH_PRECISION_SIMULATIONS: usize = 50_000;

/// How a bootstrap interval is simulated
///
/// ```rust
/// use grade_confidence::{SimulationConfig, FAST_SIMULATIONS};
///
/// let config = SimulationConfig::default()
///     .with_simulations(FAST_SIMULATIONS)
///     .with_seed(42);
/// assert_eq!(config.simulations, 1_000);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of simulated cohorts
    pub simulations: usize,
    /// Base seed; `None` draws a fresh one per interval
    pub seed: Option<u64>,
    /// Sequential or parallel simulation
    pub strategy: ExecutionStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            strategy: ExecutionStrategy::Sequential,
        }
    }
}

impl SimulationConfig {
    /// Few simulations for interactive use
    pub fn fast() -> Self {
        Self::default().with_simulations(FAST_SIMULATIONS)
    }

    /// Many simulations for reporting
    pub fn high_precision() -> Self {
        Self::default().with_simulations(HIGH_PRECISION_SIMULATIONS)
    }

    /// Set the number of simulations
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    /// Fix the base seed for reproducible intervals
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the execution strategy
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the settings can run
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] for zero simulations and
    /// [`Error::FeatureNotAvailable`] for a parallel strategy without the
    /// `parallel` feature.
    pub fn validate(&self) -> Result<()> {
        Error::check_positive(self.simulations, "simulation count")?;
        if self.strategy == ExecutionStrategy::Parallel && !cfg!(feature = "parallel") {
            return Err(Error::FeatureNotAvailable(
                "parallel simulation requires the `parallel` feature".to_string(),
            ));
        }
        Ok(())
    }
}
