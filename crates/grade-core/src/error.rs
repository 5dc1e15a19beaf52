//! Error types for grade statistics
//!
//! Provides a unified error type for all grade-stats crates.

use thiserror::Error;

/// Core error type for grade statistics operations
#[derive(Error, Debug)]
pub enum Error {
    /// Textual record data outside the literal grammar, or of the wrong shape
    #[error("Format error: {reason} in {repr}")]
    Format {
        /// Representation of the offending value
        repr: String,
        /// What went wrong
        reason: String,
    },

    /// A grade label without a boundary or distribution entry
    #[error("Unknown grade: {0:?}")]
    UnknownGrade(String),

    /// Distribution too degenerate for the requested statistic
    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    /// A caller-side precondition was violated
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Insufficient data for the requested operation
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Threading or parallelization error
    #[error("Execution error: {0}")]
    Execution(String),

    /// Feature not available
    #[error("Feature not available: {0}")]
    FeatureNotAvailable(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create a format error for an offending value
    pub fn format(repr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            repr: repr.into(),
            reason: reason.into(),
        }
    }

    /// Create an error for a probability outside `[0, 1)`
    pub fn invalid_probability(p: f64) -> Self {
        Self::Precondition(format!("probability {p} must be in [0, 1)"))
    }

    /// Check that `p` lies in the half-open interval `[0, 1)`
    pub fn check_probability(p: f64) -> Result<()> {
        if !(0.0..1.0).contains(&p) {
            return Err(Self::invalid_probability(p));
        }
        Ok(())
    }

    /// Check that a sample size is positive
    pub fn check_positive(value: usize, what: &str) -> Result<()> {
        if value == 0 {
            return Err(Self::Precondition(format!("{what} must be positive")));
        }
        Ok(())
    }
}
