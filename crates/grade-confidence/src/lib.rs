//! Confidence intervals for cohort average grades
//!
//! A subject's grade distribution describes one candidate. This crate draws
//! simulated cohorts from it and reports how far a cohort's average grade
//! can plausibly stray from its expectation.
//!
//! # Overview
//!
//! - [`GradeSampler`]: inverse-CDF draws from a record's grade distribution
//! - [`BootstrapInterval`]: percentile interval over simulated cohort averages
//! - [`AnalyticInterval`]: normal-approximation interval for cross-checking
//! - [`CohortSimulation`]: the same operations as methods on [`SubjectRecord`]
//!
//! # Example
//!
//! ```rust
//! use grade_confidence::{BootstrapInterval, GradeIntervalEstimator, SimulationConfig};
//! use grade_subject::SubjectRecord;
//!
//! let subject = SubjectRecord::new(
//!     11,
//!     "Business Management",
//!     "HL",
//!     "{'1': (0, 14), '2': (15, 26), '3': (27, 37), '4': (38, 49), \
//!       '5': (50, 56), '6': (57, 67), '7': (68, 100)}",
//!     "{'1': 0.002, '2': 0.021, '3': 0.073, '4': 0.212, \
//!       '5': 0.201, '6': 0.308, '7': 0.183}",
//! )
//! .unwrap();
//!
//! let estimator = BootstrapInterval::new(SimulationConfig::default().with_seed(42));
//! let ci = estimator.interval(&subject, 20, 0.95).unwrap();
//! assert!(ci.lower < 5.245 && 5.245 < ci.upper);
//! ```

pub mod api;
pub mod config;
pub mod interval;
pub mod sampler;
pub mod types;

pub use api::{average_grade_interval, CohortSimulation};
pub use config::{
    SimulationConfig, DEFAULT_SIMULATIONS, FAST_SIMULATIONS, HIGH_PRECISION_SIMULATIONS,
};
pub use interval::{AnalyticInterval, BootstrapInterval, GradeIntervalEstimator};
pub use sampler::GradeSampler;
pub use types::ConfidenceInterval;

pub use grade_core::{Error, ExecutionStrategy, Result};
pub use grade_subject::SubjectRecord;
