//! Scaled-mark estimation and cohort grade confidence intervals
//!
//! Re-exports the workspace crates:
//!
//! - [`grade_core`]: error type, percentile estimator, execution strategies
//! - [`grade_subject`]: record normalization and per-subject scaled-mark statistics
//! - [`grade_confidence`]: grade sampling and cohort average intervals
//!
//! ```rust
//! use grade_stats::prelude::*;
//!
//! let subjects = subjects_from_rows(vec![(
//!     3i64,
//!     "Psychology",
//!     "SL",
//!     "{'3': (0, 44), '4': (45, 59), '5': (60, 100)}",
//!     "{'3': 20, '4': 50, '5': 30}",
//! )])
//! .unwrap();
//!
//! let psychology = &subjects[&3];
//! assert!(psychology.z_score_for(psychology.scaled_mean()).unwrap().abs() < 1e-12);
//!
//! let ci = psychology
//!     .confidence_interval_with(25, 0.9, SimulationConfig::fast().with_seed(1), numeric_grade)
//!     .unwrap();
//! assert!(ci.lower <= ci.upper);
//! ```

pub use grade_confidence;
pub use grade_core;
pub use grade_subject;

pub use grade_core::{Error, ExecutionStrategy, Result};

/// Commonly used types and traits
pub mod prelude {
    pub use grade_confidence::{
        AnalyticInterval, BootstrapInterval, CohortSimulation, ConfidenceInterval,
        GradeIntervalEstimator, GradeSampler, SimulationConfig,
    };
    pub use grade_core::{Error, ExecutionStrategy, Result};
    pub use grade_subject::{
        numeric_grade, subjects_from_rows, Boundaries, Distribution, SubjectRecord, SubjectRow,
    };
}
