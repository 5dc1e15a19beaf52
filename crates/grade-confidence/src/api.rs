//! High-level sampling and interval API on subject records
//!
//! [`CohortSimulation`] adds sampling and interval operations directly to
//! [`SubjectRecord`], drawing from the thread RNG unless a seeded
//! [`SimulationConfig`] is supplied.

use crate::config::SimulationConfig;
use crate::interval::{AnalyticInterval, BootstrapInterval, GradeIntervalEstimator};
use crate::sampler::GradeSampler;
use crate::types::ConfidenceInterval;
use grade_core::Result;
use grade_subject::SubjectRecord;
use rand::thread_rng;

/// Sampling and confidence interval operations on a subject record
///
/// # Examples
///
/// ```rust
/// use grade_confidence::{CohortSimulation, SimulationConfig};
/// use grade_subject::SubjectRecord;
///
/// let subject = SubjectRecord::new(
///     1,
///     "Chemistry",
///     "SL",
///     "{'3': (0, 49), '4': (50, 69), '5': (70, 100)}",
///     "{'3': 0.25, '4': 0.5, '5': 0.25}",
/// )
/// .unwrap();
///
/// let (low, high) = subject.confidence_interval(30, 0.9).unwrap();
/// assert!(low <= high);
///
/// let config = SimulationConfig::fast().with_seed(7);
/// let ci = subject
///     .confidence_interval_with(30, 0.9, config, |g| Ok(g.parse::<f64>().unwrap_or(0.0)))
///     .unwrap();
/// assert!(ci.contains(ci.estimate));
/// ```
pub trait CohortSimulation {
    /// One grade label drawn from the distribution
    fn sample_one(&self) -> &str;

    /// `n` independent grade labels
    fn sample_many(&self, n: usize) -> Vec<&str>;

    /// Mean numeric grade of `n` random candidates
    fn bootstrap_average(&self, n: usize) -> Result<f64>;

    /// Mean of `transform(grade)` over `n` random candidates
    fn bootstrap_average_with<F>(&self, n: usize, transform: F) -> Result<f64>
    where
        F: Fn(&str) -> Result<f64>;

    /// `(low, high)` interval of coverage `p` for the average numeric grade
    /// of a cohort of `n`, from [`DEFAULT_SIMULATIONS`](crate::DEFAULT_SIMULATIONS)
    /// simulated cohorts
    fn confidence_interval(&self, n: usize, p: f64) -> Result<(f64, f64)>;

    /// Bootstrap interval with explicit settings and grade transform
    fn confidence_interval_with<F>(
        &self,
        n: usize,
        p: f64,
        config: SimulationConfig,
        transform: F,
    ) -> Result<ConfidenceInterval>
    where
        F: Fn(&str) -> Result<f64>;

    /// Normal-approximation interval for the average numeric grade
    fn analytic_interval(&self, n: usize, p: f64) -> Result<ConfidenceInterval>;
}

impl CohortSimulation for SubjectRecord {
    fn sample_one(&self) -> &str {
        GradeSampler::new(self, thread_rng()).sample_one()
    }

    fn sample_many(&self, n: usize) -> Vec<&str> {
        GradeSampler::new(self, thread_rng()).sample_many(n)
    }

    fn bootstrap_average(&self, n: usize) -> Result<f64> {
        GradeSampler::new(self, thread_rng()).bootstrap_average(n)
    }

    fn bootstrap_average_with<F>(&self, n: usize, transform: F) -> Result<f64>
    where
        F: Fn(&str) -> Result<f64>,
    {
        GradeSampler::new(self, thread_rng()).bootstrap_average_with(n, transform)
    }

    fn confidence_interval(&self, n: usize, p: f64) -> Result<(f64, f64)> {
        Ok(BootstrapInterval::default().interval(self, n, p)?.as_tuple())
    }

    fn confidence_interval_with<F>(
        &self,
        n: usize,
        p: f64,
        config: SimulationConfig,
        transform: F,
    ) -> Result<ConfidenceInterval>
    where
        F: Fn(&str) -> Result<f64>,
    {
        BootstrapInterval::new(config).interval_with(self, n, p, transform)
    }

    fn analytic_interval(&self, n: usize, p: f64) -> Result<ConfidenceInterval> {
        AnalyticInterval.interval(self, n, p)
    }
}

/// Bootstrap interval for the average numeric grade with the given settings
pub fn average_grade_interval(
    record: &SubjectRecord,
    n: usize,
    p: f64,
    config: SimulationConfig,
) -> Result<ConfidenceInterval> {
    BootstrapInterval::new(config).interval(record, n, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grade_core::Error;

    fn subject() -> SubjectRecord {
        SubjectRecord::new(
            9,
            "Geography",
            "HL",
            "{'4': (0, 49), '5': (50, 69), '6': (70, 100)}",
            "{'4': 0.3, '5': 0.4, '6': 0.3}",
        )
        .unwrap()
    }

    #[test]
    fn test_thread_rng_sampling() {
        let subject = subject();
        assert!(subject.grades().iter().any(|g| g == subject.sample_one()));
        assert_eq!(subject.sample_many(12).len(), 12);

        let avg = subject.bootstrap_average(50).unwrap();
        assert!((4.0..=6.0).contains(&avg));
        let avg = subject.bootstrap_average_with(50, |_| Ok(1.0)).unwrap();
        assert_eq!(avg, 1.0);
    }

    #[test]
    fn test_default_interval_is_ordered() {
        let (low, high) = subject().confidence_interval(20, 0.95).unwrap();
        assert!(low <= high);
        assert!(low >= 4.0 && high <= 6.0);
    }

    #[test]
    fn test_free_function_matches_trait() {
        let config = SimulationConfig::fast().with_seed(3);
        let subject = subject();
        let a = average_grade_interval(&subject, 15, 0.8, config).unwrap();
        let b = subject
            .confidence_interval_with(15, 0.8, config, grade_subject::numeric_grade)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_errors_propagate() {
        let subject = subject();
        assert!(matches!(
            subject.confidence_interval(20, 1.0),
            Err(Error::Precondition(_))
        ));
        assert!(matches!(
            subject.analytic_interval(20, -0.5),
            Err(Error::Precondition(_))
        ));
    }
}
