//! Confidence intervals for the average grade of a cohort
//!
//! [`BootstrapInterval`] simulates many cohorts of `n` candidates and reads
//! the interval off the sorted cohort averages. [`AnalyticInterval`] is the
//! normal approximation `mean ± z·sd/√n`, a fast cross-check of the
//! simulation for large cohorts.

use crate::config::SimulationConfig;
use crate::sampler::GradeSampler;
use crate::types::ConfidenceInterval;
use grade_core::utils::sort_ascending;
use grade_core::{central_interval, execute_batch, percentile, Error, Result};
use grade_subject::{numeric_grade, SubjectRecord};
use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::{debug, instrument};

/// Estimates a confidence interval for a cohort's average grade
pub trait GradeIntervalEstimator {
    /// Interval of total coverage `p` for the mean of `transform(grade)`
    /// over a cohort of `n` candidates
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if `p` is outside `[0, 1)`, `n` is zero, or
    /// `transform` rejects a grade.
    fn interval_with<F>(
        &self,
        record: &SubjectRecord,
        n: usize,
        p: f64,
        transform: F,
    ) -> Result<ConfidenceInterval>
    where
        F: Fn(&str) -> Result<f64>;

    /// [`interval_with`](Self::interval_with) for numeric grade labels
    fn interval(&self, record: &SubjectRecord, n: usize, p: f64) -> Result<ConfidenceInterval> {
        self.interval_with(record, n, p, numeric_grade)
    }

    /// Name of the method
    fn name(&self) -> &'static str;
}

/// Percentile bootstrap over simulated cohorts
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BootstrapInterval {
    config: SimulationConfig,
}

impl BootstrapInterval {
    /// Create an estimator with the given simulation settings
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// The simulation settings
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sorted averages of `simulations` independent cohorts of size `n`
    ///
    /// `values` holds the transformed value of each grade, aligned with
    /// [`SubjectRecord::grades`]. Trial `i` draws from its own generator
    /// seeded with `seed + i`, so the result does not depend on the
    /// execution strategy.
    fn simulate_averages(&self, record: &SubjectRecord, n: usize, values: &[f64]) -> Result<Vec<f64>> {
        let seed = self.config.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(
            seed,
            simulations = self.config.simulations,
            strategy = ?self.config.strategy,
            "simulating cohorts"
        );

        let mut averages = execute_batch(self.config.strategy, self.config.simulations, |i| {
            let rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            GradeSampler::new(record, rng).bootstrap_average_of(n, values)
        })?;
        sort_ascending(&mut averages);
        Ok(averages)
    }
}

impl GradeIntervalEstimator for BootstrapInterval {
    #[instrument(
        skip(self, record, transform),
        fields(subject_id = record.subject_id(), simulations = self.config.simulations)
    )]
    fn interval_with<F>(
        &self,
        record: &SubjectRecord,
        n: usize,
        p: f64,
        transform: F,
    ) -> Result<ConfidenceInterval>
    where
        F: Fn(&str) -> Result<f64>,
    {
        Error::check_probability(p)?;
        Error::check_positive(n, "cohort size")?;
        self.config.validate()?;

        // Transform every grade up front so a bad label fails before any simulation
        let values = record
            .grades()
            .iter()
            .map(|grade| match transform(grade.as_str())? {
                value if value.is_finite() => Ok(value),
                value => Err(Error::Precondition(format!(
                    "grade {grade:?} transforms to non-finite value {value}"
                ))),
            })
            .collect::<Result<Vec<f64>>>()?;

        let averages = self.simulate_averages(record, n, &values)?;
        let (lower, upper) = central_interval(&averages, p)?;
        let estimate = percentile(&averages, 0.5)?;

        debug!(lower, upper, estimate, "bootstrap interval complete");
        Ok(ConfidenceInterval::new(lower, upper, estimate, p))
    }

    fn name(&self) -> &'static str {
        "Bootstrap"
    }
}

/// Normal approximation to the distribution of the cohort average
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticInterval;

impl GradeIntervalEstimator for AnalyticInterval {
    fn interval_with<F>(
        &self,
        record: &SubjectRecord,
        n: usize,
        p: f64,
        transform: F,
    ) -> Result<ConfidenceInterval>
    where
        F: Fn(&str) -> Result<f64>,
    {
        Error::check_probability(p)?;
        Error::check_positive(n, "cohort size")?;

        let (mean, std_dev) = record.grade_moments_with(transform)?;
        let std_error = std_dev / (n as f64).sqrt();

        let normal = Normal::new(0.0, 1.0).map_err(|e| Error::Computation(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + p / 2.0);
        let margin = z * std_error;

        Ok(ConfidenceInterval::new(mean - margin, mean + margin, mean, p))
    }

    fn name(&self) -> &'static str {
        "Normal approximation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn coin() -> SubjectRecord {
        SubjectRecord::new(1, "Coin", "SL", "{'0': (0, 49), '1': (50, 100)}", "{'0': 1, '1': 1}")
            .unwrap()
    }

    fn seeded(simulations: usize) -> BootstrapInterval {
        BootstrapInterval::new(
            SimulationConfig::default()
                .with_simulations(simulations)
                .with_seed(42),
        )
    }

    #[test]
    fn test_bootstrap_interval_brackets_expected_mean() {
        let ci = seeded(4_000).interval(&coin(), 100, 0.95).unwrap();
        assert!(ci.lower <= ci.estimate && ci.estimate <= ci.upper);
        assert!(ci.contains(0.5));
        // Binomial mean of 100 fair coins: sd 0.05, so roughly ±0.1
        assert!((ci.width() - 0.2).abs() < 0.04, "width {}", ci.width());
        assert_eq!(ci.confidence_level, 0.95);
    }

    #[test]
    fn test_seeded_bootstrap_is_reproducible() {
        let a = seeded(500).interval(&coin(), 10, 0.9).unwrap();
        let b = seeded(500).interval(&coin(), 10, 0.9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_coverage_collapses_to_median() {
        let ci = seeded(501).interval(&coin(), 10, 0.0).unwrap();
        assert_eq!(ci.lower, ci.upper);
        assert_eq!(ci.lower, ci.estimate);
    }

    #[test]
    fn test_preconditions() {
        let record = coin();
        let estimator = seeded(10);
        for p in [-0.1, 1.0, 1.5, f64::NAN] {
            assert!(matches!(
                estimator.interval(&record, 10, p),
                Err(Error::Precondition(_))
            ));
        }
        assert!(matches!(
            estimator.interval(&record, 0, 0.9),
            Err(Error::Precondition(_))
        ));
        assert!(matches!(
            seeded(0).interval(&record, 10, 0.9),
            Err(Error::Precondition(_))
        ));
        assert!(matches!(
            AnalyticInterval.interval(&record, 0, 0.9),
            Err(Error::Precondition(_))
        ));
    }

    #[test]
    fn test_bad_transform_fails_before_simulating() {
        let letters =
            SubjectRecord::new(2, "Letters", "SL", "{'A': (50, 100), 'B': (0, 49)}", "{'A': 1, 'B': 1}")
                .unwrap();
        assert!(matches!(
            seeded(10).interval(&letters, 10, 0.9),
            Err(Error::Precondition(_))
        ));

        let ci = seeded(200)
            .interval_with(&letters, 10, 0.9, |g| Ok(if g == "A" { 1.0 } else { 0.0 }))
            .unwrap();
        assert!(ci.lower >= 0.0 && ci.upper <= 1.0);
    }

    #[test]
    fn test_non_finite_grade_values_are_rejected() {
        let record = SubjectRecord::new(
            5,
            "Odd labels",
            "SL",
            "{'nan': (0, 49), '1': (50, 100)}",
            "{'nan': 1, '1': 1}",
        )
        .unwrap();
        let estimator = BootstrapInterval::new(SimulationConfig::fast().with_seed(1));
        assert!(matches!(
            estimator.interval(&record, 5, 0.9),
            Err(Error::Precondition(_))
        ));

        let coin = coin();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result =
                estimator.interval_with(&coin, 5, 0.9, |g| Ok(if g == "1" { bad } else { 0.0 }));
            assert!(matches!(result, Err(Error::Precondition(_))));
        }
    }

    #[test]
    fn test_analytic_interval() {
        let ci = AnalyticInterval.interval(&coin(), 100, 0.95).unwrap();
        assert_relative_eq!(ci.estimate, 0.5);
        // 1.959964 * 0.5 / 10
        assert_relative_eq!(ci.margin_of_error(), 0.0979982, epsilon = 1e-6);
        assert_eq!(AnalyticInterval.name(), "Normal approximation");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_interval_is_ordered_and_bounded(
            n in 1usize..30,
            p in 0.0f64..0.999,
            seed in any::<u64>(),
        ) {
            let record = SubjectRecord::new(
                4,
                "Three grades",
                "HL",
                "{'2': (0, 39), '4': (40, 69), '6': (70, 100)}",
                "{'2': 0.2, '4': 0.5, '6': 0.3}",
            )
            .unwrap();
            let estimator = BootstrapInterval::new(
                SimulationConfig::default().with_simulations(200).with_seed(seed),
            );
            let ci = estimator.interval(&record, n, p).unwrap();
            prop_assert!(ci.lower <= ci.estimate && ci.estimate <= ci.upper);
            prop_assert!(ci.lower >= 2.0 && ci.upper <= 6.0);
        }
    }

    #[test]
    fn test_single_grade_has_no_spread() {
        let record =
            SubjectRecord::new(3, "Pass only", "SL", "{'7': (0, 100)}", "{'7': 1}").unwrap();
        let ci = seeded(100).interval(&record, 5, 0.95).unwrap();
        assert_eq!(ci.as_tuple(), (7.0, 7.0));
        let analytic = AnalyticInterval.interval(&record, 5, 0.95).unwrap();
        assert_eq!(analytic.width(), 0.0);
    }
}
