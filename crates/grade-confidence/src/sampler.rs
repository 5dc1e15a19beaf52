//! Random grades drawn from a subject's grade distribution

use grade_core::{Error, Result};
use grade_subject::{numeric_grade, SubjectRecord};
use rand::Rng;

/// Draws grades from a subject's categorical grade distribution
///
/// The sampler borrows the record and owns its random source, so seeding
/// the source makes every draw reproducible.
///
/// # Examples
///
/// ```rust
/// use grade_confidence::GradeSampler;
/// use grade_subject::SubjectRecord;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let subject = SubjectRecord::new(1, "Maths", "SL", "{'1': (0, 49), '2': (50, 100)}", "{'1': 1, '2': 3}")
///     .unwrap();
/// let mut sampler = GradeSampler::new(&subject, StdRng::seed_from_u64(7));
///
/// let grades = sampler.sample_many(5);
/// assert_eq!(grades.len(), 5);
/// assert!(grades.iter().all(|g| *g == "1" || *g == "2"));
/// ```
#[derive(Debug, Clone)]
pub struct GradeSampler<'a, R> {
    record: &'a SubjectRecord,
    rng: R,
}

impl<'a, R: Rng> GradeSampler<'a, R> {
    /// Create a sampler over `record` driven by `rng`
    pub fn new(record: &'a SubjectRecord, rng: R) -> Self {
        Self { record, rng }
    }

    /// Index into [`SubjectRecord::grades`] of one random grade
    ///
    /// Inverse-CDF walk: draw `u` in `[0, 1)` and subtract each weight in
    /// lexicographic label order until `u` turns negative. If rounding leaves
    /// `u` non-negative after the last grade, the last grade is returned.
    pub fn sample_index(&mut self) -> usize {
        let u: f64 = self.rng.gen();
        self.index_at(u)
    }

    /// Grade index reached by walking the weights down from `u`
    fn index_at(&self, mut u: f64) -> usize {
        let mut index = 0;
        for (i, (_, weight)) in self.record.weighted_grades().enumerate() {
            index = i;
            u -= weight;
            if u < 0.0 {
                return index;
            }
        }
        index
    }

    /// One random grade label
    pub fn sample_one(&mut self) -> &'a str {
        let record = self.record;
        &record.grades()[self.sample_index()]
    }

    /// `n` independent random grade labels
    pub fn sample_many(&mut self, n: usize) -> Vec<&'a str> {
        (0..n).map(|_| self.sample_one()).collect()
    }

    /// Mean numeric grade of a bootstrap sample of size `n`
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if `n` is zero or a drawn label is not numeric.
    pub fn bootstrap_average(&mut self, n: usize) -> Result<f64> {
        self.bootstrap_average_with(n, numeric_grade)
    }

    /// Mean of `transform(grade)` over a bootstrap sample of size `n`
    pub fn bootstrap_average_with<F>(&mut self, n: usize, transform: F) -> Result<f64>
    where
        F: Fn(&str) -> Result<f64>,
    {
        Error::check_positive(n, "sample size")?;
        let mut sum = 0.0;
        for _ in 0..n {
            sum += transform(self.sample_one())?;
        }
        Ok(sum / n as f64)
    }

    /// Mean of `values[index]` over `n` draws; `values` is aligned with the grades
    pub(crate) fn bootstrap_average_of(&mut self, n: usize, values: &[f64]) -> f64 {
        let sum: f64 = (0..n).map(|_| values[self.sample_index()]).sum();
        sum / n as f64
    }
}
