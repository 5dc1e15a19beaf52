//! Subject statistics engine
//!
//! Published bulletins report, per subject, the scaled-mark interval of each
//! grade and the share of candidates awarded it. A [`SubjectRecord`] holds
//! those two mappings and backs out an approximate mean and standard
//! deviation of the underlying scaled marks by placing every candidate of a
//! grade at the midpoint of its interval.

use crate::normalize::{
    bounds_to_literal, distribution_to_literal, normalize_bounds, normalize_distribution,
    Boundaries, Distribution, RawData,
};
use grade_core::utils::{weighted_mean, weighted_std_dev};
use grade_core::{Error, Result};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

/// One subject's grade boundaries and grade distribution
///
/// Construction validates and normalizes the raw data; afterwards the record
/// is read-only. Derived scaled-mark statistics are computed on first access
/// and cached for the lifetime of the record. The record is `Sync`, so it can
/// be shared by reference across simulation workers.
///
/// # Examples
///
/// ```rust
/// use grade_subject::SubjectRecord;
///
/// let subject = SubjectRecord::new(
///     11,
///     "Business Management",
///     "HL",
///     "{'1': (0, 14), '2': (15, 26), '3': (27, 37), '4': (38, 49), \
///       '5': (50, 56), '6': (57, 67), '7': (68, 100)}",
///     "{'1': 0.002, '2': 0.021, '3': 0.073, '4': 0.212, \
///       '5': 0.201, '6': 0.308, '7': 0.183}",
/// )
/// .unwrap();
///
/// assert!((subject.scaled_mean() - 57.1235).abs() < 1e-9);
/// assert!((subject.scaled_standard_deviation() - 16.1724147161146).abs() < 1e-9);
/// assert!((subject.z_score_for(50.0).unwrap() + 0.4404722563107392).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct SubjectRecord {
    subject_id: i64,
    name: String,
    level: String,
    boundaries: Boundaries,
    distribution: Distribution,
    grades: Vec<String>,
    scaled_mean: OnceLock<f64>,
    scaled_std_dev: OnceLock<f64>,
}

impl SubjectRecord {
    /// Build a record from raw boundary and distribution data
    ///
    /// Distribution weights are rescaled to sum to one; bulletins round their
    /// percentages, so raw totals are rarely exact.
    ///
    /// # Errors
    ///
    /// * [`Error::Format`] if textual data falls outside the literal grammar
    /// * [`Error::UnknownGrade`] if the boundary and distribution labels differ
    /// * [`Error::InvalidInput`] for an interval with `lower > upper` or a
    ///   negative or non-finite weight
    /// * [`Error::DegenerateDistribution`] if there are no grades or the
    ///   weights sum to zero
    pub fn new(
        subject_id: i64,
        name: impl Into<String>,
        level: impl Into<String>,
        boundary_data: impl Into<RawData<Boundaries>>,
        distribution_data: impl Into<RawData<Distribution>>,
    ) -> Result<Self> {
        let boundaries = normalize_bounds(boundary_data)?;
        let mut distribution = normalize_distribution(distribution_data)?;

        validate(&boundaries, &distribution)?;

        let total: f64 = distribution.values().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(Error::DegenerateDistribution(format!(
                "grade weights of subject {subject_id} sum to {total}"
            )));
        }
        for weight in distribution.values_mut() {
            *weight /= total;
        }
        debug!(subject_id, raw_total = total, grades = distribution.len(), "normalized grade distribution");

        // BTreeMap keys iterate in lexicographic label order
        let grades = distribution.keys().cloned().collect();

        Ok(Self {
            subject_id,
            name: name.into(),
            level: level.into(),
            boundaries,
            distribution,
            grades,
            scaled_mean: OnceLock::new(),
            scaled_std_dev: OnceLock::new(),
        })
    }

    /// Unique subject identifier
    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    /// Subject name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subject level, e.g. `"HL"`
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Grade boundaries
    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    /// Grade distribution, summing to one
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Grade labels in lexicographic order
    ///
    /// This is a string sort: `"10"` comes before `"2"`.
    pub fn grades(&self) -> &[String] {
        &self.grades
    }

    /// `(label, weight)` pairs in [`grades`](Self::grades) order
    pub fn weighted_grades(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.distribution
            .iter()
            .map(|(grade, weight)| (grade.as_str(), *weight))
    }

    /// Normalized weight of `grade`
    pub fn weight(&self, grade: &str) -> Result<f64> {
        self.distribution
            .get(grade)
            .copied()
            .ok_or_else(|| Error::UnknownGrade(grade.to_string()))
    }

    /// Midpoint `(lower + upper) / 2` of the grade's scaled-mark interval
    pub fn midpoint(&self, grade: &str) -> Result<f64> {
        self.boundaries
            .get(grade)
            .map(|&(lower, upper)| (lower as f64 + upper as f64) / 2.0)
            .ok_or_else(|| Error::UnknownGrade(grade.to_string()))
    }

    /// `(midpoint, weight)` for every grade
    fn weighted_midpoints(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        // Key sets are equal, so both maps iterate in lockstep
        self.boundaries
            .values()
            .zip(self.distribution.values())
            .map(|(&(lower, upper), &weight)| ((lower as f64 + upper as f64) / 2.0, weight))
    }

    /// Estimated mean of the scaled marks
    ///
    /// Weighted sum of grade midpoints, computed once per record.
    pub fn scaled_mean(&self) -> f64 {
        *self.scaled_mean.get_or_init(|| {
            let mean = weighted_mean(self.weighted_midpoints());
            debug!(subject_id = self.subject_id, mean, "estimated scaled mean");
            mean
        })
    }

    /// Estimated standard deviation of the scaled marks
    ///
    /// Weighted spread of the grade midpoints around
    /// [`scaled_mean`](Self::scaled_mean), computed once per record.
    pub fn scaled_standard_deviation(&self) -> f64 {
        *self.scaled_std_dev.get_or_init(|| {
            let std_dev = weighted_std_dev(self.weighted_midpoints(), self.scaled_mean());
            debug!(subject_id = self.subject_id, std_dev, "estimated scaled standard deviation");
            std_dev
        })
    }

    /// Number of standard deviations `mark` lies above the scaled mean
    ///
    /// # Errors
    ///
    /// [`Error::DegenerateDistribution`] when the standard deviation is zero,
    /// e.g. when every candidate sits in one grade.
    pub fn z_score_for(&self, mark: f64) -> Result<f64> {
        let std_dev = self.scaled_standard_deviation();
        if std_dev == 0.0 {
            return Err(Error::DegenerateDistribution(format!(
                "subject {} has zero scaled standard deviation",
                self.subject_id
            )));
        }
        Ok((mark - self.scaled_mean()) / std_dev)
    }

    /// Estimated share of candidates scoring below `mark`
    ///
    /// Standard normal CDF of [`z_score_for`](Self::z_score_for).
    pub fn estimated_percentile_rank(&self, mark: f64) -> Result<f64> {
        let z = self.z_score_for(mark)?;
        let normal = Normal::new(0.0, 1.0).map_err(|e| {
            Error::Computation(format!("Failed to create normal distribution: {e}"))
        })?;
        Ok(normal.cdf(z))
    }

    /// Mean and standard deviation of the grade value under `transform`
    ///
    /// These are the population moments of a single sampled grade, the
    /// quantities a cohort average is built from.
    pub fn grade_moments_with<F>(&self, transform: F) -> Result<(f64, f64)>
    where
        F: Fn(&str) -> Result<f64>,
    {
        let pairs = self
            .weighted_grades()
            .map(|(grade, weight)| Ok((transform(grade)?, weight)))
            .collect::<Result<Vec<_>>>()?;
        let mean = weighted_mean(pairs.iter().copied());
        Ok((mean, weighted_std_dev(pairs, mean)))
    }

    /// [`grade_moments_with`](Self::grade_moments_with) for numeric labels
    pub fn grade_moments(&self) -> Result<(f64, f64)> {
        self.grade_moments_with(numeric_grade)
    }

    /// Expected numeric grade of one candidate
    pub fn mean_grade(&self) -> Result<f64> {
        Ok(self.grade_moments()?.0)
    }

    /// Standard deviation of one candidate's numeric grade
    pub fn grade_standard_deviation(&self) -> Result<f64> {
        Ok(self.grade_moments()?.1)
    }
}

/// Interpret a grade label as a number
///
/// # Errors
///
/// [`Error::Precondition`] if the label does not parse as a finite number
/// (`"nan"` and `"inf"` are rejected); non-numeric grade schemes must supply
/// their own transform.
pub fn numeric_grade(grade: &str) -> Result<f64> {
    match grade.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::Precondition(format!(
            "grade {grade:?} is not numeric; supply a grade transform"
        ))),
    }
}

fn validate(boundaries: &Boundaries, distribution: &Distribution) -> Result<()> {
    if distribution.is_empty() {
        return Err(Error::DegenerateDistribution(
            "no grades in distribution".to_string(),
        ));
    }
    if let Some(grade) = distribution
        .keys()
        .find(|grade| !boundaries.contains_key(*grade))
        .or_else(|| boundaries.keys().find(|grade| !distribution.contains_key(*grade)))
    {
        return Err(Error::UnknownGrade(grade.clone()));
    }
    for (grade, &(lower, upper)) in boundaries {
        if lower > upper {
            return Err(Error::InvalidInput(format!(
                "grade {grade:?} has lower boundary {lower} above upper boundary {upper}"
            )));
        }
    }
    for (grade, &weight) in distribution {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "grade {grade:?} has invalid weight {weight}"
            )));
        }
    }
    Ok(())
}

impl fmt::Display for SubjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject(")?;
        writeln!(f, "    subject_id={},", self.subject_id)?;
        writeln!(f, "    name={:?},", self.name)?;
        writeln!(f, "    level={:?},", self.level)?;
        writeln!(f, "    boundary_data={:?},", bounds_to_literal(&self.boundaries))?;
        writeln!(
            f,
            "    distribution_data={:?},",
            distribution_to_literal(&self.distribution)
        )?;
        write!(f, ")")
    }
}
