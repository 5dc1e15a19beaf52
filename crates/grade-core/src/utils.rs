//! Utility functions for working with data slices

use std::cmp::Ordering;

/// Sort data ascending in place
///
/// NaN values are placed at the end.
///
/// # Examples
///
/// ```rust
/// use grade_core::utils::sort_ascending;
///
/// let mut data = vec![3.0, 1.0, 5.0, 2.0, 4.0];
/// sort_ascending(&mut data);
/// assert_eq!(data, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
/// ```
pub fn sort_ascending(data: &mut [f64]) {
    data.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(b),
    });
}

/// Weighted mean `Σ value·weight` of `(value, weight)` pairs
///
/// The weights are expected to sum to one.
pub fn weighted_mean<I>(pairs: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs.into_iter().map(|(value, weight)| value * weight).sum()
}

/// Weighted population standard deviation around a known `mean`
pub fn weighted_std_dev<I>(pairs: I, mean: f64) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs
        .into_iter()
        .map(|(value, weight)| {
            let diff = value - mean;
            diff * diff * weight
        })
        .sum::<f64>()
        .sqrt()
}
