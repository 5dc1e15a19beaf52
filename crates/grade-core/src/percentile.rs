//! Linearly interpolated percentiles of sorted data

use crate::{Error, Result};

/// Value at percentile rank `p` of an ascending sequence.
///
/// Interpolates linearly between the two order statistics bracketing the
/// real-valued rank `d = p * (n - 1)`:
/// `sorted[k] + r * (sorted[k + 1] - sorted[k])` with `k = floor(d)` and
/// `r = d - k`. When `r` is zero only `sorted[k]` is read, so a single
/// element sequence is valid.
///
/// # Errors
///
/// * [`Error::Precondition`] if `p` is outside `[0, 1)`
/// * [`Error::InsufficientData`] if `sorted` is empty
///
/// # Examples
///
/// ```rust
/// use grade_core::percentile::percentile;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile(&data, 0.0).unwrap(), 1.0);
/// assert_eq!(percentile(&data, 0.5).unwrap(), 3.0);
/// assert_eq!(percentile(&data, 0.625).unwrap(), 3.5);
/// ```
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64> {
    Error::check_probability(p)?;
    if sorted.is_empty() {
        return Err(Error::InsufficientData {
            expected: 1,
            actual: 0,
        });
    }
    debug_assert!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "values must be sorted in ascending order"
    );

    let d = p * (sorted.len() - 1) as f64;
    let k = d.floor() as usize;
    let r = d - k as f64;

    if r == 0.0 {
        return Ok(sorted[k]);
    }
    Ok(sorted[k] + r * (sorted[k + 1] - sorted[k]))
}

/// Two-sided interval of total coverage `p` centred on the median.
///
/// Returns `(percentile(0.5 - p / 2), percentile(0.5 + p / 2))`.
pub fn central_interval(sorted: &[f64], p: f64) -> Result<(f64, f64)> {
    Error::check_probability(p)?;
    let lower = percentile(sorted, 0.5 - p / 2.0)?;
    let upper = percentile(sorted, 0.5 + p / 2.0)?;
    Ok((lower, upper))
}
