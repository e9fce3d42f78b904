//! Ratios whose denominator may legitimately be zero.
//!
//! Precision, recall, accuracy and the pitcher win/loss percentage are all
//! simple quotients, but on small or skewed inputs their denominators can be
//! zero. These helpers turn that case into an [`UndefinedMetricError`] naming
//! the metric, so it can never leak out as `NaN` or as a silent `0.0`.

/// A metric could not be computed because its denominator was zero.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{metric} is undefined: denominator is zero")]
pub struct UndefinedMetricError {
    /// Name of the metric that was requested.
    pub metric: &'static str,
}

/// Divides `numerator` by `denominator`, failing when the denominator is zero.
///
/// # Examples
///
/// ```
/// use cooperstown_stats::ratio;
///
/// let recall = ratio::checked("recall", 8.0, 12.0).unwrap();
/// assert!((recall - 0.6667).abs() < 1e-4);
///
/// let err = ratio::checked("recall", 0.0, 0.0).unwrap_err();
/// assert_eq!(err.metric, "recall");
/// ```
pub fn checked(
    metric: &'static str,
    numerator: f64,
    denominator: f64,
) -> Result<f64, UndefinedMetricError> {
    if denominator == 0.0 {
        return Err(UndefinedMetricError { metric });
    }
    Ok(numerator / denominator)
}

/// Computes `part / total` from integer tallies.
#[expect(clippy::cast_precision_loss)]
pub fn fraction(
    metric: &'static str,
    part: usize,
    total: usize,
) -> Result<f64, UndefinedMetricError> {
    checked(metric, part as f64, total as f64)
}
