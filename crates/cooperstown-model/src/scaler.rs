//! Per-feature standardization.
//!
//! A [`ScalerState`] is fitted once on the training partition and then
//! applied unchanged to every later input (test partition, ad-hoc
//! predictions). Each feature is mapped to `(x - mean) / std_dev` using the
//! population standard deviation of the fitting data.
//!
//! A feature that is constant over the fitting data has no spread to divide
//! by; it is centered and passed through with a scale of `1.0`.

use cooperstown_stats::descriptive::DescriptiveStats;
use serde::{Deserialize, Serialize};

use crate::DimensionMismatchError;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScalerError {
    #[display("cannot fit a scaler on zero rows")]
    Empty,
    #[display("cannot fit a scaler on zero-length feature vectors")]
    NoFeatures,
    #[display("row {row} has the wrong number of features")]
    Row {
        row: usize,
        source: DimensionMismatchError,
    },
}

/// Fitted standardization parameters, one entry per feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    means: Vec<f64>,
    std_devs: Vec<f64>,
    scales: Vec<f64>,
}

impl ScalerState {
    /// Fits the scaler on `rows`. All rows must have the same length.
    pub fn fit<R>(rows: &[R]) -> Result<Self, ScalerError>
    where
        R: AsRef<[f64]>,
    {
        let Some(first) = rows.first() else {
            return Err(ScalerError::Empty);
        };
        let n_features = first.as_ref().len();
        if n_features == 0 {
            return Err(ScalerError::NoFeatures);
        }
        for (row, values) in rows.iter().enumerate() {
            DimensionMismatchError::check(n_features, values.as_ref().len())
                .map_err(|source| ScalerError::Row { row, source })?;
        }

        let mut means = Vec::with_capacity(n_features);
        let mut std_devs = Vec::with_capacity(n_features);
        let mut scales = Vec::with_capacity(n_features);
        for feature in 0..n_features {
            let column = rows.iter().map(|row| row.as_ref()[feature]);
            // rows is non-empty, so stats always exist
            let stats = DescriptiveStats::new(column).ok_or(ScalerError::Empty)?;
            let scale = if is_degenerate(stats.std_dev, stats.mean) {
                tracing::warn!(feature, mean = stats.mean, "feature is constant; not scaling");
                1.0
            } else {
                stats.std_dev
            };
            means.push(stats.mean);
            std_devs.push(stats.std_dev);
            scales.push(scale);
        }

        Ok(Self {
            means,
            std_devs,
            scales,
        })
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Population standard deviations observed while fitting.
    #[must_use]
    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Divisors actually applied by [`transform`](Self::transform).
    #[must_use]
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>, DimensionMismatchError> {
        DimensionMismatchError::check(self.n_features(), values.len())?;
        Ok(values
            .iter()
            .zip(&self.means)
            .zip(&self.scales)
            .map(|((value, mean), scale)| (value - mean) / scale)
            .collect())
    }

    pub fn transform_all<R>(&self, rows: &[R]) -> Result<Vec<Vec<f64>>, DimensionMismatchError>
    where
        R: AsRef<[f64]>,
    {
        rows.iter().map(|row| self.transform(row.as_ref())).collect()
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.means.len() == self.std_devs.len() && self.means.len() == self.scales.len()
    }
}

fn is_degenerate(std_dev: f64, mean: f64) -> bool {
    std_dev <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}
