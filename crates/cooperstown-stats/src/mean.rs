//! Two-phase mean accumulation.
//!
//! Values are first folded into `(sum, count)` pairs; a mean is only produced
//! afterwards, and only for accumulators that saw at least one value. Callers
//! that map a collection of accumulators through [`MeanAccumulator::mean`] get a
//! sparse result by construction instead of deleting entries after a failed
//! division.

/// Running sum and count of the values pushed so far.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    /// Adds a value to the accumulator.
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Returns the number of values pushed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the sum of the values pushed.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the arithmetic mean, or `None` if no value was pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

impl Extend<f64> for MeanAccumulator {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = f64>,
    {
        for value in iter {
            self.push(value);
        }
    }
}

impl FromIterator<f64> for MeanAccumulator {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = f64>,
    {
        let mut acc = Self::default();
        acc.extend(iter);
        acc
    }
}
