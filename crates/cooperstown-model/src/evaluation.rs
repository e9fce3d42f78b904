//! Held-out evaluation and the decision threshold.
//!
//! A probability counts as a positive prediction when it is strictly greater
//! than [`DECISION_THRESHOLD`]. The same rule drives evaluation, the training
//! accuracy in epoch reports and the user-facing [`Recommendation`].

use cooperstown_stats::ratio::{self, UndefinedMetricError};
use serde::Serialize;

use crate::{DimensionMismatchError, classifier::Classifier};

pub const DECISION_THRESHOLD: f64 = 0.5;

#[must_use]
pub fn is_positive(probability: f64) -> bool {
    probability > DECISION_THRESHOLD
}

/// Binary recommendation derived from a predicted probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Recommendation {
    #[display("Induct")]
    Induct,
    #[display("Do not induct")]
    DoNotInduct,
}

impl Recommendation {
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if is_positive(probability) {
            Self::Induct
        } else {
            Self::DoNotInduct
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn push(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positive += 1,
            (false, false) => self.true_negative += 1,
            (true, false) => self.false_positive += 1,
            (false, true) => self.false_negative += 1,
        }
    }

    /// Tallies `(probability, label)` pairs at [`DECISION_THRESHOLD`].
    pub fn from_predictions<I>(predictions: I) -> Self
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let mut counts = Self::default();
        for (probability, label) in predictions {
            counts.push(is_positive(probability), label);
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn accuracy(&self) -> Result<f64, UndefinedMetricError> {
        ratio::fraction(
            "accuracy",
            self.true_positive + self.true_negative,
            self.total(),
        )
    }

    pub fn precision(&self) -> Result<f64, UndefinedMetricError> {
        ratio::fraction(
            "precision",
            self.true_positive,
            self.true_positive + self.false_positive,
        )
    }

    pub fn recall(&self) -> Result<f64, UndefinedMetricError> {
        ratio::fraction(
            "recall",
            self.true_positive,
            self.true_positive + self.false_negative,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub counts: ConfusionCounts,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl EvaluationReport {
    pub fn from_counts(counts: ConfusionCounts) -> Result<Self, UndefinedMetricError> {
        Ok(Self {
            counts,
            accuracy: counts.accuracy()?,
            precision: counts.precision()?,
            recall: counts.recall()?,
        })
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvaluationError {
    #[display("metric is undefined on this test set")]
    UndefinedMetric(UndefinedMetricError),
    #[display("test example has the wrong number of features")]
    Dimension(DimensionMismatchError),
    #[display("got {examples} test rows but {labels} labels")]
    #[from(skip)]
    LabelCountMismatch { examples: usize, labels: usize },
}

/// Scores `classifier` on an already standardized test partition.
pub fn evaluate(
    classifier: &Classifier,
    scaled_test: &[Vec<f64>],
    labels: &[bool],
) -> Result<EvaluationReport, EvaluationError> {
    if scaled_test.len() != labels.len() {
        return Err(EvaluationError::LabelCountMismatch {
            examples: scaled_test.len(),
            labels: labels.len(),
        });
    }
    let probabilities = classifier.predict_scaled_batch(scaled_test)?;
    let counts =
        ConfusionCounts::from_predictions(probabilities.into_iter().zip(labels.iter().copied()));
    tracing::debug!(?counts, "evaluated classifier");
    Ok(EvaluationReport::from_counts(counts)?)
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use super::*;
    use crate::test_util;

    fn trained() -> Classifier {
        Classifier::train(
            &test_util::schema(),
            test_util::architecture(),
            &test_util::examples(),
            &test_util::params(2),
            |_| ControlFlow::Continue(()),
        )
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-4, "{actual} != {expected}");
    }

    #[test]
    fn test_metrics() {
        let counts = ConfusionCounts {
            true_positive: 8,
            true_negative: 50,
            false_positive: 2,
            false_negative: 4,
        };
        let report = EvaluationReport::from_counts(counts).unwrap();
        assert_close(report.accuracy, 0.90625);
        assert_close(report.precision, 0.8);
        assert_close(report.recall, 0.6667);
    }

    #[test]
    fn test_threshold_is_strict() {
        let counts = ConfusionCounts::from_predictions([
            (0.5, true),
            (0.500_001, true),
            (0.9, false),
            (0.1, false),
        ]);
        assert_eq!(
            counts,
            ConfusionCounts {
                true_positive: 1,
                true_negative: 1,
                false_positive: 1,
                false_negative: 1,
            }
        );
        assert_eq!(Recommendation::from_probability(0.5), Recommendation::DoNotInduct);
        assert_eq!(Recommendation::from_probability(0.51), Recommendation::Induct);
    }

    #[test]
    fn test_undefined_precision() {
        // nothing predicted positive
        let counts = ConfusionCounts::from_predictions([(0.1, true), (0.2, false)]);
        assert_eq!(counts.precision().unwrap_err().metric, "precision");
        assert_close(counts.recall().unwrap(), 0.0);
        assert!(EvaluationReport::from_counts(counts).is_err());
    }

    #[test]
    fn test_undefined_recall() {
        // no positive labels
        let counts = ConfusionCounts::from_predictions([(0.9, false), (0.2, false)]);
        assert_eq!(counts.recall().unwrap_err().metric, "recall");
        assert_close(counts.accuracy().unwrap(), 0.5);
    }

    #[test]
    fn test_empty_accuracy() {
        let counts = ConfusionCounts::default();
        assert_eq!(counts.accuracy().unwrap_err().metric, "accuracy");
    }

    #[test]
    fn test_evaluate_rejects_label_count_mismatch() {
        let classifier = trained();
        let rows = vec![vec![0.0, 0.0], vec![1.0, 1.0]];
        assert!(matches!(
            evaluate(&classifier, &rows, &[true]),
            Err(EvaluationError::LabelCountMismatch {
                examples: 2,
                labels: 1
            })
        ));
    }

    #[test]
    fn test_evaluate_rejects_wrong_width() {
        let classifier = trained();
        let rows = vec![vec![0.0, 0.0], vec![1.0, 1.0, 1.0]];
        assert!(matches!(
            evaluate(&classifier, &rows, &[true, false]),
            Err(EvaluationError::Dimension(DimensionMismatchError {
                expected: 2,
                actual: 3
            }))
        ));
    }

    #[test]
    fn test_evaluate_single_class_test_set() {
        let classifier = trained();
        let raw = [[0.0, 1.0], [10.0, 2.0], [20.0, 0.0]];
        let rows = classifier.scaler().transform_all(&raw).unwrap();
        // without a positive label recall has no denominator
        assert!(matches!(
            evaluate(&classifier, &rows, &[false, false, false]),
            Err(EvaluationError::UndefinedMetric(_))
        ));
    }
}
