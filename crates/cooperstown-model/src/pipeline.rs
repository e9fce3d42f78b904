//! End-to-end orchestration: split, train or load, evaluate, predict.
//!
//! A [`Pipeline`] owns the labeled examples, one [`ModelCache`] and the
//! split/training configuration. The held-out evaluation is computed once per
//! pipeline and reused.
//!
//! When the classifier comes from an existing artifact, the test partition is
//! rebuilt from the examples with the same split parameters and standardized
//! with the artifact's own scaler.

use std::{
    collections::BTreeMap,
    ops::ControlFlow,
    path::PathBuf,
    sync::{Arc, OnceLock},
};

use cooperstown_data::{FeatureSchema, SchemaMismatchError, StatField, TrainingExample};
use serde::Serialize;

use crate::{
    cache::{CacheError, ModelCache},
    classifier::{Classifier, PredictError},
    evaluation::{self, EvaluationError, EvaluationReport, Recommendation},
    network::Architecture,
    partition::{self, ConfigError, Partition, SplitParams},
    training::{EpochReport, TrainingParams},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub schema: FeatureSchema,
    pub architecture: Architecture,
    pub split: SplitParams,
    pub training: TrainingParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let schema = FeatureSchema::calculator();
        let architecture = Architecture::standard(schema.len());
        Self {
            schema,
            architecture,
            split: SplitParams::default(),
            training: TrainingParams::default(),
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PipelineError {
    #[display("invalid train/test split")]
    Split(ConfigError),
    #[display("classifier unavailable")]
    Cache(CacheError),
    #[display("saved model was trained on different features")]
    Schema(SchemaMismatchError),
    #[display("evaluation failed")]
    Evaluation(EvaluationError),
    #[display("prediction failed")]
    Predict(PredictError),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub recommendation: Recommendation,
}

#[derive(Debug)]
pub struct Pipeline {
    config: PipelineConfig,
    examples: Vec<TrainingExample>,
    cache: ModelCache,
    evaluation: OnceLock<EvaluationReport>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        examples: Vec<TrainingExample>,
        location: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            examples,
            cache: ModelCache::new(location),
            evaluation: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[must_use]
    pub fn cache(&self) -> &ModelCache {
        &self.cache
    }

    #[must_use]
    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn partition(&self) -> Result<Partition<TrainingExample>, ConfigError> {
        partition::split(&self.examples, &self.config.split)
    }

    /// Resolves the classifier, training on the train partition if no
    /// artifact exists. `on_epoch` only runs when training happens.
    pub fn model<F>(&self, on_epoch: F) -> Result<Arc<Classifier>, PipelineError>
    where
        F: FnMut(&EpochReport) -> ControlFlow<()>,
    {
        let classifier = self.cache.resolve(|| {
            let Partition { train, .. } = self.partition()?;
            Classifier::train(
                &self.config.schema,
                self.config.architecture.clone(),
                &train,
                &self.config.training,
                on_epoch,
            )
        })?;
        classifier.ensure_schema(&self.config.schema)?;
        Ok(classifier)
    }

    /// Accuracy, precision and recall on the test partition.
    pub fn evaluation(&self) -> Result<EvaluationReport, PipelineError> {
        if let Some(report) = self.evaluation.get() {
            return Ok(*report);
        }
        let classifier = self.model(|_| ControlFlow::Continue(()))?;
        let Partition { test, .. } = self.partition()?;

        let raw = test
            .iter()
            .map(|example| example.features.as_slice())
            .collect::<Vec<_>>();
        let labels = test.iter().map(|example| example.label).collect::<Vec<_>>();
        let scaled = classifier
            .scaler()
            .transform_all(&raw)
            .map_err(EvaluationError::from)?;
        let report = evaluation::evaluate(&classifier, &scaled, &labels)?;

        tracing::info!(
            accuracy = report.accuracy,
            precision = report.precision,
            recall = report.recall,
            "evaluated classifier on {} held-out players",
            test.len()
        );
        Ok(*self.evaluation.get_or_init(|| report))
    }

    /// Scores one player given named career statistics.
    pub fn predict(&self, values: &BTreeMap<StatField, f64>) -> Result<Prediction, PipelineError> {
        let classifier = self.model(|_| ControlFlow::Continue(()))?;
        let probability = classifier.predict_named(values)?;
        Ok(Prediction {
            probability,
            recommendation: Recommendation::from_probability(probability),
        })
    }
}
