use std::{
    fs, io,
    ops::ControlFlow,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use cooperstown_data::FeatureSchema;
use cooperstown_model::{
    classifier::Classifier,
    evaluation::EvaluationReport,
    network::Architecture,
    optimizer::RmsPropParams,
    partition::SplitParams,
    pipeline::{Pipeline, PipelineConfig},
    training::{EpochReport, TrainingParams},
};

use crate::{
    command::{DEFAULT_MODEL_PATH, DEFAULT_TRAINING_PATH},
    util,
};

const SPLIT_SEED: u64 = 256;
const TEST_FRACTION: f64 = 0.2;

const TRAINING_SEED: u64 = 128;
const EPOCHS: usize = 100;
const BATCH_SIZE: usize = 32;

const PROGRESS_INTERVAL: usize = 10;

/// Locations of the training table and the classifier artifact.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ModelArg {
    /// Training table (CSV)
    #[arg(long = "training", default_value = DEFAULT_TRAINING_PATH)]
    training_path: PathBuf,
    /// Classifier file; the model is trained and saved here if it is absent
    #[arg(long = "model", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,
}

impl ModelArg {
    pub(crate) fn open_pipeline(&self) -> anyhow::Result<Pipeline> {
        let config = pipeline_config();
        let examples = util::read_training_file(&self.training_path, &config.schema)?;
        Ok(Pipeline::new(config, examples, &self.model_path))
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    model: ModelArg,
    /// Delete an existing classifier file and train from scratch
    #[arg(long)]
    retrain: bool,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg { model, retrain } = arg;
    if *retrain {
        remove_model_file(&model.model_path)?;
    }

    let pipeline = model.open_pipeline()?;
    let classifier = resolve_model(&pipeline)?;
    println!(
        "Model trained at {} ({} epochs, final loss {:.4})",
        classifier.trained_at(),
        classifier.epochs(),
        classifier.final_loss()
    );
    let report = pipeline
        .evaluation()
        .context("Failed to evaluate the classifier")?;
    print_evaluation(&report);
    Ok(())
}

fn pipeline_config() -> PipelineConfig {
    let schema = FeatureSchema::calculator();
    PipelineConfig {
        architecture: Architecture::standard(schema.len()),
        schema,
        split: SplitParams {
            test_fraction: TEST_FRACTION,
            seed: SPLIT_SEED,
        },
        training: TrainingParams {
            epochs: EPOCHS,
            batch_size: BATCH_SIZE,
            seed: TRAINING_SEED,
            optimizer: RmsPropParams::default(),
        },
    }
}

fn remove_model_file(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed existing model");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err)
            .with_context(|| format!("Failed to remove model file: {}", path.display())),
    }
}

pub(crate) fn resolve_model(pipeline: &Pipeline) -> anyhow::Result<Arc<Classifier>> {
    pipeline
        .model(report_progress)
        .context("Failed to obtain the classifier")
}

fn report_progress(report: &EpochReport) -> ControlFlow<()> {
    if report.epoch % PROGRESS_INTERVAL == 0 || report.epoch == report.epochs {
        tracing::info!(
            "epoch {}/{}: loss {:.4}, accuracy {:.3}",
            report.epoch,
            report.epochs,
            report.loss,
            report.accuracy
        );
    }
    ControlFlow::Continue(())
}

pub(crate) fn print_evaluation(report: &EvaluationReport) {
    let counts = &report.counts;
    println!("Evaluation on {} held-out players:", counts.total());
    println!("  Accuracy:  {:.4}", report.accuracy);
    println!("  Precision: {:.4}", report.precision);
    println!("  Recall:    {:.4}", report.recall);
    println!(
        "  TP {}  TN {}  FP {}  FN {}",
        counts.true_positive, counts.true_negative, counts.false_positive, counts.false_negative
    );
}
