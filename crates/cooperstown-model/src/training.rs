//! Mini-batch training loop.
//!
//! [`fit_network`] builds a network from an [`Architecture`], then for each
//! epoch shuffles the training examples, walks them in mini-batches, averages
//! the per-example gradients of each batch and applies one RMSprop step.
//!
//! The network initialization and the per-epoch shuffles draw from one
//! `Pcg32` generator seeded with [`TrainingParams::seed`], so a run is fully
//! determined by its inputs and parameters.
//!
//! After every epoch the caller's progress callback receives an
//! [`EpochReport`] and may stop the run by returning
//! [`ControlFlow::Break`]. A stopped run yields [`TrainError::Aborted`] and no
//! network.

use std::ops::ControlFlow;

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    DimensionMismatchError,
    evaluation,
    network::{Architecture, ArchitectureError, Gradients, Network},
    optimizer::{RmsProp, RmsPropParams},
    partition::ConfigError,
    scaler::ScalerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    pub epochs: usize,
    pub batch_size: usize,
    pub seed: u64,
    #[serde(default)]
    pub optimizer: RmsPropParams,
}

impl TrainingParams {
    pub const DEFAULT_EPOCHS: usize = 100;
    pub const DEFAULT_BATCH_SIZE: usize = 32;
    pub const DEFAULT_SEED: u64 = 128;
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            epochs: Self::DEFAULT_EPOCHS,
            batch_size: Self::DEFAULT_BATCH_SIZE,
            seed: Self::DEFAULT_SEED,
            optimizer: RmsPropParams::default(),
        }
    }
}

/// Training progress after one completed epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// 1-based index of the completed epoch.
    pub epoch: usize,
    pub epochs: usize,
    /// Mean binary cross-entropy over the epoch's examples.
    pub loss: f64,
    /// Fraction of the epoch's examples classified correctly at the time
    /// they were visited.
    pub accuracy: f64,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainError {
    #[display("invalid train/test split")]
    Split(ConfigError),
    #[display("cannot fit feature scaler")]
    Scaler(ScalerError),
    #[display("invalid network architecture")]
    Architecture(ArchitectureError),
    #[display("training example has the wrong number of features")]
    Dimension(DimensionMismatchError),
    #[display("training set is empty")]
    #[from(skip)]
    EmptyTrainingSet,
    #[display("got {examples} feature rows but {labels} labels")]
    #[from(skip)]
    LabelCountMismatch { examples: usize, labels: usize },
    #[display("{field} must be positive")]
    #[from(skip)]
    InvalidParameter { field: &'static str },
    #[display("training aborted after epoch {epoch}")]
    #[from(skip)]
    Aborted { epoch: usize },
}

/// Trains a new network on standardized `inputs` with binary `labels`.
pub fn fit_network<F>(
    architecture: Architecture,
    inputs: &[Vec<f64>],
    labels: &[bool],
    params: &TrainingParams,
    mut on_epoch: F,
) -> Result<Network, TrainError>
where
    F: FnMut(&EpochReport) -> ControlFlow<()>,
{
    if params.epochs == 0 {
        return Err(TrainError::InvalidParameter { field: "epochs" });
    }
    if params.batch_size == 0 {
        return Err(TrainError::InvalidParameter {
            field: "batch_size",
        });
    }
    if inputs.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    if inputs.len() != labels.len() {
        return Err(TrainError::LabelCountMismatch {
            examples: inputs.len(),
            labels: labels.len(),
        });
    }
    for input in inputs {
        DimensionMismatchError::check(architecture.input_dim, input.len())?;
    }

    let mut rng = Pcg32::seed_from_u64(params.seed);
    let mut network = Network::new(architecture, &mut rng)?;
    let mut optimizer = RmsProp::new(params.optimizer, &network);
    let mut gradients = Gradients::zeros_like(&network);
    let mut order = (0..inputs.len()).collect::<Vec<_>>();

    tracing::info!(
        examples = inputs.len(),
        epochs = params.epochs,
        batch_size = params.batch_size,
        seed = params.seed,
        "training started"
    );

    for epoch in 1..=params.epochs {
        order.shuffle(&mut rng);
        let mut loss_sum = 0.0;
        let mut correct = 0_usize;

        for batch in order.chunks(params.batch_size) {
            gradients.reset();
            for &index in batch {
                let label = labels[index];
                let (loss, probability) =
                    network.accumulate_gradients(&inputs[index], label, &mut gradients);
                loss_sum += loss;
                if evaluation::is_positive(probability) == label {
                    correct += 1;
                }
            }
            #[expect(clippy::cast_precision_loss)]
            let batch_len = batch.len() as f64;
            gradients.scale(1.0 / batch_len);
            optimizer.step(&mut network, &gradients);
        }

        #[expect(clippy::cast_precision_loss)]
        let report = EpochReport {
            epoch,
            epochs: params.epochs,
            loss: loss_sum / inputs.len() as f64,
            accuracy: correct as f64 / inputs.len() as f64,
        };
        tracing::debug!(
            epoch,
            loss = report.loss,
            accuracy = report.accuracy,
            "epoch finished"
        );
        if on_epoch(&report).is_break() {
            tracing::info!(epoch, "training aborted");
            return Err(TrainError::Aborted { epoch });
        }
    }

    tracing::info!("training finished");
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Activation;

    fn tiny(input_dim: usize) -> Architecture {
        Architecture {
            input_dim,
            hidden_layers: vec![6, 6],
            hidden_activation: Activation::Tanh,
        }
    }

    /// Linearly separable points: positive iff x0 + x1 > 0.
    fn separable() -> (Vec<Vec<f64>>, Vec<bool>) {
        let mut inputs = vec![];
        let mut labels = vec![];
        for i in -5_i32..5 {
            for j in -5_i32..5 {
                let x = [f64::from(i) + 0.5, f64::from(j) + 0.25];
                inputs.push(x.map(|v| v / 5.0).to_vec());
                labels.push(x[0] + x[1] > 0.0);
            }
        }
        (inputs, labels)
    }

    fn params(epochs: usize) -> TrainingParams {
        TrainingParams {
            epochs,
            batch_size: 8,
            seed: 9,
            optimizer: RmsPropParams {
                learning_rate: 0.01,
                ..RmsPropParams::default()
            },
        }
    }

    #[test]
    fn test_learns_separable_data() {
        let (inputs, labels) = separable();
        let mut reports = vec![];
        let network = fit_network(tiny(2), &inputs, &labels, &params(40), |report| {
            reports.push(*report);
            ControlFlow::Continue(())
        })
        .unwrap();

        assert_eq!(reports.len(), 40);
        assert_eq!(reports[39].epoch, 40);
        assert!(reports[39].loss < reports[0].loss);

        let correct = inputs
            .iter()
            .zip(&labels)
            .filter(|(x, y)| evaluation::is_positive(network.predict(x).unwrap()) == **y)
            .count();
        assert!(correct >= 85, "only {correct} of 100 correct");
    }

    #[test]
    fn test_same_seed_same_network() {
        let (inputs, labels) = separable();
        let continue_ = |_: &EpochReport| ControlFlow::Continue(());
        let a = fit_network(tiny(2), &inputs, &labels, &params(3), continue_).unwrap();
        let b = fit_network(tiny(2), &inputs, &labels, &params(3), continue_).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_abort() {
        let (inputs, labels) = separable();
        let result = fit_network(tiny(2), &inputs, &labels, &params(10), |report| {
            if report.epoch == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(matches!(result, Err(TrainError::Aborted { epoch: 2 })));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let continue_ = |_: &EpochReport| ControlFlow::Continue(());
        assert!(matches!(
            fit_network(tiny(2), &[], &[], &params(1), continue_),
            Err(TrainError::EmptyTrainingSet)
        ));
        assert!(matches!(
            fit_network(tiny(2), &[vec![0.0, 1.0]], &[], &params(1), continue_),
            Err(TrainError::LabelCountMismatch { .. })
        ));
        assert!(matches!(
            fit_network(tiny(2), &[vec![0.0]], &[true], &params(1), continue_),
            Err(TrainError::Dimension(_))
        ));
        assert!(matches!(
            fit_network(tiny(2), &[vec![0.0, 1.0]], &[true], &params(0), continue_),
            Err(TrainError::InvalidParameter { field: "epochs" })
        ));
    }
}
