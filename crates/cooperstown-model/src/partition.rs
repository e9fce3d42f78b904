//! Seeded train/test partitioning.
//!
//! The test partition holds `ceil(n × test_fraction)` examples, the train
//! partition the rest. Membership is decided by a seeded random permutation
//! of example indices, so the same `(n, test_fraction, seed)` always selects
//! the same examples.

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// The requested split cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("test fraction must lie strictly between 0 and 1, got {fraction}")]
    FractionOutOfRange { fraction: f64 },
    #[display(
        "test fraction {fraction} over {examples} examples leaves the {side} partition empty"
    )]
    EmptyPartition {
        fraction: f64,
        examples: usize,
        side: PartitionSide,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PartitionSide {
    #[display("train")]
    Train,
    #[display("test")]
    Test,
}

/// Parameters of a reproducible split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitParams {
    pub test_fraction: f64,
    pub seed: u64,
}

impl SplitParams {
    pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
    pub const DEFAULT_SEED: u64 = 256;
}

impl Default for SplitParams {
    fn default() -> Self {
        Self {
            test_fraction: Self::DEFAULT_TEST_FRACTION,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Disjoint train and test partitions whose union is the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<T> {
    pub train: Vec<T>,
    pub test: Vec<T>,
}

/// Number of test examples for `examples` inputs.
pub fn test_count(examples: usize, test_fraction: f64) -> Result<usize, ConfigError> {
    if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(ConfigError::FractionOutOfRange {
            fraction: test_fraction,
        });
    }
    #[expect(clippy::cast_precision_loss)]
    let scaled = examples as f64 * test_fraction;
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let test = scaled.ceil() as usize;

    let empty_side = if test == 0 {
        Some(PartitionSide::Test)
    } else if test >= examples {
        Some(PartitionSide::Train)
    } else {
        None
    };
    match empty_side {
        Some(side) => Err(ConfigError::EmptyPartition {
            fraction: test_fraction,
            examples,
            side,
        }),
        None => Ok(test),
    }
}

/// Splits `examples` into train and test partitions.
///
/// Each partition keeps the relative input order of its members.
pub fn split<T>(examples: &[T], params: &SplitParams) -> Result<Partition<T>, ConfigError>
where
    T: Clone,
{
    let test = test_count(examples.len(), params.test_fraction)?;

    let mut rng = Pcg32::seed_from_u64(params.seed);
    let mut order = (0..examples.len()).collect::<Vec<_>>();
    order.shuffle(&mut rng);

    let mut is_test = vec![false; examples.len()];
    for &index in &order[..test] {
        is_test[index] = true;
    }

    let mut partition = Partition {
        train: Vec::with_capacity(examples.len() - test),
        test: Vec::with_capacity(test),
    };
    for (example, is_test) in examples.iter().zip(is_test) {
        if is_test {
            partition.test.push(example.clone());
        } else {
            partition.train.push(example.clone());
        }
    }

    tracing::debug!(
        train = partition.train.len(),
        test = partition.test.len(),
        seed = params.seed,
        "partitioned examples"
    );
    Ok(partition)
}
