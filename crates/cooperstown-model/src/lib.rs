//! Hall-of-Fame classifier pipeline.
//!
//! This crate turns the labeled training table into a persisted binary
//! classifier and scores it, in the following stages:
//!
//! 1. **Partition** ([`partition`]) - seeded, reproducible train/test split
//! 2. **Scale** ([`scaler`]) - per-feature standardization fitted on the
//!    training partition only
//! 3. **Train** ([`training`], [`network`], [`optimizer`]) - a fixed
//!    feed-forward network (two hidden layers of 256 units, logistic output)
//!    minimizing binary cross-entropy with RMSprop
//! 4. **Persist** ([`classifier`], [`cache`]) - the trained network and the
//!    scaler it was trained with are stored together as one JSON artifact, and
//!    the cache loads that artifact instead of retraining when it exists
//! 5. **Evaluate** ([`evaluation`]) - accuracy, precision and recall on the
//!    held-out partition
//!
//! [`pipeline::Pipeline`] wires the stages together for callers that only
//! want "give me the model, its evaluation, and a prediction".
//!
//! # Architecture
//!
//! ```text
//! training table
//!     ↓ partition::split (seed, test fraction)
//! train partition ──→ scaler::ScalerState::fit
//!     ↓ transform            ↓ moved into
//! training::fit_network ──→ classifier::Classifier (network + scaler)
//!                               ↓ cache::ModelCache::resolve (load or train + save)
//! test partition ── transform with the artifact's scaler ──→ evaluation::evaluate
//! ```
//!
//! # Determinism
//!
//! Both the split and the training run are driven by `rand_pcg::Pcg32`
//! generators seeded from fixed `u64` seeds, so retraining on the same table
//! reproduces the same partition, the same weights and the same metrics.
//!
//! # Current Limitations
//!
//! - **No artifact versioning**: the cache is keyed by file existence only. A
//!   stale artifact is used until it is deleted; a feature-schema change is
//!   detected when the artifact is used, not when it is loaded.
//! - **CPU only, single-threaded** training.

pub mod cache;
pub mod classifier;
pub mod evaluation;
pub mod network;
pub mod optimizer;
pub mod partition;
pub mod pipeline;
pub mod scaler;
pub mod training;

/// A feature vector's length differs from what a fitted component expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("dimension mismatch: expected {expected} features, got {actual}")]
pub struct DimensionMismatchError {
    pub expected: usize,
    pub actual: usize,
}

impl DimensionMismatchError {
    pub(crate) fn check(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self { expected, actual })
        }
    }
}
