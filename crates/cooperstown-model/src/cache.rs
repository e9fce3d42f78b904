//! Load-or-train cache around the persisted classifier.
//!
//! A [`ModelCache`] is keyed by the artifact location. The first
//! [`resolve`](ModelCache::resolve) either loads the artifact or, if none
//! exists, runs the supplied training function, persists the result and keeps
//! it. Every later call returns the same [`Arc<Classifier>`].
//!
//! ```text
//! Uninitialized ──(artifact exists)──→ Ready
//! Uninitialized ──(training, saved)──→ Ready
//! ```
//!
//! The cold start runs while holding the cache mutex, so concurrent callers
//! train at most once. A failed or aborted training run leaves the cache
//! uninitialized. An artifact that exists but cannot be read is an error and
//! is never retrained over.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    classifier::{Classifier, PersistenceError},
    training::TrainError,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CacheError {
    #[display("failed to load the cached model")]
    Load(PersistenceError),
    #[display("failed to train the model")]
    Train(TrainError),
    #[display("failed to save the trained model")]
    Save(PersistenceError),
}

/// Where a resolved classifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Already held in memory.
    Cached,
    /// Read from the artifact file.
    Loaded,
    /// Trained and saved by this call.
    Trained,
}

#[derive(Debug)]
enum CacheState {
    Uninitialized,
    Ready(Arc<Classifier>),
}

#[derive(Debug)]
pub struct ModelCache {
    location: PathBuf,
    state: Mutex<CacheState>,
}

impl ModelCache {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            state: Mutex::new(CacheState::Uninitialized),
        }
    }

    #[must_use]
    pub fn location(&self) -> &Path {
        &self.location
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(
            *self.state.lock().unwrap_or_else(PoisonError::into_inner),
            CacheState::Ready(_)
        )
    }

    /// Returns the cached classifier, loading or training it on first use.
    pub fn resolve<F>(&self, train: F) -> Result<Arc<Classifier>, CacheError>
    where
        F: FnOnce() -> Result<Classifier, TrainError>,
    {
        self.resolve_with_origin(train)
            .map(|(classifier, _)| classifier)
    }

    /// Like [`resolve`](Self::resolve), also reporting which path was taken.
    pub fn resolve_with_origin<F>(
        &self,
        train: F,
    ) -> Result<(Arc<Classifier>, Resolution), CacheError>
    where
        F: FnOnce() -> Result<Classifier, TrainError>,
    {
        // state only ever moves to Ready after a complete load or save, so a
        // poisoned lock still guards a consistent value
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let CacheState::Ready(classifier) = &*state {
            return Ok((Arc::clone(classifier), Resolution::Cached));
        }

        let path = self.location.display();
        if let Some(classifier) = Classifier::load(&self.location).map_err(CacheError::Load)? {
            tracing::info!(%path, trained_at = %classifier.trained_at(), "using saved model");
            let classifier = Arc::new(classifier);
            *state = CacheState::Ready(Arc::clone(&classifier));
            return Ok((classifier, Resolution::Loaded));
        }

        tracing::info!(%path, "no saved model; training a new one");
        let classifier = train().map_err(CacheError::Train)?;
        classifier.save(&self.location).map_err(CacheError::Save)?;
        tracing::info!(%path, "saved trained model");

        let classifier = Arc::new(classifier);
        *state = CacheState::Ready(Arc::clone(&classifier));
        Ok((classifier, Resolution::Trained))
    }
}
