//! The trained classifier artifact and its JSON persistence.
//!
//! A [`Classifier`] bundles everything needed to score a raw feature vector:
//! the feature schema ids, the [`ScalerState`] fitted on the training
//! partition, and the trained [`Network`]. Because the scaler is stored inside
//! the artifact, a loaded network is always paired with the scaler it was
//! trained with.
//!
//! Files are written atomically: the JSON is written to a temporary file in
//! the destination directory and then renamed over the destination.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use cooperstown_data::{FeatureSchema, SchemaMismatchError, StatField, TrainingExample};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::{
    DimensionMismatchError,
    network::{Architecture, ArchitectureError, Network},
    scaler::ScalerState,
    training::{self, EpochReport, TrainError, TrainingParams},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PersistenceError {
    #[display("failed to read model file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("failed to parse model file {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("model file {} is inconsistent", path.display())]
    Corrupt {
        path: PathBuf,
        source: CorruptModelError,
    },
    #[display("failed to serialize model")]
    Serialize { source: serde_json::Error },
    #[display("failed to write model file {}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// The parts of a deserialized artifact do not fit together.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CorruptModelError {
    #[display("network weights do not match the stored architecture")]
    Network(ArchitectureError),
    #[display("scaler covers {scaler} features but the network expects {network}")]
    #[from(skip)]
    ScalerSize { scaler: usize, network: usize },
    #[display("{features} feature ids stored but the network expects {network}")]
    #[from(skip)]
    FeatureCount { features: usize, network: usize },
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PredictError {
    #[display("input does not match the model's features")]
    Schema(SchemaMismatchError),
    #[display("input has the wrong number of features")]
    Dimension(DimensionMismatchError),
    #[display("value of {field} is not a finite number")]
    #[from(skip)]
    NonFinite { field: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    trained_at: DateTime<Utc>,
    features: Vec<String>,
    seed: u64,
    epochs: usize,
    final_loss: f64,
    scaler: ScalerState,
    network: Network,
}

impl Classifier {
    /// Fits the scaler on `train_set` and trains a network on the scaled
    /// examples.
    ///
    /// `on_epoch` is called after every epoch and may abort the run.
    pub fn train<F>(
        schema: &FeatureSchema,
        architecture: Architecture,
        train_set: &[TrainingExample],
        params: &TrainingParams,
        mut on_epoch: F,
    ) -> Result<Self, TrainError>
    where
        F: FnMut(&EpochReport) -> ControlFlow<()>,
    {
        DimensionMismatchError::check(schema.len(), architecture.input_dim)?;
        for example in train_set {
            DimensionMismatchError::check(schema.len(), example.features.len())?;
        }

        let raw = train_set
            .iter()
            .map(|example| example.features.as_slice())
            .collect::<Vec<_>>();
        let labels = train_set
            .iter()
            .map(|example| example.label)
            .collect::<Vec<_>>();
        let scaler = ScalerState::fit(&raw)?;
        let scaled = scaler.transform_all(&raw)?;

        let mut final_loss = f64::NAN;
        let network = training::fit_network(architecture, &scaled, &labels, params, |report| {
            final_loss = report.loss;
            on_epoch(report)
        })?;

        Ok(Self {
            trained_at: Utc::now(),
            features: schema.ids(),
            seed: params.seed,
            epochs: params.epochs,
            final_loss,
            scaler,
            network,
        })
    }

    #[must_use]
    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Feature ids in input order.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Mean training loss of the last epoch.
    #[must_use]
    pub fn final_loss(&self) -> f64 {
        self.final_loss
    }

    #[must_use]
    pub fn scaler(&self) -> &ScalerState {
        &self.scaler
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn schema(&self) -> Result<FeatureSchema, SchemaMismatchError> {
        FeatureSchema::from_ids(&self.features)
    }

    /// Fails with the first feature at which this artifact and `expected`
    /// disagree.
    pub fn ensure_schema(&self, expected: &FeatureSchema) -> Result<(), SchemaMismatchError> {
        let expected = expected.ids();
        let mismatch = self
            .features
            .iter()
            .zip(&expected)
            .find(|(stored, wanted)| stored != wanted)
            .map(|(stored, _)| stored.clone())
            .or_else(|| match self.features.len().cmp(&expected.len()) {
                std::cmp::Ordering::Less => expected.get(self.features.len()).cloned(),
                std::cmp::Ordering::Greater => self.features.get(expected.len()).cloned(),
                std::cmp::Ordering::Equal => None,
            });
        match mismatch {
            Some(field) => Err(SchemaMismatchError { field }),
            None => Ok(()),
        }
    }

    /// Probability for a vector that is already standardized.
    pub fn predict_scaled(&self, scaled: &[f64]) -> Result<f64, DimensionMismatchError> {
        self.network.predict(scaled)
    }

    /// Probabilities for standardized vectors, in input order.
    pub fn predict_scaled_batch<R>(&self, rows: &[R]) -> Result<Vec<f64>, DimensionMismatchError>
    where
        R: AsRef<[f64]>,
    {
        rows.iter()
            .map(|row| self.predict_scaled(row.as_ref()))
            .collect()
    }

    /// Probability for a raw feature vector, standardized with the bundled
    /// scaler first.
    ///
    /// NaN and infinite values are rejected with the id of the offending
    /// feature.
    pub fn predict(&self, raw: &[f64]) -> Result<f64, PredictError> {
        DimensionMismatchError::check(self.features.len(), raw.len())?;
        if let Some((field, _)) = self
            .features
            .iter()
            .zip(raw)
            .find(|(_, value)| !value.is_finite())
        {
            return Err(PredictError::NonFinite {
                field: field.clone(),
            });
        }
        let scaled = self.scaler.transform(raw)?;
        Ok(self.predict_scaled(&scaled)?)
    }

    /// Probabilities for raw feature vectors, in input order.
    pub fn predict_batch<R>(&self, rows: &[R]) -> Result<Vec<f64>, PredictError>
    where
        R: AsRef<[f64]>,
    {
        rows.iter().map(|row| self.predict(row.as_ref())).collect()
    }

    /// Probability for named statistics, arranged by the stored feature ids.
    pub fn predict_named(&self, values: &BTreeMap<StatField, f64>) -> Result<f64, PredictError> {
        let raw = self.schema()?.vectorize(values)?;
        self.predict(&raw)
    }

    fn validate(&self) -> Result<(), CorruptModelError> {
        self.network.validate()?;
        let network = self.network.input_dim();
        if !self.scaler.is_consistent() || self.scaler.n_features() != network {
            return Err(CorruptModelError::ScalerSize {
                scaler: self.scaler.n_features(),
                network,
            });
        }
        if self.features.len() != network {
            return Err(CorruptModelError::FeatureCount {
                features: self.features.len(),
                network,
            });
        }
        Ok(())
    }

    /// Writes the artifact to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let write_error = |source| PersistenceError::Write {
            path: path.to_owned(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_error)?;

        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        let mut writer = BufWriter::new(&mut file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|source| PersistenceError::Serialize { source })?;
        writer.write_all(b"\n").map_err(write_error)?;
        writer.flush().map_err(write_error)?;
        drop(writer);
        file.as_file().sync_all().map_err(write_error)?;
        file.persist(path).map_err(|err| write_error(err.error))?;

        tracing::debug!(path = %path.display(), "saved model");
        Ok(())
    }

    /// Reads the artifact at `path`. Returns `Ok(None)` if there is no file.
    pub fn load(path: &Path) -> Result<Option<Self>, PersistenceError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        let classifier: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                PersistenceError::Parse {
                    path: path.to_owned(),
                    source,
                }
            })?;
        classifier
            .validate()
            .map_err(|source| PersistenceError::Corrupt {
                path: path.to_owned(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            trained_at = %classifier.trained_at,
            "loaded model"
        );
        Ok(Some(classifier))
    }
}
