//! Persistence for the reconstruction model and its feature scaler.
//!
//! The artifacts are owned by an injected [`ModelCache`] with an explicit
//! get-or-initialize contract, so callers (and tests) control where state
//! lives instead of the detector reaching for process-wide globals.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};

use super::model::{Autoencoder, FeatureScaler};
use crate::error::{AnalysisError, Result};

/// Byte-level storage for named artifacts. `load` distinguishes "absent"
/// (`Ok(None)`, recoverable by fresh initialization) from read failures.
pub trait ArtifactStore: Send + Sync {
    fn load(&self, artifact: &str) -> Result<Option<Vec<u8>>>;
    fn save(&self, artifact: &str, bytes: &[u8]) -> Result<()>;
}

/// Filesystem store. Writes go to a `.tmp` sibling first and are renamed
/// into place, so a crash mid-write never leaves a truncated artifact.
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, artifact: &str) -> PathBuf {
        self.dir.join(format!("{artifact}.json"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn load(&self, artifact: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(artifact);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AnalysisError::StoreError {
                artifact: artifact.to_string(),
                details: e.to_string(),
            }),
        }
    }

    fn save(&self, artifact: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(artifact);
        let tmp = self.dir.join(format!("{artifact}.json.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryArtifactStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an artifact with raw bytes, e.g. to simulate corruption.
    pub fn put_raw(&self, artifact: &str, bytes: Vec<u8>) {
        self.entries
            .lock()
            .expect("store lock")
            .insert(artifact.to_string(), bytes);
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn load(&self, artifact: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().expect("store lock").get(artifact).cloned())
    }

    fn save(&self, artifact: &str, bytes: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .expect("store lock")
            .insert(artifact.to_string(), bytes.to_vec());
        Ok(())
    }
}

impl<T: ArtifactStore + ?Sized> ArtifactStore for Arc<T> {
    fn load(&self, artifact: &str) -> Result<Option<Vec<u8>>> {
        (**self).load(artifact)
    }

    fn save(&self, artifact: &str, bytes: &[u8]) -> Result<()> {
        (**self).save(artifact, bytes)
    }
}

fn decode<T: DeserializeOwned>(artifact: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| AnalysisError::CorruptArtifact {
        artifact: artifact.to_string(),
        details: e.to_string(),
    })
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// A loaded model/scaler pair, shared across invocations.
pub struct LoadedModel {
    pub model: Autoencoder,
    pub scaler: FeatureScaler,
}

/// Get-or-initialize cache over an [`ArtifactStore`], keyed by artifact id.
///
/// The mutex is held for the whole load-or-initialize step, so concurrent
/// first calls cannot race a duplicate write of the persisted artifacts.
pub struct ModelCache {
    store: Box<dyn ArtifactStore>,
    loaded: Mutex<HashMap<String, Arc<LoadedModel>>>,
}

impl ModelCache {
    pub fn new(store: Box<dyn ArtifactStore>) -> Self {
        Self {
            store,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Convenience constructor over a directory on local disk.
    pub fn on_disk(dir: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FsArtifactStore::new(dir)))
    }

    fn model_artifact(id: &str) -> String {
        format!("{id}.model")
    }

    fn scaler_artifact(id: &str) -> String {
        format!("{id}.scaler")
    }

    /// Return the cached pair for `id`, loading persisted artifacts or
    /// initializing fresh ones (fitted scaler, untrained model) on first
    /// use. Fresh artifacts are persisted before they are returned.
    ///
    /// A persisted artifact that exists but cannot be decoded is an error;
    /// it is never silently replaced.
    pub fn get_or_init(
        &self,
        id: &str,
        num_features: usize,
        fit_rows: &[Vec<f64>],
    ) -> Result<Arc<LoadedModel>> {
        let mut loaded = self.loaded.lock().expect("cache lock");
        if let Some(pair) = loaded.get(id) {
            return Ok(Arc::clone(pair));
        }

        let model_key = Self::model_artifact(id);
        let scaler_key = Self::scaler_artifact(id);

        let model = match self.store.load(&model_key)? {
            Some(bytes) => decode::<Autoencoder>(&model_key, &bytes)?,
            None => {
                info!("no persisted model '{}', initializing fresh parameters", id);
                let model = Autoencoder::new(num_features);
                self.store.save(&model_key, &encode(&model)?)?;
                model
            }
        };

        let scaler = match self.store.load(&scaler_key)? {
            Some(bytes) => decode::<FeatureScaler>(&scaler_key, &bytes)?,
            None => {
                debug!("fitting fresh scaler for '{}' on {} rows", id, fit_rows.len());
                let scaler = FeatureScaler::fit(fit_rows, num_features);
                self.store.save(&scaler_key, &encode(&scaler)?)?;
                scaler
            }
        };

        if model.input_dim() != num_features || scaler.num_features() != num_features {
            return Err(AnalysisError::ShapeMismatch(format!(
                "persisted artifacts for '{}' expect {} features, dataset has {}",
                id,
                model.input_dim(),
                num_features
            )));
        }

        let pair = Arc::new(LoadedModel { model, scaler });
        loaded.insert(id.to_string(), Arc::clone(&pair));
        Ok(pair)
    }
}
