//! Artifact loader for the fitted scaler and model weights.
//!
//! Both artifacts are JSON documents produced by the training pipeline and
//! loaded exactly once at startup. Any read, parse, or shape failure is
//! fatal: the service must not start serving with a partially loaded model.

use crate::error::{Result, ScoringError};
use crate::models::autoencoder::{Autoencoder, ModelWeights};
use crate::models::inference::ScoringEngine;
use crate::models::scaler::FeatureScaler;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Persisted scaler parameters, one entry per feature index.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerArtifact {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Loads and validates the persisted artifacts.
pub struct ArtifactLoader {
    num_features: usize,
}

impl ArtifactLoader {
    /// Create a loader for the configured feature width.
    pub fn new(num_features: usize) -> Self {
        Self { num_features }
    }

    /// Load the min-max scaler artifact.
    pub fn load_scaler<P: AsRef<Path>>(&self, path: P) -> Result<FeatureScaler> {
        let path = path.as_ref();
        let artifact: ScalerArtifact = read_json(path)?;

        if artifact.min.len() != self.num_features {
            return Err(ScoringError::model_load(format!(
                "{}: scaler fitted on {} features, expected {}",
                path.display(),
                artifact.min.len(),
                self.num_features
            )));
        }

        let scaler = FeatureScaler::new(artifact.min, artifact.scale)?;
        info!(
            path = %path.display(),
            features = scaler.len(),
            "Scaler artifact loaded"
        );
        Ok(scaler)
    }

    /// Load the autoencoder weight artifact.
    pub fn load_autoencoder<P: AsRef<Path>>(&self, path: P) -> Result<Autoencoder> {
        let path = path.as_ref();
        let weights: ModelWeights = read_json(path)?;

        let model = Autoencoder::new(self.num_features, weights)?;
        info!(
            path = %path.display(),
            features = model.num_features(),
            "Model weight artifact loaded"
        );
        Ok(model)
    }

    /// Load both artifacts and assemble the scoring engine.
    pub fn load_engine<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        scaler_path: P,
        weights_path: Q,
        split_point: f64,
    ) -> Result<ScoringEngine> {
        let scaler = self.load_scaler(scaler_path)?;
        let autoencoder = self.load_autoencoder(weights_path)?;
        let engine = ScoringEngine::new(scaler, autoencoder, split_point)?;

        info!(
            features = engine.num_features(),
            split_point = engine.split_point(),
            "Scoring engine initialized"
        );
        Ok(engine)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| ScoringError::model_load(format!("{}: {e}", path.display())))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScoringError::model_load(format!("{}: {e}", path.display())))
}
