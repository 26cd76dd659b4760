//! Scoring engine composing the loaded artifacts.

use crate::error::{Result, ScoringError};
use crate::models::autoencoder::Autoencoder;
use crate::models::scaler::FeatureScaler;
use crate::models::scorer::{AnomalyScorer, Score};

/// The full inference pipeline over one loaded scaler and model.
///
/// Built once at startup and shared read-only across requests; every call is
/// an independent, bounded computation with no shared mutable state.
#[derive(Debug)]
pub struct ScoringEngine {
    scaler: FeatureScaler,
    autoencoder: Autoencoder,
    scorer: AnomalyScorer,
}

impl ScoringEngine {
    /// Assemble the engine, cross-checking that both artifacts were produced
    /// for the same feature width.
    pub fn new(scaler: FeatureScaler, autoencoder: Autoencoder, split_point: f64) -> Result<Self> {
        if scaler.len() != autoencoder.num_features() {
            return Err(ScoringError::model_load(format!(
                "scaler fitted on {} features but model expects {}",
                scaler.len(),
                autoencoder.num_features()
            )));
        }

        Ok(Self {
            scaler,
            autoencoder,
            scorer: AnomalyScorer::new(split_point),
        })
    }

    /// Feature width both artifacts agree on.
    pub fn num_features(&self) -> usize {
        self.autoencoder.num_features()
    }

    /// The configured decision threshold.
    pub fn split_point(&self) -> f64 {
        self.scorer.split_point()
    }

    /// Score one raw feature vector: normalize, reconstruct, compare.
    pub fn score(&self, raw: &[f64]) -> Result<Score> {
        let normalized = self.scaler.normalize(raw)?;
        let reconstructed = self.autoencoder.reconstruct(&normalized)?;
        Ok(self.scorer.score(&normalized, &reconstructed))
    }
}
