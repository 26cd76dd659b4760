//! Pre-fitted min-max feature scaling.

use crate::error::{Result, ScoringError};
use ndarray::Array1;

/// Per-feature affine rescaling, fitted once on training data.
///
/// Holds a `(min, scale)` pair per feature index so that
/// `normalized = (raw - min) * scale`. The parameters are immutable for the
/// process lifetime and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct FeatureScaler {
    min: Array1<f64>,
    scale: Array1<f64>,
}

impl FeatureScaler {
    /// Build a scaler from fitted parameters.
    ///
    /// Fails with a model load error if the vectors disagree in length or
    /// contain non-finite entries (corrupted artifact).
    pub fn new(min: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if min.len() != scale.len() {
            return Err(ScoringError::model_load(format!(
                "scaler min/scale length mismatch: {} vs {}",
                min.len(),
                scale.len()
            )));
        }
        if min.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(ScoringError::model_load(
                "scaler parameters contain non-finite values",
            ));
        }

        Ok(Self {
            min: Array1::from(min),
            scale: Array1::from(scale),
        })
    }

    /// Number of features the scaler was fitted on.
    pub fn len(&self) -> usize {
        self.min.len()
    }

    /// Whether the scaler holds no parameters.
    pub fn is_empty(&self) -> bool {
        self.min.is_empty()
    }

    /// Apply `(raw - min) * scale` element-wise.
    ///
    /// The input length must match the fitted parameter count, and every
    /// rescaled value must come out finite.
    pub fn normalize(&self, raw: &[f64]) -> Result<Array1<f64>> {
        if raw.len() != self.min.len() {
            return Err(ScoringError::validation(format!(
                "expected {} features, got {}",
                self.min.len(),
                raw.len()
            )));
        }

        let raw = Array1::from_iter(raw.iter().copied());
        let normalized = (&raw - &self.min) * &self.scale;

        if normalized.iter().any(|v| !v.is_finite()) {
            return Err(ScoringError::validation(
                "normalized features contain non-finite values",
            ));
        }

        Ok(normalized)
    }
}
