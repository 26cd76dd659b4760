//! Feature extraction for anomaly scoring.
//!
//! The 29 feature field names live in one ordered list shared by request
//! parsing and response assembly, so the extraction order can never drift
//! from the order the scaler was fitted with.

use crate::error::{Result, ScoringError};
use crate::types::request::ScoringRequest;
use serde_json::Value;

/// Feature fields in the order the scaler and model were trained on.
pub const FEATURE_FIELDS: [&str; 29] = [
    "V1", "V2", "V3", "V4", "V5", "V6", "V7", "V8", "V9", "V10", "V11", "V12", "V13", "V14",
    "V15", "V16", "V17", "V18", "V19", "V20", "V21", "V22", "V23", "V24", "V25", "V26", "V27",
    "V28", "V29",
];

/// Extracts the ordered feature vector from a scoring request.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the feature vector in training order.
    ///
    /// Every field must be present and hold a finite number, either as a
    /// JSON number or a numeric string. A missing field is reported by name;
    /// it is never defaulted.
    pub fn extract(&self, request: &ScoringRequest) -> Result<Vec<f64>> {
        FEATURE_FIELDS
            .iter()
            .map(|&field| {
                let value = request
                    .field(field)
                    .ok_or_else(|| ScoringError::missing_field(field))?;
                numeric_field(field, value)
            })
            .collect()
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_FIELDS.len()
    }

    /// Whether a request field is one of the feature fields.
    pub fn is_feature_field(name: &str) -> bool {
        FEATURE_FIELDS.contains(&name)
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_field(field: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ScoringError::validation(format!(
            "field {field} is not finite"
        ))),
        None => Err(ScoringError::validation(format!(
            "field {field} is not numeric: {value}"
        ))),
    }
}
