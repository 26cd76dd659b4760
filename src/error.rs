//! Error types for the anomaly scoring pipeline.

use thiserror::Error;

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors raised while loading artifacts or scoring a request.
///
/// `ModelLoad` is fatal and only occurs during startup; the other variants
/// are per-request failures that leave the service running.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A required feature field is absent from the request.
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Malformed, non-numeric, or non-finite request input.
    #[error("invalid input: {reason}")]
    Validation { reason: String },

    /// Unreadable artifact or a shape that does not match the architecture.
    #[error("model load failed: {reason}")]
    ModelLoad { reason: String },
}

impl ScoringError {
    /// Create a missing field error naming the absent field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Create a model load error.
    pub fn model_load(reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            reason: reason.into(),
        }
    }

    /// Whether this error is fatal to the process (startup artifact failure).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelLoad { .. })
    }
}
