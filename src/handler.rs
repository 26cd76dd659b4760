//! Request handling around the scoring engine.
//!
//! Maps an external request payload into a feature vector, runs the
//! normalize / reconstruct / score pipeline, and assembles the response.
//! The handler owns no mutable state; it reads the shared engine and is safe
//! to call from any number of tasks at once.

use crate::error::{Result, ScoringError};
use crate::feature_extractor::FeatureExtractor;
use crate::models::inference::ScoringEngine;
use crate::models::scorer::Score;
use crate::types::request::{ScoringRequest, ACCOUNT_ID_FIELD};
use crate::types::result::{ScoringResult, RESULT_FIELD};
use serde_json::Value;

/// A handled request: the response payload plus the score behind it.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Response to send back to the caller.
    pub result: ScoringResult,
    /// Raw scoring outcome, for alerting and metrics.
    pub score: Score,
    /// Identifier of the scored transaction.
    pub account_id: Value,
}

/// Stateless request/response handler over the loaded artifacts.
pub struct ScoringHandler {
    engine: ScoringEngine,
    extractor: FeatureExtractor,
}

impl ScoringHandler {
    /// Create a handler over an assembled engine.
    pub fn new(engine: ScoringEngine) -> Self {
        Self {
            engine,
            extractor: FeatureExtractor::new(),
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Handle one scoring request.
    ///
    /// Extracts the 29 ordered features, scores them, and builds a response
    /// that echoes the identifier and every pass-through field unchanged.
    /// The feature fields themselves are consumed, not echoed; the decision
    /// is written under [`RESULT_FIELD`].
    pub fn handle(&self, request: &ScoringRequest) -> Result<Outcome> {
        let account_id = request
            .account_id()
            .cloned()
            .ok_or_else(|| ScoringError::missing_field(ACCOUNT_ID_FIELD))?;

        let features = self.extractor.extract(request)?;
        let score = self.engine.score(&features)?;

        let mut fields = serde_json::Map::new();
        for (name, value) in &request.fields {
            if !FeatureExtractor::is_feature_field(name) {
                fields.insert(name.clone(), value.clone());
            }
        }
        fields.insert(RESULT_FIELD.to_string(), Value::from(score.is_anomaly));

        Ok(Outcome {
            result: ScoringResult::new(fields),
            score,
            account_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::FEATURE_FIELDS;
    use crate::models::autoencoder::{Autoencoder, LayerParams, ModelWeights, HIDDEN_DIM, LATENT_DIM};
    use crate::models::scaler::FeatureScaler;
    use serde_json::Map;

    fn zero_layer(in_dim: usize, out_dim: usize) -> LayerParams {
        LayerParams {
            weight: vec![vec![0.0; in_dim]; out_dim],
            bias: vec![0.0; out_dim],
        }
    }

    /// Zero-weight engine over 29 features: every input reconstructs to the
    /// zero vector, so the statistic is the log norm of the normalized input.
    fn fixture_handler(split_point: f64) -> ScoringHandler {
        let n = FEATURE_FIELDS.len();
        let weights = ModelWeights {
            encoder_in: zero_layer(n, HIDDEN_DIM),
            encoder_out: zero_layer(HIDDEN_DIM, LATENT_DIM),
            decoder_in: zero_layer(LATENT_DIM, HIDDEN_DIM),
            decoder_out: zero_layer(HIDDEN_DIM, n),
        };
        let autoencoder = Autoencoder::new(n, weights).unwrap();
        let scaler = FeatureScaler::new(vec![0.0; n], vec![1.0; n]).unwrap();
        let engine = ScoringEngine::new(scaler, autoencoder, split_point).unwrap();
        ScoringHandler::new(engine)
    }

    fn request_with_constant_features(value: f64) -> ScoringRequest {
        let mut fields = Map::new();
        fields.insert("account_id".to_string(), Value::from(1));
        fields.insert("CLASS".to_string(), Value::from("0"));
        for &name in FEATURE_FIELDS.iter() {
            fields.insert(name.to_string(), Value::from(value));
        }
        ScoringRequest::new(fields)
    }

    #[test]
    fn test_anomalous_vector_is_flagged() {
        // all-ones input, zero model: distance = sqrt(29), statistic > 0
        let handler = fixture_handler(-1.207);
        let outcome = handler.handle(&request_with_constant_features(1.0)).unwrap();

        assert!(outcome.score.is_anomaly);
        assert_eq!(outcome.result.is_anomaly(), Some(true));
        let expected = (FEATURE_FIELDS.len() as f64).sqrt().ln();
        assert!((outcome.score.statistic.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_perfectly_reconstructed_vector_is_normal() {
        // all-zero input reconstructs exactly, zero distance
        let handler = fixture_handler(-1.207);
        let outcome = handler.handle(&request_with_constant_features(0.0)).unwrap();

        assert!(!outcome.score.is_anomaly);
        assert_eq!(outcome.score.statistic, None);
        assert_eq!(outcome.result.is_anomaly(), Some(false));
    }

    #[test]
    fn test_statistic_below_split_point_is_normal() {
        // constant 0.01 per feature: distance sqrt(29) * 0.01, statistic
        // ln(0.0539) ~ -2.92, under the deployed split point
        let handler = fixture_handler(-1.207);
        let outcome = handler.handle(&request_with_constant_features(0.01)).unwrap();

        assert!(!outcome.score.is_anomaly);
        assert_eq!(outcome.result.is_anomaly(), Some(false));
    }

    #[test]
    fn test_pass_through_fields_echoed_unchanged() {
        let handler = fixture_handler(-1.207);
        let mut request = request_with_constant_features(0.5);
        request
            .fields
            .insert("CLASS".to_string(), Value::from("1"));
        request
            .fields
            .insert("merchant_type".to_string(), Value::from("RESTO"));
        request
            .fields
            .insert("amount".to_string(), Value::from(25));

        let outcome = handler.handle(&request).unwrap();
        let fields = &outcome.result.fields;

        assert_eq!(fields.get("account_id"), Some(&Value::from(1)));
        assert_eq!(fields.get("CLASS"), Some(&Value::from("1")));
        assert_eq!(fields.get("merchant_type"), Some(&Value::from("RESTO")));
        assert_eq!(fields.get("amount"), Some(&Value::from(25)));
        assert!(fields.contains_key(RESULT_FIELD));
    }

    #[test]
    fn test_feature_fields_are_not_echoed() {
        let handler = fixture_handler(-1.207);
        let outcome = handler.handle(&request_with_constant_features(0.5)).unwrap();

        for &name in FEATURE_FIELDS.iter() {
            assert!(!outcome.result.fields.contains_key(name));
        }
    }

    #[test]
    fn test_stale_result_field_is_overwritten() {
        let handler = fixture_handler(-1.207);
        let mut request = request_with_constant_features(0.0);
        request
            .fields
            .insert(RESULT_FIELD.to_string(), Value::from(""));

        let outcome = handler.handle(&request).unwrap();
        assert_eq!(outcome.result.is_anomaly(), Some(false));
    }

    #[test]
    fn test_missing_feature_field_is_named() {
        let handler = fixture_handler(-1.207);
        let mut request = request_with_constant_features(0.5);
        request.fields.remove("V23");

        let err = handler.handle(&request).unwrap_err();
        assert!(matches!(
            &err,
            ScoringError::MissingField { field } if field == "V23"
        ));
    }

    #[test]
    fn test_missing_account_id_is_named() {
        let handler = fixture_handler(-1.207);
        let mut request = request_with_constant_features(0.5);
        request.fields.remove(ACCOUNT_ID_FIELD);

        let err = handler.handle(&request).unwrap_err();
        assert!(matches!(
            &err,
            ScoringError::MissingField { field } if field == ACCOUNT_ID_FIELD
        ));
    }

    #[test]
    fn test_repeated_handling_is_deterministic() {
        let handler = fixture_handler(-1.207);
        let request = request_with_constant_features(0.7);

        let first = handler.handle(&request).unwrap();
        let second = handler.handle(&request).unwrap();

        assert_eq!(first.score.statistic, second.score.statistic);
        assert_eq!(first.score.is_anomaly, second.score.is_anomaly);
        assert_eq!(first.result.fields, second.result.fields);
    }
}
