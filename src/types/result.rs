//! Scoring response and anomaly alert payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the boolean decision field added to every response.
pub const RESULT_FIELD: &str = "result";

/// Response for one scored transaction.
///
/// Echoes the identifier and every pass-through field of the request
/// unchanged; the feature fields are consumed by scoring and not repeated.
/// The decision lands under [`RESULT_FIELD`] as a JSON boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringResult {
    pub fields: Map<String, Value>,
}

impl ScoringResult {
    /// Wrap an assembled response mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The decision field, when present and boolean.
    pub fn is_anomaly(&self) -> Option<bool> {
        self.fields.get(RESULT_FIELD)?.as_bool()
    }
}

/// Alert published when a transaction is scored anomalous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyAlert {
    /// Unique alert identifier.
    pub alert_id: String,

    /// Account identifier from the flagged request, echoed verbatim.
    pub account_id: Value,

    /// Log reconstruction distance that crossed the threshold.
    pub statistic: f64,

    /// Threshold in force when the alert fired.
    pub split_point: f64,

    /// Alert generation timestamp.
    pub timestamp: DateTime<Utc>,
}

impl AnomalyAlert {
    /// Create a new alert for a flagged transaction.
    pub fn new(account_id: Value, statistic: f64, split_point: f64) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            account_id,
            statistic,
            split_point,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_decision_accessor() {
        let mut fields = Map::new();
        fields.insert("account_id".to_string(), Value::from(1));
        fields.insert(RESULT_FIELD.to_string(), Value::from(true));

        let result = ScoringResult::new(fields);
        assert_eq!(result.is_anomaly(), Some(true));
    }

    #[test]
    fn test_alert_serialization() {
        let alert = AnomalyAlert::new(Value::from("acct-42"), -0.85, -1.207);

        let json = serde_json::to_string(&alert).unwrap();
        let deserialized: AnomalyAlert = serde_json::from_str(&json).unwrap();

        assert_eq!(alert.alert_id, deserialized.alert_id);
        assert_eq!(alert.account_id, deserialized.account_id);
        assert_eq!(alert.statistic, deserialized.statistic);
        assert_eq!(alert.split_point, deserialized.split_point);
    }
}
