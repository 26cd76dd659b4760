//! Scoring request payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the identifier field carried alongside the feature vector.
pub const ACCOUNT_ID_FIELD: &str = "account_id";

/// A transaction submitted for scoring.
///
/// The payload is a flat mapping agreed with upstream producers: the account
/// identifier, the 29 named feature fields (numeric or numeric-string), and
/// any number of opaque pass-through fields that the response must echo
/// unchanged. The mapping is kept as-is so unknown fields survive the round
/// trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringRequest {
    pub fields: Map<String, Value>,
}

impl ScoringRequest {
    /// Wrap a decoded payload mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The account identifier, echoed verbatim in the response.
    pub fn account_id(&self) -> Option<&Value> {
        self.fields.get(ACCOUNT_ID_FIELD)
    }
}
