//! Type definitions for the anomaly scoring pipeline

pub mod request;
pub mod result;

pub use request::ScoringRequest;
pub use result::{AnomalyAlert, ScoringResult};
