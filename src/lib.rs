//! Anomaly Scoring Pipeline Library
//!
//! Real-time anomaly scoring for card transactions: each request's feature
//! vector is rescaled with a pre-fitted min-max scaler, reconstructed through
//! a pre-trained autoencoder, and classified against a fixed
//! reconstruction-error threshold.

pub mod config;
pub mod consumer;
pub mod error;
pub mod feature_extractor;
pub mod handler;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{Result, ScoringError};
pub use feature_extractor::FeatureExtractor;
pub use handler::ScoringHandler;
pub use models::{ArtifactLoader, ScoringEngine};
pub use producer::ResponsePublisher;
pub use types::{
    request::ScoringRequest,
    result::{AnomalyAlert, ScoringResult},
};
