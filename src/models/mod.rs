//! Model inference components

pub mod autoencoder;
pub mod inference;
pub mod loader;
pub mod scaler;
pub mod scorer;

pub use autoencoder::Autoencoder;
pub use inference::ScoringEngine;
pub use loader::ArtifactLoader;
pub use scaler::FeatureScaler;
pub use scorer::{AnomalyScorer, Score};
