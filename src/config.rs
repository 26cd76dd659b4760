//! Configuration management for the anomaly scoring pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub artifacts: ArtifactsConfig,
    pub detection: DetectionConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming scoring requests
    pub request_subject: String,
    /// Subject for scoring responses without a reply subject
    pub result_subject: String,
    /// Subject for anomaly alerts
    pub alert_subject: String,
    /// Optional queue group so replicas share the request stream
    #[serde(default)]
    pub queue_group: Option<String>,
}

/// Model and scaler artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
    /// Path to the fitted min-max scaler artifact
    pub scaler_path: String,
    /// Path to the autoencoder weight artifact
    pub weights_path: String,
    /// Feature width both artifacts must match (default: 29)
    #[serde(default = "default_num_features")]
    pub num_features: usize,
}

fn default_num_features() -> usize {
    29
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Log reconstruction distance above which a transaction is anomalous.
    /// Fixed at deployment time.
    pub split_point: f64,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrently scored requests
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                request_subject: "scoring.requests".to_string(),
                result_subject: "scoring.results".to_string(),
                alert_subject: "scoring.alerts".to_string(),
                queue_group: None,
            },
            artifacts: ArtifactsConfig {
                scaler_path: "artifacts/scaler.json".to_string(),
                weights_path: "artifacts/weights.json".to_string(),
                num_features: default_num_features(),
            },
            detection: DetectionConfig {
                split_point: -1.207,
            },
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.detection.split_point, -1.207);
        assert_eq!(config.artifacts.num_features, 29);
        assert_eq!(config.pipeline.workers, 4);
        assert_eq!(config.nats.queue_group, None);
    }

    #[test]
    fn test_num_features_defaults_when_omitted() {
        let toml = r#"
            [nats]
            url = "nats://localhost:4222"
            request_subject = "scoring.requests"
            result_subject = "scoring.results"
            alert_subject = "scoring.alerts"

            [artifacts]
            scaler_path = "artifacts/scaler.json"
            weights_path = "artifacts/weights.json"

            [detection]
            split_point = -1.207

            [pipeline]
            workers = 2

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.artifacts.num_features, 29);
        assert_eq!(config.pipeline.workers, 2);
    }
}
