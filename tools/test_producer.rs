//! Test Scoring Request Producer
//!
//! Generates and publishes synthetic scoring requests to NATS for pipeline
//! testing. Typical requests stay in the scaler's operating range; outliers
//! land far outside it.

use anomaly_scoring_pipeline::feature_extractor::FEATURE_FIELDS;
use rand::Rng;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a request in the normal operating range of the scaler
    fn generate_typical(&mut self) -> Map<String, Value> {
        self.request(0, |rng| rng.gen_range(-1.5..1.5))
    }

    /// Generate a request far outside the training distribution
    fn generate_outlier(&mut self) -> Map<String, Value> {
        self.request(1, |rng| {
            let spike = rng.gen_range(4.0..12.0);
            if rng.gen_bool(0.5) {
                spike
            } else {
                -spike
            }
        })
    }

    fn request<F>(&mut self, class: u8, mut sample: F) -> Map<String, Value>
    where
        F: FnMut(&mut rand::rngs::ThreadRng) -> f64,
    {
        self.request_counter += 1;

        let mut fields = Map::new();
        fields.insert(
            "account_id".to_string(),
            Value::from(self.rng.gen_range(1..=5_i64)),
        );
        for &name in FEATURE_FIELDS.iter() {
            // numeric strings, the way the upstream ingestion emits them
            let value = sample(&mut self.rng);
            fields.insert(name.to_string(), Value::from(format!("{value:.15}")));
        }
        fields.insert("CLASS".to_string(), Value::from(class.to_string()));
        fields
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Scoring Request Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("scoring.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let outlier_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        outlier_rate = outlier_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, outlier_rate, delay_ms).await;
        }
    };

    // Generate and publish requests
    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} requests...", count);

    let mut typical_count = 0;
    let mut outlier_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(outlier_rate) {
            outlier_count += 1;
            generator.generate_outlier()
        } else {
            typical_count += 1;
            generator.generate_typical()
        };

        let payload = serde_json::to_vec(&request)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} requests ({} typical, {} outlier)",
                i + 1,
                count,
                typical_count,
                outlier_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} requests ({} typical, {} outlier)",
        count, typical_count, outlier_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, outlier_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(outlier_rate) {
            generator.generate_outlier()
        } else {
            generator.generate_typical()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
