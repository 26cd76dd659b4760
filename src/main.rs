//! Anomaly Scoring Pipeline - Main Entry Point
//!
//! Consumes scoring requests from NATS, runs the autoencoder inference
//! pipeline, and publishes responses and anomaly alerts. Supports parallel
//! request processing for high throughput.

use anomaly_scoring_pipeline::{
    config::AppConfig,
    consumer::RequestConsumer,
    handler::ScoringHandler,
    metrics::{MetricsReporter, PipelineMetrics},
    models::loader::ArtifactLoader,
    producer::ResponsePublisher,
    types::request::ScoringRequest,
    types::result::AnomalyAlert,
};
use anyhow::Result;
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("anomaly_scoring_pipeline=info".parse()?),
        )
        .init();

    info!("Starting Anomaly Scoring Pipeline");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        split_point = config.detection.split_point,
        num_features = config.artifacts.num_features,
        "Configuration loaded successfully"
    );

    // Initialize metrics
    let metrics = Arc::new(PipelineMetrics::new());

    // Load artifacts before anything subscribes: a shape mismatch or
    // unreadable file aborts startup here, so no request is ever served
    // against a partially loaded model.
    let loader = ArtifactLoader::new(config.artifacts.num_features);
    let engine = loader.load_engine(
        &config.artifacts.scaler_path,
        &config.artifacts.weights_path,
        config.detection.split_point,
    )?;
    let handler = Arc::new(ScoringHandler::new(engine));
    info!(
        num_features = handler.engine().num_features(),
        "Scoring handler initialized"
    );

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    // Initialize consumer and publisher
    let consumer = RequestConsumer::new(
        client.clone(),
        &config.nats.request_subject,
        config.nats.queue_group.clone(),
    );
    let publisher = Arc::new(ResponsePublisher::new(
        client.clone(),
        &config.nats.result_subject,
        &config.nats.alert_subject,
    ));

    // Parallel processing configuration
    let num_workers = config.pipeline.workers;
    info!(
        workers = num_workers,
        request_subject = %config.nats.request_subject,
        result_subject = %config.nats.result_subject,
        alert_subject = %config.nats.alert_subject,
        "Starting request processing loop"
    );

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));
    let processed_count = Arc::new(AtomicU64::new(0));

    let split_point = config.detection.split_point;

    // Start metrics reporter (logs summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Process requests in parallel
    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        // Acquire permit (limits concurrent tasks)
        let permit = semaphore.clone().acquire_owned().await?;

        // Clone shared resources for the spawned task
        let handler = handler.clone();
        let publisher = publisher.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        // Spawn task to process this request
        tokio::spawn(async move {
            let start_time = Instant::now();
            let reply = message.reply.as_ref().map(|r| r.to_string());

            match serde_json::from_slice::<ScoringRequest>(&message.payload) {
                Ok(request) => match handler.handle(&request) {
                    Ok(outcome) => {
                        let processing_time = start_time.elapsed();
                        metrics.record_request(processing_time, &outcome.score);

                        if let Err(e) = publisher.publish_result(reply, &outcome.result).await {
                            error!(
                                account_id = %outcome.account_id,
                                error = %e,
                                "Failed to publish scoring response"
                            );
                        }

                        if let (true, Some(statistic)) =
                            (outcome.score.is_anomaly, outcome.score.statistic)
                        {
                            let alert = AnomalyAlert::new(
                                outcome.account_id.clone(),
                                statistic,
                                split_point,
                            );
                            if let Err(e) = publisher.publish_alert(&alert).await {
                                error!(
                                    account_id = %outcome.account_id,
                                    error = %e,
                                    "Failed to publish anomaly alert"
                                );
                            } else {
                                info!(
                                    account_id = %outcome.account_id,
                                    statistic = statistic,
                                    processing_time_us = processing_time.as_micros(),
                                    "Anomaly alert published"
                                );
                            }
                        } else {
                            debug!(
                                account_id = %outcome.account_id,
                                statistic = ?outcome.score.statistic,
                                processing_time_us = processing_time.as_micros(),
                                "Request scored (below split point)"
                            );
                        }

                        let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                        // Log progress every 100 requests
                        if count % 100 == 0 {
                            let throughput = metrics.get_throughput();
                            let processing_stats = metrics.get_processing_stats();
                            info!(
                                processed = count,
                                throughput = format!("{:.1} req/s", throughput),
                                avg_latency_us = processing_stats.mean_us,
                                "Processing milestone"
                            );
                        }
                    }
                    Err(e) => {
                        // Per-request failure: report to the caller, keep serving
                        metrics.record_rejection();
                        warn!(error = %e, "Scoring request rejected");
                        if let Err(publish_err) = publisher
                            .publish_error(reply, request.account_id(), &e.to_string())
                            .await
                        {
                            error!(error = %publish_err, "Failed to publish error response");
                        }
                    }
                },
                Err(e) => {
                    metrics.record_rejection();
                    warn!(error = %e, "Failed to deserialize scoring request");
                }
            }

            // Release permit when done
            drop(permit);
        });
    }

    // Print final summary
    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
