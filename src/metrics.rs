//! Performance metrics and statistics tracking for the scoring pipeline.

use crate::models::scorer::Score;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Lower edge of the statistic histogram.
const BUCKET_MIN: f64 = -5.0;
/// Upper edge of the statistic histogram.
const BUCKET_MAX: f64 = 5.0;
const BUCKET_COUNT: usize = 10;

/// Metrics collector for pipeline performance
pub struct PipelineMetrics {
    /// Total requests scored
    pub requests_scored: AtomicU64,
    /// Requests flagged anomalous
    pub anomalies_flagged: AtomicU64,
    /// Requests rejected before scoring (malformed or incomplete)
    pub requests_rejected: AtomicU64,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Statistic distribution buckets over [-5, 5)
    statistic_buckets: RwLock<[u64; BUCKET_COUNT]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl PipelineMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            requests_scored: AtomicU64::new(0),
            anomalies_flagged: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            statistic_buckets: RwLock::new([0; BUCKET_COUNT]),
            start_time: Instant::now(),
        }
    }

    /// Record a scored request
    pub fn record_request(&self, processing_time: Duration, score: &Score) {
        self.requests_scored.fetch_add(1, Ordering::Relaxed);
        if score.is_anomaly {
            self.anomalies_flagged.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000 for memory efficiency
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }

        if let Some(statistic) = score.statistic {
            let span = (BUCKET_MAX - BUCKET_MIN) / BUCKET_COUNT as f64;
            let bucket = ((statistic - BUCKET_MIN) / span)
                .clamp(0.0, (BUCKET_COUNT - 1) as f64) as usize;
            if let Ok(mut buckets) = self.statistic_buckets.write() {
                buckets[bucket] += 1;
            }
        }
    }

    /// Record a request rejected before scoring
    pub fn record_rejection(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let times = match self.processing_times.read() {
            Ok(times) => times,
            Err(_) => return ProcessingStats::default(),
        };
        if times.is_empty() {
            return ProcessingStats::default();
        }

        let mut sorted: Vec<u64> = times.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Get current throughput (requests per second)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_scored.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Get statistic distribution
    pub fn get_statistic_distribution(&self) -> [u64; BUCKET_COUNT] {
        self.statistic_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or([0; BUCKET_COUNT])
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let scored = self.requests_scored.load(Ordering::Relaxed);
        let flagged = self.anomalies_flagged.load(Ordering::Relaxed);
        let rejected = self.requests_rejected.load(Ordering::Relaxed);
        let flag_rate = if scored > 0 {
            (flagged as f64 / scored as f64) * 100.0
        } else {
            0.0
        };

        let processing = self.get_processing_stats();

        info!(
            requests_scored = scored,
            anomalies_flagged = flagged,
            requests_rejected = rejected,
            flag_rate_pct = format!("{:.1}", flag_rate),
            throughput = format!("{:.1} req/s", self.get_throughput()),
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            p99_us = processing.p99_us,
            "Pipeline metrics summary"
        );

        let distribution = self.get_statistic_distribution();
        let total: u64 = distribution.iter().sum();
        if total > 0 {
            let span = (BUCKET_MAX - BUCKET_MIN) / BUCKET_COUNT as f64;
            for (i, &count) in distribution.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let low = BUCKET_MIN + span * i as f64;
                info!(
                    bucket = format!("[{:.1}, {:.1})", low, low + span),
                    count = count,
                    pct = format!("{:.1}", (count as f64 / total as f64) * 100.0),
                    "Statistic distribution"
                );
            }
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Real-time metrics reporter that logs periodic summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<PipelineMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<PipelineMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anomalous(statistic: f64) -> Score {
        Score {
            statistic: Some(statistic),
            is_anomaly: true,
        }
    }

    fn normal(statistic: Option<f64>) -> Score {
        Score {
            statistic,
            is_anomaly: false,
        }
    }

    #[test]
    fn test_metrics_recording() {
        let metrics = PipelineMetrics::new();

        metrics.record_request(Duration::from_micros(100), &normal(Some(-2.5)));
        metrics.record_request(Duration::from_micros(200), &anomalous(0.4));
        metrics.record_rejection();

        assert_eq!(metrics.requests_scored.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.anomalies_flagged.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_rejected.load(Ordering::Relaxed), 1);

        let stats = metrics.get_processing_stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_us, 150);
    }

    #[test]
    fn test_statistic_buckets() {
        let metrics = PipelineMetrics::new();

        metrics.record_request(Duration::from_micros(10), &normal(Some(-4.9)));
        metrics.record_request(Duration::from_micros(10), &normal(Some(0.1)));
        metrics.record_request(Duration::from_micros(10), &anomalous(100.0)); // clamped to top

        let distribution = metrics.get_statistic_distribution();
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[5], 1);
        assert_eq!(distribution[9], 1);
    }

    #[test]
    fn test_zero_distance_scores_skip_histogram() {
        let metrics = PipelineMetrics::new();
        metrics.record_request(Duration::from_micros(10), &normal(None));

        let distribution = metrics.get_statistic_distribution();
        assert!(distribution.iter().all(|&c| c == 0));
        assert_eq!(metrics.requests_scored.load(Ordering::Relaxed), 1);
    }
}
