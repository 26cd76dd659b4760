//! Reconstruction-error scoring against a fixed decision threshold.

use ndarray::Array1;

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Natural log of the L2 reconstruction distance. `None` when the
    /// reconstruction matches the input exactly (the log is undefined there).
    pub statistic: Option<f64>,
    /// Whether the statistic exceeded the decision threshold.
    pub is_anomaly: bool,
}

/// Compares the log reconstruction distance to a fixed split point.
///
/// The split point is set at deployment time and never changes while the
/// process is running.
#[derive(Debug, Clone, Copy)]
pub struct AnomalyScorer {
    split_point: f64,
}

impl AnomalyScorer {
    /// Create a scorer with the deployed decision threshold.
    pub fn new(split_point: f64) -> Self {
        Self { split_point }
    }

    /// The configured decision threshold.
    pub fn split_point(&self) -> f64 {
        self.split_point
    }

    /// Score a vector against its reconstruction.
    ///
    /// The statistic is `ln(sqrt(sum((x - r)^2)))`. The decision uses strict
    /// inequality, so a statistic equal to the split point is normal. A
    /// perfect reconstruction has zero distance and is normal by definition;
    /// the log is never evaluated in that case.
    pub fn score(&self, x: &Array1<f64>, reconstructed: &Array1<f64>) -> Score {
        let distance = (x - reconstructed).mapv(|d| d * d).sum().sqrt();

        if distance == 0.0 {
            return Score {
                statistic: None,
                is_anomaly: false,
            };
        }

        let statistic = distance.ln();
        Score {
            statistic: Some(statistic),
            is_anomaly: statistic > self.split_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_is_log_l2_distance() {
        let scorer = AnomalyScorer::new(0.0);
        let x = Array1::from(vec![3.0, 0.0]);
        let r = Array1::from(vec![0.0, 4.0]);

        let score = scorer.score(&x, &r);
        // distance = sqrt(9 + 16) = 5
        assert!((score.statistic.unwrap() - 5.0_f64.ln()).abs() < 1e-12);
        assert!(score.is_anomaly); // ln(5) > 0
    }

    #[test]
    fn test_perfect_reconstruction_is_normal() {
        let scorer = AnomalyScorer::new(-1.207);
        let x = Array1::from(vec![0.3, -0.8, 0.1]);

        let score = scorer.score(&x, &x.clone());
        assert_eq!(score.statistic, None);
        assert!(!score.is_anomaly);
    }

    #[test]
    fn test_statistic_equal_to_split_point_is_normal() {
        // distance 1 gives statistic ln(1) = 0 exactly
        let scorer = AnomalyScorer::new(0.0);
        let x = Array1::from(vec![1.0, 0.0]);
        let r = Array1::from(vec![0.0, 0.0]);

        let score = scorer.score(&x, &r);
        assert_eq!(score.statistic, Some(0.0));
        assert!(!score.is_anomaly);
    }

    #[test]
    fn test_statistic_below_split_point_is_normal() {
        let scorer = AnomalyScorer::new(-1.207);
        let x = Array1::from(vec![0.1, 0.0]);
        let r = Array1::from(vec![0.0, 0.0]);

        // statistic = ln(0.1) ~ -2.303
        let score = scorer.score(&x, &r);
        assert!(!score.is_anomaly);
    }

    #[test]
    fn test_statistic_above_split_point_is_anomalous() {
        let scorer = AnomalyScorer::new(-1.207);
        let x = Array1::from(vec![1.0, 1.0]);
        let r = Array1::from(vec![0.0, 0.0]);

        // statistic = ln(sqrt(2)) ~ 0.347
        let score = scorer.score(&x, &r);
        assert!(score.is_anomaly);
    }
}
