//! NATS publishers for scoring responses and anomaly alerts

use crate::types::result::{AnomalyAlert, ScoringResult};
use anyhow::Result;
use async_nats::Client;
use serde_json::Value;
use tracing::debug;

/// Publisher for scoring responses and anomaly alerts
#[derive(Clone)]
pub struct ResponsePublisher {
    client: Client,
    result_subject: String,
    alert_subject: String,
}

impl ResponsePublisher {
    /// Create a new response publisher
    pub fn new(client: Client, result_subject: &str, alert_subject: &str) -> Self {
        Self {
            client,
            result_subject: result_subject.to_string(),
            alert_subject: alert_subject.to_string(),
        }
    }

    /// Publish a scoring response.
    ///
    /// Request/reply callers get the response on their reply subject;
    /// fire-and-forget traffic lands on the configured result subject.
    pub async fn publish_result(
        &self,
        reply: Option<String>,
        result: &ScoringResult,
    ) -> Result<()> {
        let payload = serde_json::to_vec(result)?;
        let subject = reply.unwrap_or_else(|| self.result_subject.clone());

        self.client.publish(subject.clone(), payload.into()).await?;

        debug!(
            subject = %subject,
            is_anomaly = ?result.is_anomaly(),
            "Published scoring response"
        );
        Ok(())
    }

    /// Publish a structured per-request failure.
    ///
    /// Scoring errors never crash the pipeline; the caller gets the reason
    /// alongside whatever identifier the request carried.
    pub async fn publish_error(
        &self,
        reply: Option<String>,
        account_id: Option<&Value>,
        reason: &str,
    ) -> Result<()> {
        let mut body = serde_json::Map::new();
        if let Some(id) = account_id {
            body.insert("account_id".to_string(), id.clone());
        }
        body.insert("error".to_string(), Value::from(reason));

        let payload = serde_json::to_vec(&body)?;
        let subject = reply.unwrap_or_else(|| self.result_subject.clone());
        self.client.publish(subject, payload.into()).await?;
        Ok(())
    }

    /// Publish an anomaly alert
    pub async fn publish_alert(&self, alert: &AnomalyAlert) -> Result<()> {
        let payload = serde_json::to_vec(alert)?;

        self.client
            .publish(self.alert_subject.clone(), payload.into())
            .await?;

        debug!(
            alert_id = %alert.alert_id,
            statistic = alert.statistic,
            "Published anomaly alert"
        );
        Ok(())
    }

    /// Get the result subject name
    pub fn result_subject(&self) -> &str {
        &self.result_subject
    }

    /// Get the alert subject name
    pub fn alert_subject(&self) -> &str {
        &self.alert_subject
    }
}
