//! NATS message consumer for incoming scoring requests

use anyhow::Result;
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for receiving scoring requests from NATS
pub struct RequestConsumer {
    client: Client,
    subject: String,
    queue_group: Option<String>,
}

impl RequestConsumer {
    /// Create a new request consumer
    pub fn new(client: Client, subject: &str, queue_group: Option<String>) -> Self {
        Self {
            client,
            subject: subject.to_string(),
            queue_group,
        }
    }

    /// Subscribe to the request subject.
    ///
    /// When a queue group is configured, replicas in the same group split
    /// the request stream between them.
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = match &self.queue_group {
            Some(group) => {
                self.client
                    .queue_subscribe(self.subject.clone(), group.clone())
                    .await?
            }
            None => self.client.subscribe(self.subject.clone()).await?,
        };

        info!(
            subject = %self.subject,
            queue_group = ?self.queue_group,
            "Subscribed to scoring request subject"
        );
        Ok(subscriber)
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
