//! Notification collaborator
//!
//! Completion messages go to a pre-configured topic through `Publisher`;
//! production runs publish to AWS SNS.

use crate::config::SnsConfig;
use crate::error::{Result, TranscodeError};
use async_trait::async_trait;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client as SnsClient;
use tracing::{error, info};

/// Pub/sub publish primitive
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic: &str, message: &str) -> Result<()>;
}

#[cfg(test)]
mockall::mock! {
    pub Publisher {}

    #[async_trait]
    impl Publisher for Publisher {
        async fn publish(&self, topic: &str, message: &str) -> Result<()>;
    }
}

/// `Publisher` backed by AWS SNS
#[derive(Clone)]
pub struct SnsPublisher {
    client: SnsClient,
}

impl SnsPublisher {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// Build an SNS client from the default credential chain
    pub async fn from_config(config: &SnsConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!(region = %config.region, "AWS SNS client initialized for completion notifications");
        Self::new(SnsClient::new(&sdk_config))
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        match self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .send()
            .await
        {
            Ok(output) => {
                info!(
                    topic = %topic,
                    message_id = ?output.message_id(),
                    "Completion notification published"
                );
                Ok(())
            }
            Err(e) => {
                let detail = DisplayErrorContext(&e).to_string();
                error!(topic = %topic, error = %detail, "Failed to publish completion notification");
                Err(TranscodeError::Publish(detail))
            }
        }
    }
}
