//! Completion notifier
//!
//! Publishes exactly one message per job, even when every variant failed,
//! then turns the job outcome into the terminal signal.

use crate::error::TranscodeError;
use crate::models::{Completion, Job, JobOutcome, VariantResult};
use crate::services::publisher::Publisher;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Message body: `{"jobId": <source key>, "sources": [<produced variants>]}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMessage<'a> {
    pub job_id: &'a str,
    pub sources: &'a [VariantResult],
}

pub struct Notifier {
    publisher: Arc<dyn Publisher>,
    topic: String,
}

impl Notifier {
    pub fn new(publisher: Arc<dyn Publisher>, topic: impl Into<String>) -> Self {
        Self {
            publisher,
            topic: topic.into(),
        }
    }

    /// Publish the summary and produce the terminal signal. A publish failure
    /// counts as one more error but never suppresses the signal.
    pub async fn notify(&self, job: &Job, mut outcome: JobOutcome) -> Completion {
        if let Err(e) = self.publish(&outcome).await {
            outcome.errors.push(e);
        }

        if outcome.errors.is_empty() {
            info!(
                source = %format!("{}/{}", job.source_bucket, job.source_key),
                dest_bucket = %job.dest_bucket,
                produced = outcome.produced_variants.len(),
                skipped = outcome.skipped.len(),
                "Successfully resized and uploaded"
            );
            return Completion::succeeded(&job.source_bucket, &job.source_key, &job.dest_bucket);
        }

        for err in &outcome.errors {
            error!(job_id = %outcome.job_id, error = %err, "Transcoding error");
        }
        error!(
            source = %format!("{}/{}", job.source_bucket, job.source_key),
            dest_bucket = %job.dest_bucket,
            error_count = outcome.errors.len(),
            "Unable to resize and upload"
        );
        Completion::failed(&job.source_key, outcome.errors.len())
    }

    async fn publish(&self, outcome: &JobOutcome) -> Result<(), TranscodeError> {
        let message = serde_json::to_string(&CompletionMessage {
            job_id: &outcome.job_id,
            sources: &outcome.produced_variants,
        })
        .map_err(|e| TranscodeError::Publish(format!("Failed to serialize message: {e}")))?;

        self.publisher
            .publish(&self.topic, &message)
            .await
            .map_err(|e| match e {
                TranscodeError::Publish(_) => e,
                other => TranscodeError::Publish(other.to_string()),
            })
    }
}
