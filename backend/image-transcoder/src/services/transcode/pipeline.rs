//! Transcode pipeline - coordinates one job end to end
//!
//! 1. Locate the job from the trigger event
//! 2. Download the source once and probe its dimensions
//! 3. Estimate the job-wide encoder quality
//! 4. Fan out one transformer task per active size
//! 5. Fan in every outcome, then notify and return the terminal signal

use super::aggregator::Aggregator;
use super::locator::{resolve, source_location, Located};
use super::notifier::Notifier;
use super::quality::QualityEstimator;
use super::transformer::{SourceImage, TransformOptions, VariantTransformer};
use crate::config::TranscodeConfig;
use crate::error::{Result, TranscodeError};
use crate::models::{Completion, Job, JobOutcome, SizeSpec, TriggerEvent, VariantOutcome};
use crate::services::publisher::Publisher;
use crate::services::storage::ObjectStore;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct TranscodePipeline {
    config: TranscodeConfig,
    sizes: Arc<[SizeSpec]>,
    estimator: QualityEstimator,
    store: Arc<dyn ObjectStore>,
    notifier: Notifier,
}

impl TranscodePipeline {
    pub fn new(
        config: TranscodeConfig,
        store: Arc<dyn ObjectStore>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let sizes: Arc<[SizeSpec]> = config.active_sizes().into();
        let estimator = QualityEstimator::new(&config.quality);
        let notifier = Notifier::new(publisher, config.topic_arn.clone());

        info!(
            sizes = sizes.len(),
            topic = %config.topic_arn,
            "Transcode pipeline initialized"
        );

        Self {
            config,
            sizes,
            estimator,
            store,
            notifier,
        }
    }

    /// Active size table, largest first
    pub fn sizes(&self) -> &[SizeSpec] {
        &self.sizes
    }

    /// Run one invocation from a raw event payload. An unreadable payload
    /// fails like any other fatal error instead of escaping to the caller.
    pub async fn run_payload(&self, payload: &[u8]) -> Completion {
        match TriggerEvent::from_slice(payload) {
            Ok(event) => self.run(&event).await,
            Err(e) => {
                error!(error = %e, "Unable to parse trigger event");
                Completion::fatal(None, &e)
            }
        }
    }

    /// Run one invocation. Returns the single terminal signal.
    pub async fn run(&self, event: &TriggerEvent) -> Completion {
        debug!(event = ?event, "Reading options from event");

        let (source_bucket, source_key) = match source_location(event) {
            Ok(location) => location,
            Err(e) => {
                error!(error = %e, "Unable to read source location from event");
                return Completion::fatal(None, &e);
            }
        };

        let job = match resolve(
            source_bucket,
            source_key.clone(),
            &self.config.dest_bucket_delimiter,
        ) {
            Ok(Located::Job(job)) => job,
            Ok(Located::Skipped { key, reason }) => {
                info!(key = %key, "Skipping unsupported object");
                return Completion::Skipped(reason);
            }
            Err(e) => {
                error!(source_key = %source_key, error = %e, "Unable to locate job");
                return Completion::fatal(Some(&source_key), &e);
            }
        };

        match self.process(&job).await {
            Ok(outcome) => self.notifier.notify(&job, outcome).await,
            Err(e) => {
                // Fatal: no variants were attempted, so nothing is published
                error!(
                    source_bucket = %job.source_bucket,
                    source_key = %job.source_key,
                    error = %e,
                    "Transcoding aborted"
                );
                Completion::fatal(Some(&job.source_key), &e)
            }
        }
    }

    /// Download, probe and fan out. `Err` only for fatal errors.
    async fn process(&self, job: &Job) -> Result<JobOutcome> {
        let object = self
            .store
            .get(&job.source_bucket, &job.source_key)
            .await
            .map_err(|e| TranscodeError::Download(e.to_string()))?;

        let source = SourceImage::decode_async(object).await?;
        debug!(
            width = source.width,
            height = source.height,
            content_length = source.content_length,
            "Source image probed"
        );

        let quality = self
            .estimator
            .estimate(source.content_length, source.width, source.height);
        match quality {
            Some(quality) if job.image_type.supports_quality() => {
                info!(quality, source_key = %job.source_key, "Quality override applied");
            }
            Some(_) => debug!(image_type = %job.image_type, "Quality override ignored by encoder"),
            None => {}
        }

        Ok(self
            .fan_out(Arc::new(job.clone()), Arc::new(source), TransformOptions { quality })
            .await)
    }

    /// Spawn one task per size and wait for all of them. A failed or
    /// panicked task never cancels its siblings.
    async fn fan_out(
        &self,
        job: Arc<Job>,
        source: Arc<SourceImage>,
        options: TransformOptions,
    ) -> JobOutcome {
        let transformer = Arc::new(VariantTransformer::new(
            Arc::clone(&self.store),
            Arc::clone(&job),
            source,
            options,
        ));

        let mut pending: FuturesUnordered<_> = self
            .sizes
            .iter()
            .cloned()
            .map(|spec| {
                let transformer = Arc::clone(&transformer);
                let label = spec.label.clone();
                let handle = tokio::spawn(async move { transformer.run(&spec).await });
                async move { (label, handle.await) }
            })
            .collect();

        let mut aggregator = Aggregator::new(job.job_id(), &self.sizes);
        while let Some((label, joined)) = pending.next().await {
            let outcome = joined.unwrap_or_else(|e| {
                error!(label = %label, error = %e, "Transform task panicked");
                VariantOutcome::Failed(TranscodeError::transform(
                    &label,
                    format!("task panicked: {e}"),
                ))
            });
            if let Err(defect) = aggregator.record(&label, outcome) {
                aggregator.surface(defect);
            }
        }

        let outcome = aggregator.finish();
        if !outcome.errors.is_empty() {
            warn!(
                source_key = %job.source_key,
                produced = outcome.produced_variants.len(),
                skipped = outcome.skipped.len(),
                errors = outcome.errors.len(),
                "Variants completed with errors"
            );
        }
        outcome
    }
}
