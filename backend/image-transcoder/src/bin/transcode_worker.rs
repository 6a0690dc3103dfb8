//! Transcode Worker - runs the image transcoding pipeline for one trigger event
//!
//! The event JSON (S3 notification or `{"container", "name"}`) is read from
//! `TRANSCODE_EVENT_PATH` when set, otherwise from stdin. The terminal signal
//! is printed to stdout; the process exits non-zero only when the job failed.
//!
//! Environment variables:
//! - AWS_REGION: region for S3 and SNS (default: "us-east-1")
//! - AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY: optional static credentials
//! - S3_ENDPOINT: optional S3-compatible endpoint (MinIO)
//! - SNS_ENDPOINT: optional SNS endpoint (LocalStack)
//! - TRANSCODE_TOPIC_ARN: completion topic
//! - TRANSCODE_DEST_BUCKET_DELIMITER: source bucket suffix (default: "-in")
//! - TRANSCODE_ENABLE_LARGE_PRESETS: also produce XXL and XL (default: false)
//! - TRANSCODE_MAX_FILE_SIZE / TRANSCODE_MIN_QUALITY: adaptive quality tuning
//! - LOG_FORMAT: "json" for structured logs

use anyhow::Context;
use image_transcoder::services::{S3ObjectStore, SnsPublisher};
use image_transcoder::{Completion, Config, TranscodePipeline};
use s3_utils::S3Client;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("transcode_worker=info".parse()?)
        .add_directive("image_transcoder=info".parse()?);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

async fn read_payload(path: Option<&str>) -> anyhow::Result<Vec<u8>> {
    let payload = match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read event file {path}"))?,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    Ok(payload)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    info!("Starting Transcode Worker");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        region = %config.s3.region,
        topic = %config.transcode.topic_arn,
        "Configuration loaded"
    );

    let store = Arc::new(S3ObjectStore::new(S3Client::with_config(config.s3.clone()).await));
    let publisher = Arc::new(SnsPublisher::from_config(&config.sns).await);
    let pipeline = TranscodePipeline::new(config.transcode.clone(), store, publisher);

    // Malformed JSON is reported through the completion signal, not as a startup error
    let payload = read_payload(config.worker.event_path.as_deref()).await?;
    let completion = pipeline.run_payload(&payload).await;

    println!("{}", completion.message());
    Ok(match completion {
        Completion::Succeeded(_) | Completion::Skipped(_) => ExitCode::SUCCESS,
        Completion::Failed(_) => ExitCode::FAILURE,
    })
}
