/// Shared S3 utilities for the transcoding services
///
/// Provides a unified AWS S3 client built from `S3Config`, plus the
/// bucket-addressed object operations the pipeline needs.
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::info;

pub mod config;
pub mod error;
pub mod operations;

pub use config::S3Config;
pub use error::{S3Error, S3Result};
pub use operations::StoredObject;

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
}

impl S3Client {
    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // Static credentials override the default chain (env, profile, IMDS)
        if let Some((access_key_id, secret_access_key)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "s3_utils_static",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        info!(
            region = %config.region,
            endpoint = ?config.endpoint,
            path_style = config.path_style,
            "S3 client initialized"
        );

        Self {
            client: Arc::new(Client::from_conf(s3_config)),
        }
    }

    /// Get reference to underlying AWS S3 client
    pub fn client(&self) -> &Client {
        &self.client
    }
}
