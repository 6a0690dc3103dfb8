/// Bucket-addressed object operations used by the transcoding pipeline
use crate::error::{S3Error, S3Result};
use crate::S3Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

/// A downloaded object together with the store metadata the pipeline needs
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_length: u64,
    pub content_type: Option<String>,
}

impl S3Client {
    /// Download an object into memory
    pub async fn get_object(&self, bucket: &str, key: &str) -> S3Result<StoredObject> {
        debug!(bucket = %bucket, key = %key, "Downloading from S3");

        let response = self
            .client()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3Error::get(bucket, key, DisplayErrorContext(&e).to_string()))?;

        let content_length = response.content_length().map(|len| len.max(0) as u64);
        let content_type = response.content_type().map(|s| s.to_string());

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| S3Error::body(bucket, key, e.to_string()))?
            .into_bytes();

        debug!(bucket = %bucket, key = %key, size = body.len(), "Downloaded from S3");

        Ok(StoredObject {
            content_length: content_length.unwrap_or(body.len() as u64),
            content_type,
            body,
        })
    }

    /// Upload an in-memory buffer
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> S3Result<()> {
        let size = body.len();
        debug!(bucket = %bucket, key = %key, size, "Uploading to S3");

        self.client()
            .put_object()
            .bucket(bucket)
            .key(key)
            .set_content_type(content_type.map(|s| s.to_string()))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| S3Error::put(bucket, key, DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}
