//! Object store collaborator
//!
//! The pipeline reads the source object and writes variants through
//! `ObjectStore`; production runs use the S3 adapter below.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use s3_utils::S3Client;

pub use s3_utils::StoredObject;

/// Bucket-addressed binary object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object with its length and content type
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject>;

    /// Write an object, tagging it with `content_type` when known
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<()>;
}

/// `ObjectStore` backed by AWS S3 (or any S3-compatible endpoint)
#[derive(Clone)]
pub struct S3ObjectStore {
    client: S3Client,
}

impl S3ObjectStore {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<StoredObject> {
        Ok(self.client.get_object(bucket, key).await?)
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> Result<()> {
        Ok(self.client.put_object(bucket, key, body, content_type).await?)
    }
}
