//! Trigger event shapes
//!
//! A job is started either by a storage-change notification
//! (`{"Records": [{"s3": {"bucket": {"name"}, "object": {"key"}}}]}`) or by a
//! direct invocation (`{"container", "name"}`) used for testing and backfills.
//! Unknown fields are ignored so full S3 notifications deserialize as-is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageEventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    /// URL-encoded key, spaces as `+`
    pub key: String,
}

impl TriggerEvent {
    /// Storage-change event for a single object. `encoded_key` must already be
    /// in notification encoding.
    pub fn storage(bucket: impl Into<String>, encoded_key: impl Into<String>) -> Self {
        Self {
            records: vec![StorageEventRecord {
                s3: S3Entity {
                    bucket: S3Bucket {
                        name: bucket.into(),
                    },
                    object: S3Object {
                        key: encoded_key.into(),
                    },
                },
            }],
            ..Default::default()
        }
    }

    /// Direct invocation with a plain, undecoded key
    pub fn direct(container: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            container: Some(container.into()),
            name: Some(name.into()),
        }
    }

    pub fn from_slice(payload: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}
