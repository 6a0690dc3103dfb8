//! Error types for S3 object operations

use thiserror::Error;

/// Result type for S3 operations
pub type S3Result<T> = std::result::Result<T, S3Error>;

/// Errors returned by `S3Client` object operations
#[derive(Debug, Error)]
pub enum S3Error {
    /// GetObject failed (missing object, access denied, transport)
    #[error("Failed to get s3://{bucket}/{key}: {message}")]
    Get {
        bucket: String,
        key: String,
        message: String,
    },

    /// The object body stream could not be read to completion
    #[error("Failed to read body of s3://{bucket}/{key}: {message}")]
    Body {
        bucket: String,
        key: String,
        message: String,
    },

    /// PutObject failed
    #[error("Failed to put s3://{bucket}/{key}: {message}")]
    Put {
        bucket: String,
        key: String,
        message: String,
    },
}

impl S3Error {
    pub fn get(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        Self::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn body(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        Self::Body {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub fn put(bucket: &str, key: &str, message: impl Into<String>) -> Self {
        Self::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.into(),
        }
    }
}
