/// Error types for the image transcoder
///
/// Fatal variants (`Configuration`, `InvalidEvent`, `Download`, `Probe`) abort a
/// job before any variant is attempted. The rest are collected per job and
/// only decide the polarity of the final completion signal.
use thiserror::Error;

/// Result type for transcoder operations
pub type Result<T> = std::result::Result<T, TranscodeError>;

#[derive(Debug, Error)]
pub enum TranscodeError {
    /// Invalid configuration, including a destination bucket equal to the source
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Trigger event matched neither supported shape
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Source object could not be fetched
    #[error("Download failed: {0}")]
    Download(String),

    /// Source dimensions could not be determined
    #[error("Probe failed: {0}")]
    Probe(String),

    /// Resize, encode or upload failed for one variant
    #[error("Transform failed for {label}: {message}")]
    Transform { label: String, message: String },

    /// Completion notification could not be published
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Object store collaborator failure, before it is attributed to a stage
    #[error("Storage error: {0}")]
    Storage(String),

    /// The same variant reported an outcome twice
    #[error("Variant {label} reported more than once")]
    DuplicateReport { label: String },

    /// A variant outside the size table reported an outcome
    #[error("Variant {label} is not in the size table")]
    UnknownVariant { label: String },
}

impl TranscodeError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transform(label: &str, msg: impl Into<String>) -> Self {
        Self::Transform {
            label: label.to_string(),
            message: msg.into(),
        }
    }
}

impl From<s3_utils::S3Error> for TranscodeError {
    fn from(err: s3_utils::S3Error) -> Self {
        TranscodeError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TranscodeError {
    fn from(err: serde_json::Error) -> Self {
        TranscodeError::InvalidEvent(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_converts_to_storage() {
        let err: TranscodeError = s3_utils::S3Error::put("photos", "L-a.jpg", "AccessDenied").into();
        assert!(matches!(err, TranscodeError::Storage(ref msg) if msg.contains("AccessDenied")));
    }

    #[test]
    fn test_transform_display_names_label() {
        let err = TranscodeError::transform("thumbnail", "upload rejected");
        assert_eq!(
            err.to_string(),
            "Transform failed for thumbnail: upload rejected"
        );
    }
}
