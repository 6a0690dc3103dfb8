use crate::error::TranscodeError;
use serde::{Deserialize, Serialize};

/// A named target maximum-dimension preset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeSpec {
    pub label: String,
    pub max_dimension: u32,
    /// Disabled presets stay in the domain model but are never transformed
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl SizeSpec {
    pub fn new(label: impl Into<String>, max_dimension: u32) -> Self {
        Self {
            label: label.into(),
            max_dimension,
            enabled: true,
        }
    }

    pub fn disabled(label: impl Into<String>, max_dimension: u32) -> Self {
        Self {
            enabled: false,
            ..Self::new(label, max_dimension)
        }
    }

    /// Full preset table, largest to smallest. XXL and XL are off by default.
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::disabled("XXL", 1366),
            Self::disabled("XL", 1200),
            Self::new("L", 960),
            Self::new("M", 640),
            Self::new("S", 380),
            Self::new("XS", 260),
            Self::new("thumbnail", 128),
        ]
    }
}

/// Final dimensions of one produced variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantResult {
    /// Serialized as `prefix`, the field existing notification consumers read
    #[serde(rename = "prefix")]
    pub label: String,
    pub width: u32,
    pub height: u32,
}

/// Tagged result of one transformer run
#[derive(Debug)]
pub enum VariantOutcome {
    Produced(VariantResult),
    /// Source already at or below the target size
    Skipped,
    Failed(TranscodeError),
}

/// Aggregated result of all transformer runs of one job
#[derive(Debug, Default)]
pub struct JobOutcome {
    pub job_id: String,
    /// In completion order
    pub produced_variants: Vec<VariantResult>,
    /// Labels of skipped sizes
    pub skipped: Vec<String>,
    pub errors: Vec<TranscodeError>,
}

impl JobOutcome {
    /// Number of size-table entries resolved to produced, skipped or failed
    pub fn resolved(&self) -> usize {
        self.produced_variants.len() + self.skipped.len() + self.errors.len()
    }
}

/// Terminal signal of one invocation, returned exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded(String),
    Failed(String),
    /// Unsupported input; neither success nor failure is reported
    Skipped(String),
}

impl Completion {
    /// Names the source key and the bucket pair it was transcoded between
    pub fn succeeded(source_bucket: &str, source_key: &str, dest_bucket: &str) -> Self {
        Self::Succeeded(format!(
            "Successful completion of imageTranscoding on {} ({} -> {})",
            source_key, source_bucket, dest_bucket
        ))
    }

    pub fn failed(source_key: &str, error_count: usize) -> Self {
        Self::Failed(format!(
            "There were {} error(s) during imageTranscoding on {}",
            error_count, source_key
        ))
    }

    /// A job aborted by a single fatal error. The key is absent only when the
    /// event itself could not be read.
    pub fn fatal(source_key: Option<&str>, err: &TranscodeError) -> Self {
        match source_key {
            Some(key) => Self::Failed(format!(
                "There were 1 error(s) during imageTranscoding on {}: {}",
                key, err
            )),
            None => Self::Failed(format!(
                "There were 1 error(s) during imageTranscoding: {}",
                err
            )),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Succeeded(msg) | Self::Failed(msg) | Self::Skipped(msg) => msg,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
