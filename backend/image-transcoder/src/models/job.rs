use serde::{Deserialize, Serialize};
use std::fmt;

/// Raster formats the transcoder accepts and re-emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Jpeg,
    Png,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Exact, case-sensitive match on the key's extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Whether the encoder for this type has a lossy quality axis
    pub fn supports_quality(&self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation's unit of work, immutable once located
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source_bucket: String,
    pub source_key: String,
    pub dest_bucket: String,
    pub image_type: ImageType,
}

impl Job {
    /// Destination key of a variant: `<label>-<source key>`
    pub fn variant_key(&self, label: &str) -> String {
        format!("{}-{}", label, self.source_key)
    }

    /// Job identifier used in the completion notification
    pub fn job_id(&self) -> &str {
        &self.source_key
    }
}
