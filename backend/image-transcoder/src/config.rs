/// Configuration management for the image transcoder
///
/// Loads configuration from environment variables with sensible defaults.
/// The pipeline itself only ever sees an explicit `TranscodeConfig`.
use crate::error::{Result, TranscodeError};
use crate::models::SizeSpec;
use s3_utils::S3Config;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub transcode: TranscodeConfig,
    pub s3: S3Config,
    pub sns: SnsConfig,
    pub worker: WorkerConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TranscodeConfig {
    /// Suffix stripped from the source bucket to get the destination bucket
    pub dest_bucket_delimiter: String,
    /// Topic receiving one completion message per job
    pub topic_arn: String,
    /// Full preset table, largest first; only enabled entries are transformed
    pub sizes: Vec<SizeSpec>,
    pub quality: QualityConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QualityConfig {
    /// Output byte budget at the reference resolution
    pub max_file_size: u64,
    pub reference_dimension: u32,
    pub reference_density: f64,
    /// Floor of the adaptive quality range; the ceiling is 100
    pub min_quality: u8,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SnsConfig {
    pub region: String,
    pub endpoint: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WorkerConfig {
    /// Event JSON file; stdin when unset
    pub event_path: Option<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_file_size: 500 * 1024,
            reference_dimension: 960,
            reference_density: 0.75,
            min_quality: 80,
        }
    }
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            dest_bucket_delimiter: "-in".to_string(),
            topic_arn: "arn:aws:sns:us-east-1:352985362696:image-transcoding-finished"
                .to_string(),
            sizes: SizeSpec::default_table(),
            quality: QualityConfig::default(),
        }
    }
}

impl TranscodeConfig {
    /// Enabled presets in table order
    pub fn active_sizes(&self) -> Vec<SizeSpec> {
        self.sizes.iter().filter(|s| s.enabled).cloned().collect()
    }

    /// Load from environment variables, defaulting every unset value
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let enable_large: bool = parse_env("TRANSCODE_ENABLE_LARGE_PRESETS", false)?;

        let mut sizes = defaults.sizes;
        if enable_large {
            sizes.iter_mut().for_each(|s| s.enabled = true);
        }

        let quality = QualityConfig {
            max_file_size: parse_env("TRANSCODE_MAX_FILE_SIZE", defaults.quality.max_file_size)?,
            reference_dimension: parse_env(
                "TRANSCODE_REFERENCE_DIMENSION",
                defaults.quality.reference_dimension,
            )?,
            reference_density: parse_env(
                "TRANSCODE_REFERENCE_DENSITY",
                defaults.quality.reference_density,
            )?,
            min_quality: parse_env("TRANSCODE_MIN_QUALITY", defaults.quality.min_quality)?,
        };
        quality.validate()?;

        Ok(Self {
            dest_bucket_delimiter: std::env::var("TRANSCODE_DEST_BUCKET_DELIMITER")
                .unwrap_or(defaults.dest_bucket_delimiter),
            topic_arn: std::env::var("TRANSCODE_TOPIC_ARN").unwrap_or(defaults.topic_arn),
            sizes,
            quality,
        })
    }
}

impl QualityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_quality > 100 {
            return Err(TranscodeError::configuration(format!(
                "min quality must be at most 100, got {}",
                self.min_quality
            )));
        }
        if self.reference_dimension == 0 || self.reference_density <= 0.0 {
            return Err(TranscodeError::configuration(
                "reference dimension and density must be positive",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let s3 = S3Config::from_env();
        Ok(Config {
            transcode: TranscodeConfig::from_env()?,
            sns: SnsConfig {
                region: s3.region.clone(),
                endpoint: std::env::var("SNS_ENDPOINT").ok(),
            },
            s3,
            worker: WorkerConfig {
                event_path: std::env::var("TRANSCODE_EVENT_PATH").ok(),
            },
        })
    }
}

fn parse_env<T: FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            TranscodeError::configuration(format!("{name}={raw:?} is invalid: {e}"))
        }),
        Err(_) => Ok(default),
    }
}
