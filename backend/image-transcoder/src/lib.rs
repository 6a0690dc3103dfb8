//! Image Transcoder
//!
//! Event-triggered image transcoding: one source image in, a fixed table of
//! downscaled variants out, one completion notification per job.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Public re-exports
pub use config::{Config, QualityConfig, TranscodeConfig};
pub use error::{Result, TranscodeError};
pub use models::{Completion, TriggerEvent};
pub use services::transcode::TranscodePipeline;
