//! Transcode pipeline
//!
//! This module provides the per-job workflow:
//! - Locator: derives the job (buckets, key, image type) from the trigger event
//! - Quality: adaptive encoder quality from the source's bytes-per-pixel density
//! - Transformer: resize, encode and upload one variant
//! - Aggregator: fan-in of all variant outcomes into one job outcome
//! - Notifier: completion message and terminal signal
//! - Pipeline: wires the stages together

pub mod aggregator;
pub mod locator;
pub mod notifier;
pub mod pipeline;
pub mod quality;
pub mod transformer;

pub use aggregator::Aggregator;
pub use locator::{locate, Located};
pub use notifier::Notifier;
pub use pipeline::TranscodePipeline;
pub use quality::QualityEstimator;
pub use transformer::{target_dimensions, SourceImage, TransformOptions, VariantTransformer};
