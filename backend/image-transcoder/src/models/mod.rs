/// Data models for the image transcoder
///
/// This module defines structures for:
/// - Trigger events: storage-change notifications and direct invocations
/// - Job: one invocation's source/destination locations and image type
/// - Variants: the size table, per-variant outcomes and the job outcome
pub mod event;
pub mod job;
pub mod variant;

pub use event::{S3Bucket, S3Entity, S3Object, StorageEventRecord, TriggerEvent};
pub use job::{ImageType, Job};
pub use variant::{Completion, JobOutcome, SizeSpec, VariantOutcome, VariantResult};
