/// Business logic layer for the image transcoder
///
/// - storage: object store collaborator and its S3 adapter
/// - publisher: notification collaborator and its SNS adapter
/// - transcode: the locate → probe → fan-out → fan-in → notify pipeline
pub mod publisher;
pub mod storage;
pub mod transcode;

pub use publisher::{Publisher, SnsPublisher};
pub use storage::{ObjectStore, S3ObjectStore, StoredObject};
