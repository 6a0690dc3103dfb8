//! Source locator - derives the job from the trigger event

use crate::error::{Result, TranscodeError};
use crate::models::{ImageType, Job, TriggerEvent};
use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

/// Outcome of locating a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    Job(Job),
    /// Key is not a supported image; the invocation is a no-op
    Skipped { key: String, reason: String },
}

/// Derive source/destination locations and image type from `event`.
///
/// Destination equal to source is a `Configuration` error and is checked
/// before the image type, so a broken bucket convention is always reported.
pub fn locate(event: &TriggerEvent, delimiter: &str) -> Result<Located> {
    let (source_bucket, source_key) = source_location(event)?;
    resolve(source_bucket, source_key, delimiter)
}

/// Derive the job for an already extracted bucket and decoded key
pub fn resolve(source_bucket: String, source_key: String, delimiter: &str) -> Result<Located> {
    let dest_bucket = derive_dest_bucket(&source_bucket, delimiter);
    if dest_bucket == source_bucket {
        return Err(TranscodeError::configuration(format!(
            "the source and destination buckets must be different (src = {source_bucket}, dest = {dest_bucket})"
        )));
    }

    let extension = match source_key.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => {
            warn!(key = %source_key, "Unable to infer image type, skipping");
            return Ok(Located::Skipped {
                reason: format!("unable to infer image type for key {source_key}"),
                key: source_key,
            });
        }
    };

    let image_type = match ImageType::from_extension(extension) {
        Some(t) => t,
        None => {
            warn!(key = %source_key, extension = %extension, "Skipping non-image");
            return Ok(Located::Skipped {
                reason: format!("skipping non-image {source_key}"),
                key: source_key,
            });
        }
    };

    debug!(
        source_bucket = %source_bucket,
        source_key = %source_key,
        dest_bucket = %dest_bucket,
        image_type = %image_type,
        "Job located"
    );

    Ok(Located::Job(Job {
        source_bucket,
        source_key,
        dest_bucket,
        image_type,
    }))
}

/// Bucket and decoded key from the first storage record, else the direct shape
pub fn source_location(event: &TriggerEvent) -> Result<(String, String)> {
    if let Some(record) = event.records.first() {
        let key = decode_storage_key(&record.s3.object.key)?;
        return Ok((record.s3.bucket.name.clone(), key));
    }

    match (&event.container, &event.name) {
        (Some(container), Some(name)) => Ok((container.clone(), name.clone())),
        _ => Err(TranscodeError::InvalidEvent(
            "event has neither storage records nor container/name".to_string(),
        )),
    }
}

/// Storage notifications encode spaces as `+` and everything else as `%XX`
pub fn decode_storage_key(encoded: &str) -> Result<String> {
    let plus_decoded = encoded.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| TranscodeError::InvalidEvent(format!("object key {encoded:?} is not UTF-8: {e}")))
}

/// Strip the last occurrence of `delimiter` and everything after it.
/// Without an occurrence the name is returned unchanged.
pub fn derive_dest_bucket(source_bucket: &str, delimiter: &str) -> String {
    if delimiter.is_empty() {
        return source_bucket.to_string();
    }
    match source_bucket.rfind(delimiter) {
        Some(idx) => source_bucket[..idx].to_string(),
        None => source_bucket.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(located: Located) -> Job {
        match located {
            Located::Job(job) => job,
            other => panic!("expected job, got {other:?}"),
        }
    }

    #[test]
    fn test_storage_event_key_is_decoded() {
        let event = TriggerEvent::storage("photos-in", "summer+trip%2F%C3%A9t%C3%A9.jpg");
        let job = job(locate(&event, "-in").unwrap());

        assert_eq!(job.source_bucket, "photos-in");
        assert_eq!(job.source_key, "summer trip/été.jpg");
        assert_eq!(job.dest_bucket, "photos");
        assert_eq!(job.image_type, ImageType::Jpeg);
    }

    #[test]
    fn test_literal_plus_survives_as_percent_escape() {
        assert_eq!(decode_storage_key("a%2Bb+c.png").unwrap(), "a+b c.png");
    }

    #[test]
    fn test_invalid_utf8_key_rejected() {
        let err = decode_storage_key("bad%FF.jpg").unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidEvent(_)));
    }

    #[test]
    fn test_direct_invocation_key_is_not_decoded() {
        let event = TriggerEvent::direct("photos-in", "a+b.png");
        let job = job(locate(&event, "-in").unwrap());
        assert_eq!(job.source_key, "a+b.png");
        assert_eq!(job.image_type, ImageType::Png);
    }

    #[test]
    fn test_storage_record_wins_over_direct_fields() {
        let mut event = TriggerEvent::storage("uploads-in", "x.png");
        event.container = Some("other-in".to_string());
        event.name = Some("y.jpg".to_string());

        let job = job(locate(&event, "-in").unwrap());
        assert_eq!(job.source_bucket, "uploads-in");
        assert_eq!(job.source_key, "x.png");
    }

    #[test]
    fn test_empty_event_is_invalid() {
        let err = locate(&TriggerEvent::default(), "-in").unwrap_err();
        assert!(matches!(err, TranscodeError::InvalidEvent(_)));
    }

    #[test]
    fn test_dest_bucket_uses_last_delimiter() {
        assert_eq!(derive_dest_bucket("photos-in", "-in"), "photos");
        assert_eq!(derive_dest_bucket("sign-in-photos-in", "-in"), "sign-in-photos");
        assert_eq!(derive_dest_bucket("photos-in-eu", "-in"), "photos");
        assert_eq!(derive_dest_bucket("photos", "-in"), "photos");
    }

    #[test]
    fn test_same_bucket_is_configuration_error() {
        let event = TriggerEvent::direct("photos", "vacation.jpg");
        let err = locate(&event, "-in").unwrap_err();
        assert!(matches!(err, TranscodeError::Configuration(_)));
    }

    #[test]
    fn test_configuration_checked_before_type() {
        let event = TriggerEvent::direct("photos", "notes.txt");
        assert!(matches!(
            locate(&event, "-in"),
            Err(TranscodeError::Configuration(_))
        ));
    }

    #[test]
    fn test_unsupported_and_missing_extensions_skip() {
        for key in ["notes.txt", "README", "photo.jpeg", "photo.JPG", "archive.jpg.zip"] {
            let event = TriggerEvent::direct("photos-in", key);
            match locate(&event, "-in").unwrap() {
                Located::Skipped { key: skipped, .. } => assert_eq!(skipped, key),
                other => panic!("{key} should be skipped, got {other:?}"),
            }
        }
    }
}
