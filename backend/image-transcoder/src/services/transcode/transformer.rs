//! Variant transformer - resizes the shared source to one target size,
//! re-encodes it in the source format and uploads it.
//!
//! CPU-intensive work (decode, resize, encode) runs on the blocking thread
//! pool so sibling uploads keep making progress on the async runtime.

use crate::error::{Result, TranscodeError};
use crate::models::{ImageType, Job, SizeSpec, VariantOutcome, VariantResult};
use crate::services::storage::{ObjectStore, StoredObject};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, GenericImageView, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, error, info};

/// JPEG quality when no override applies, the usual libjpeg tooling default
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// The downloaded and decoded source, shared read-only by every transformer
#[derive(Debug)]
pub struct SourceImage {
    pub content_length: u64,
    pub content_type: Option<String>,
    pub width: u32,
    pub height: u32,
    image: DynamicImage,
}

impl SourceImage {
    /// Decode the payload and probe its dimensions (blocking)
    pub fn decode(object: StoredObject) -> Result<Self> {
        let image = image::load_from_memory(&object.body)
            .map_err(|e| TranscodeError::Probe(format!("Failed to decode image: {e}")))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(TranscodeError::Probe(format!(
                "image has empty dimensions {width}x{height}"
            )));
        }

        Ok(Self {
            content_length: object.content_length,
            content_type: object.content_type,
            width,
            height,
            image,
        })
    }

    /// Decode on the blocking thread pool
    pub async fn decode_async(object: StoredObject) -> Result<Self> {
        tokio::task::spawn_blocking(move || Self::decode(object))
            .await
            .map_err(|e| TranscodeError::Probe(format!("Decode task panicked: {e}")))?
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Per-job encoder settings, identical for every variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// JPEG quality override; `None` keeps `DEFAULT_JPEG_QUALITY`
    pub quality: Option<u8>,
}

/// Even target dimensions for `max_dimension`, or `None` when the source is
/// already at or below it (never upscale).
///
/// Width rounds to the nearest even number, height floors to an even number.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let max = max_dimension as f64;
    let scaling_factor = (max / width as f64).min(max / height as f64);
    if scaling_factor >= 1.0 {
        return None;
    }

    let target_width = 2.0 * (scaling_factor * width as f64 / 2.0).round();
    let target_height = 2.0 * (scaling_factor * height as f64 / 2.0).floor();
    Some((target_width as u32, target_height as u32))
}

/// Resize and encode; the output format always matches the source type
pub fn render(
    image: &DynamicImage,
    width: u32,
    height: u32,
    image_type: ImageType,
    options: TransformOptions,
) -> image::ImageResult<Vec<u8>> {
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);
    let mut buf = Vec::new();

    match image_type {
        ImageType::Jpeg => {
            // JPEG has no alpha channel
            let rgb = resized.to_rgb8();
            let quality = options.quality.unwrap_or(DEFAULT_JPEG_QUALITY);
            JpegEncoder::new_with_quality(&mut buf, quality).encode(
                rgb.as_raw(),
                width,
                height,
                ColorType::Rgb8,
            )?;
        }
        // Lossless: quality does not apply
        ImageType::Png => {
            resized.write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
        }
    }

    Ok(buf)
}

/// Produces one variant of a job per `run` call
pub struct VariantTransformer {
    store: Arc<dyn ObjectStore>,
    job: Arc<Job>,
    source: Arc<SourceImage>,
    options: TransformOptions,
}

impl VariantTransformer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        job: Arc<Job>,
        source: Arc<SourceImage>,
        options: TransformOptions,
    ) -> Self {
        Self {
            store,
            job,
            source,
            options,
        }
    }

    /// Produce, skip or fail one size. Never panics on bad input and never
    /// retries.
    pub async fn run(&self, spec: &SizeSpec) -> VariantOutcome {
        match self.transform(spec).await {
            Ok(Some(result)) => VariantOutcome::Produced(result),
            Ok(None) => VariantOutcome::Skipped,
            Err(e) => {
                error!(
                    label = %spec.label,
                    source_key = %self.job.source_key,
                    error = %e,
                    "Variant transform failed"
                );
                VariantOutcome::Failed(e)
            }
        }
    }

    async fn transform(&self, spec: &SizeSpec) -> Result<Option<VariantResult>> {
        let (width, height) = match target_dimensions(
            self.source.width,
            self.source.height,
            spec.max_dimension,
        ) {
            Some(dims) => dims,
            None => {
                debug!(
                    label = %spec.label,
                    max_dimension = spec.max_dimension,
                    "Skipping because resolution of input image is below target"
                );
                return Ok(None);
            }
        };

        if width == 0 || height == 0 {
            return Err(TranscodeError::transform(
                &spec.label,
                format!("target dimensions {width}x{height} are empty"),
            ));
        }

        let source = Arc::clone(&self.source);
        let image_type = self.job.image_type;
        let options = self.options;
        let encoded = tokio::task::spawn_blocking(move || {
            render(source.image(), width, height, image_type, options)
        })
        .await
        .map_err(|e| TranscodeError::transform(&spec.label, format!("Encode task panicked: {e}")))?
        .map_err(|e| TranscodeError::transform(&spec.label, format!("Failed to encode: {e}")))?;

        let dest_key = self.job.variant_key(&spec.label);
        let size = encoded.len();
        self.store
            .put(
                &self.job.dest_bucket,
                &dest_key,
                Bytes::from(encoded),
                self.source.content_type.as_deref(),
            )
            .await
            .map_err(|e| TranscodeError::transform(&spec.label, e.to_string()))?;

        info!(
            dest_bucket = %self.job.dest_bucket,
            dest_key = %dest_key,
            width,
            height,
            size,
            "Variant uploaded"
        );

        Ok(Some(VariantResult {
            label: spec.label.clone(),
            width,
            height,
        }))
    }
}
