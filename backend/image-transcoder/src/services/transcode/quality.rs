//! Adaptive encoder quality
//!
//! Sources denser than the reference bytes-per-pixel ceiling get a quality
//! override scaled into `[min_quality, 100]`; everything else keeps the
//! encoder default. One value per job, shared by every variant.

use crate::config::QualityConfig;

#[derive(Debug, Clone, Copy)]
pub struct QualityEstimator {
    ceiling_density: f64,
    min_quality: u8,
}

impl QualityEstimator {
    pub fn new(config: &QualityConfig) -> Self {
        let reference = config.reference_dimension as f64;
        Self {
            ceiling_density: config.max_file_size as f64
                / (reference * reference * config.reference_density),
            min_quality: config.min_quality.min(100),
        }
    }

    /// Reference bytes-per-pixel ceiling
    pub fn ceiling_density(&self) -> f64 {
        self.ceiling_density
    }

    /// Quality override for a source of `content_length` bytes and
    /// `width` × `height` pixels, or `None` for the encoder default.
    pub fn estimate(&self, content_length: u64, width: u32, height: u32) -> Option<u8> {
        let pixels = width as f64 * height as f64;
        if content_length == 0 || pixels == 0.0 {
            // Zero density would divide by zero; treat as under budget
            return None;
        }

        let observed_density = content_length as f64 / pixels;
        let ratio = self.ceiling_density / observed_density;
        if !ratio.is_finite() || ratio >= 1.0 {
            return None;
        }

        let floor = self.min_quality as f64;
        let quality = (ratio * (100.0 - floor) + floor).floor();
        Some(quality.clamp(floor, 100.0) as u8)
    }
}
