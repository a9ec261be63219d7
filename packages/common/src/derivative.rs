//! Compressed derivative generation for uploaded gallery images.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::Deserialize;
use thiserror::Error;

/// Bounding box and encoding quality of the derivative.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct DerivativeSpec {
    /// Default: 600.
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,
    /// Default: 600.
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
    /// JPEG quality, 1-100. Default: 80.
    #[serde(default = "default_quality")]
    pub quality: u8,
}

fn default_max_dimension() -> u32 {
    600
}
fn default_quality() -> u8 {
    80
}

impl Default for DerivativeSpec {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            quality: default_quality(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("failed to encode derivative: {0}")]
    Encode(#[source] image::ImageError),
    #[error("invalid derivative settings: {0}")]
    InvalidSpec(String),
    #[error("derivative task did not complete: {0}")]
    Aborted(String),
}

/// Produce a JPEG copy of `data` that fits within the spec's bounding box.
///
/// Aspect ratio is preserved and images already inside the box are re-encoded
/// at their original size, never enlarged. CPU-bound; call it from a blocking
/// context.
pub fn generate_derivative(data: &[u8], spec: &DerivativeSpec) -> Result<Vec<u8>, ProcessingError> {
    if spec.max_width == 0 || spec.max_height == 0 {
        return Err(ProcessingError::InvalidSpec(
            "bounding box must be non-empty".into(),
        ));
    }
    if spec.quality == 0 || spec.quality > 100 {
        return Err(ProcessingError::InvalidSpec(format!(
            "quality must be within 1-100, got {}",
            spec.quality
        )));
    }

    let original = image::load_from_memory(data).map_err(ProcessingError::Decode)?;
    let (width, height) = original.dimensions();

    let fitted = if width > spec.max_width || height > spec.max_height {
        original.resize(spec.max_width, spec.max_height, FilterType::Lanczos3)
    } else {
        original
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(fitted.to_rgb8());

    let mut out = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut out, spec.quality);
    rgb.write_with_encoder(encoder)
        .map_err(ProcessingError::Encode)?;

    Ok(out.into_inner())
}
