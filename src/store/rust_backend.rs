//! Pure Rust thumbnail backend.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate, format sniffed from content |
//! | Pre-shrink | `DynamicImage::resize_exact` with `Nearest` |
//! | Center crop | `DynamicImage::crop_imm` |
//! | Final scale | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode | `image::codecs::jpeg::JpegEncoder` |
//!
//! Store keys carry no extension, so the decoder never trusts the file name.

use super::backend::{BackendError, ThumbnailBackend, ThumbnailParams};
use super::calculations::plan_thumbnail;
use crate::types::Dimensions;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode as baseline RGB JPEG regardless of the output name.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), BackendError> {
    let file = File::create(path)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ThumbnailBackend for RustBackend {
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError> {
        let mut img = load_image(&params.source)?;
        let plan = plan_thumbnail(
            Dimensions::new(img.width(), img.height()),
            params.size,
            params.crop,
        );

        if let Some(shrunk) = plan.prescaled {
            img = img.resize_exact(shrunk.width, shrunk.height, FilterType::Nearest);
        }
        if let Some(c) = plan.crop {
            img = img.crop_imm(c.x, c.y, c.width, c.height);
        }
        if (img.width(), img.height()) != (plan.output.width, plan.output.height) {
            img = img.resize_exact(plan.output.width, plan.output.height, FilterType::Lanczos3);
        }

        save_jpeg(&img, &params.output, params.quality)?;
        Ok(plan.output)
    }
}
