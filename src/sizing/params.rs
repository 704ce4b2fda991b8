//! Parameter types for resolution selection.
//!
//! These structs describe *what* an attachment asks for, not how the target is
//! computed. They are validated once on construction so the
//! [`calculations`](super::calculations) can stay infallible.
//!
//! ## Types
//!
//! - [`Grid`]: bucket width and viewport step of the resolution grid (320 / 300).
//! - [`ResizeConfig`]: aspect ratio and width real estate of one attachment.
//! - [`BucketRange`]: widest viewport and densest display to pre-render for.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("aspect_ratio must be a finite number > 0, got {0}")]
    AspectRatio(f64),
    #[error("width_real_estate must be a finite number > 0, got {0}")]
    WidthRealEstate(f64),
    #[error("grid.{0} must be > 0")]
    Grid(&'static str),
    #[error("max viewport width must be a number in (0, {max}], got {0}", max = MAX_VIEWPORT_WIDTH)]
    MaxViewportWidth(f64),
    #[error("max pixel ratio must be a number in [1, {max}], got {0}", max = MAX_PIXEL_RATIO)]
    MaxPixelRatio(f64),
    #[error("layout needs {0} renditions, more than the {max} allowed", max = MAX_BUCKETS)]
    TooManyBuckets(u32),
}

/// Widest logical viewport a bucket range may cover.
pub const MAX_VIEWPORT_WIDTH: f64 = 16_384.0;
/// Densest display a bucket range may cover.
pub const MAX_PIXEL_RATIO: f64 = 8.0;
/// Upper bound on the renditions one layout may list.
pub const MAX_BUCKETS: u32 = 1024;

/// The resolution grid every requested width snaps to.
///
/// A viewport `viewport_step` pixels wide (times the real-estate fraction)
/// maps to one `bucket_width`-pixel bucket. Keeping the grid coarse bounds the
/// number of distinct renditions a store has to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Grid {
    pub bucket_width: u32,
    pub viewport_step: u32,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            bucket_width: 320,
            viewport_step: 300,
        }
    }
}

impl Grid {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.bucket_width == 0 {
            return Err(ParamError::Grid("bucket_width"));
        }
        if self.viewport_step == 0 {
            return Err(ParamError::Grid("viewport_step"));
        }
        Ok(())
    }
}

/// Layout of one attachment, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConfig {
    aspect_ratio: f64,
    width_real_estate: f64,
}

impl ResizeConfig {
    /// `aspect_ratio` is width ÷ height (1.33 for 4:3). `width_real_estate`
    /// is the fraction of the viewport width the image occupies.
    pub fn new(aspect_ratio: f64, width_real_estate: f64) -> Result<Self, ParamError> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(ParamError::AspectRatio(aspect_ratio));
        }
        if !(width_real_estate.is_finite() && width_real_estate > 0.0) {
            return Err(ParamError::WidthRealEstate(width_real_estate));
        }
        Ok(Self {
            aspect_ratio,
            width_real_estate,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn width_real_estate(&self) -> f64 {
        self.width_real_estate
    }
}

/// Viewport range a store pre-renders for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketRange {
    max_viewport_width: f64,
    max_pixel_ratio: f64,
}

impl BucketRange {
    pub fn new(max_viewport_width: f64, max_pixel_ratio: f64) -> Result<Self, ParamError> {
        if !(max_viewport_width > 0.0 && max_viewport_width <= MAX_VIEWPORT_WIDTH) {
            return Err(ParamError::MaxViewportWidth(max_viewport_width));
        }
        if !(1.0..=MAX_PIXEL_RATIO).contains(&max_pixel_ratio) {
            return Err(ParamError::MaxPixelRatio(max_pixel_ratio));
        }
        Ok(Self {
            max_viewport_width,
            max_pixel_ratio,
        })
    }

    pub fn max_viewport_width(&self) -> f64 {
        self.max_viewport_width
    }

    pub fn max_pixel_ratio(&self) -> f64 {
        self.max_pixel_ratio
    }
}
