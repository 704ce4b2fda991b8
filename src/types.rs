//! Shared types used across the locator, sizing, and resizer modules.
//!
//! [`Dimensions`] is serialized in the CLI's `--json` output, so its field
//! names are part of that contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A pixel resolution as encoded in a locator suffix (`_640x480`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Viewport geometry read at the start of every resize pass.
///
/// `width` is in logical (CSS) pixels. `pixel_ratio` is `None` when the host
/// cannot report a device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_ratio: Option<f64>,
}

impl Viewport {
    /// A viewport on a standard-density display.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            pixel_ratio: None,
        }
    }

    pub fn with_pixel_ratio(width: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            pixel_ratio: Some(pixel_ratio),
        }
    }

    /// The pixel ratio if it is a usable number above 1.
    ///
    /// Non-finite values count as "not reported".
    pub fn hidpi_ratio(&self) -> Option<f64> {
        self.pixel_ratio.filter(|r| r.is_finite() && *r > 1.0)
    }
}
