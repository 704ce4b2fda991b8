//! Pure geometry for thumbnail rendering.
//!
//! A rendition is produced in up to three steps, each planned here without
//! touching pixels:
//!
//! 1. a cheap power-of-two pre-shrink while the source is far larger than the
//!    box,
//! 2. an optional center crop to the box's aspect ratio,
//! 3. a high-quality scale that fits the result inside the box.

use crate::types::Dimensions;

/// Region of an image to keep, in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The steps a backend runs to turn one source into one rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailPlan {
    /// Size after the fast pre-shrink, if one is worth doing.
    pub prescaled: Option<Dimensions>,
    /// Crop applied to the pre-shrunk image.
    pub crop: Option<CropBox>,
    /// Final size written to disk.
    pub output: Dimensions,
}

/// Largest size inside `bounds` with the aspect ratio of `size`.
///
/// Never enlarges, and never collapses an edge below one pixel.
///
/// # Examples
/// ```
/// # use responsive_gal::store::fit_within;
/// # use responsive_gal::types::Dimensions;
/// let out = fit_within(Dimensions::new(500, 375), Dimensions::new(320, 241));
/// assert_eq!(out, Dimensions::new(320, 240));
/// ```
pub fn fit_within(size: Dimensions, bounds: Dimensions) -> Dimensions {
    let (mut w, mut h) = (size.width as u64, size.height as u64);
    let (bw, bh) = (bounds.width as u64, bounds.height as u64);
    if w > bw {
        h = (h * bw / w).max(1);
        w = bw;
    }
    if h > bh {
        w = (w * bh / h).max(1);
        h = bh;
    }
    Dimensions::new(w as u32, h as u32)
}

/// Size after halving the source until it is no longer more than twice the
/// box in both directions. `None` when the source is already close enough.
pub fn prescale(source: Dimensions, bounds: Dimensions) -> Option<Dimensions> {
    let (w, h) = (source.width as u64, source.height as u64);
    let (bw, bh) = (bounds.width as u64, bounds.height as u64);
    let mut factor = 1u64;
    while w / factor > 2 * bw && h * 2 / factor > 2 * bh {
        factor *= 2;
    }
    if factor == 1 {
        return None;
    }
    let shrunk = Dimensions::new(
        (w / factor).max(1) as u32,
        (h / factor).max(1) as u32,
    );
    Some(fit_within(source, shrunk))
}

/// Centered region of `size` with the aspect ratio of `bounds`.
///
/// The longer side (relative to the box) is trimmed equally on both ends.
pub fn crop_to_aspect(size: Dimensions, bounds: Dimensions) -> CropBox {
    let w_ratio = size.width as f64 / bounds.width as f64;
    let h_ratio = size.height as f64 / bounds.height as f64;

    if h_ratio > w_ratio {
        let (y, height) = centered_span(size.height, bounds.height as f64 * w_ratio);
        CropBox {
            x: 0,
            y,
            width: size.width,
            height,
        }
    } else {
        let (x, width) = centered_span(size.width, bounds.width as f64 * h_ratio);
        CropBox {
            x,
            y: 0,
            width,
            height: size.height,
        }
    }
}

/// Start and length of a run of `keep` pixels centered in `total`.
fn centered_span(total: u32, keep: f64) -> (u32, u32) {
    let mid = (total / 2) as f64;
    // Float-to-int casts truncate and saturate at 0
    let start = (mid - keep / 2.0) as u32;
    let end = ((mid + keep / 2.0) as u32).min(total);
    (start, end.saturating_sub(start).max(1))
}

/// Plan every step for rendering `source` into a `bounds` box.
pub fn plan_thumbnail(source: Dimensions, bounds: Dimensions, crop: bool) -> ThumbnailPlan {
    let prescaled = prescale(source, bounds);
    let current = prescaled.unwrap_or(source);
    let crop = crop.then(|| crop_to_aspect(current, bounds));
    let cropped = crop.map_or(current, |c| Dimensions::new(c.width, c.height));
    ThumbnailPlan {
        prescaled,
        crop,
        output: fit_within(cropped, bounds),
    }
}
