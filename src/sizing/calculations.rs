//! Pure calculation functions for resolution selection.
//!
//! All functions here are pure and testable without a document or viewport
//! events.

use super::params::{BucketRange, Grid, MAX_BUCKETS, ParamError, ResizeConfig};
use crate::types::{Dimensions, Viewport};

/// Logical viewport width scaled by the device pixel ratio on dense displays.
///
/// A ratio that is missing, not a number, or at most 1 leaves the width as is.
///
/// # Examples
/// ```
/// # use responsive_gal::sizing::effective_viewport_width;
/// # use responsive_gal::types::Viewport;
/// assert_eq!(effective_viewport_width(&Viewport::new(800.0)), 800.0);
/// assert_eq!(effective_viewport_width(&Viewport::with_pixel_ratio(800.0, 2.0)), 1600.0);
/// ```
pub fn effective_viewport_width(viewport: &Viewport) -> f64 {
    match viewport.hidpi_ratio() {
        Some(ratio) => viewport.width * ratio,
        None => viewport.width,
    }
}

/// Snap the width an image occupies to the grid.
///
/// `ceil(effective_width * width_real_estate / viewport_step) * bucket_width`,
/// with the bucket count clamped to at least one so the result is always a
/// positive multiple of `bucket_width`. At the top end the count stops at the
/// largest multiple that still fits in a `u32`.
pub fn target_width(grid: &Grid, effective_width: f64, width_real_estate: f64) -> u32 {
    let max_buckets = u32::MAX.checked_div(grid.bucket_width).unwrap_or(u32::MAX);
    let buckets = (effective_width * width_real_estate / grid.viewport_step as f64).ceil();
    // NaN fails the comparison and falls back to one bucket
    let buckets = if buckets >= 1.0 {
        (buckets as u32).min(max_buckets)
    } else {
        1
    };
    buckets * grid.bucket_width
}

/// Height matching `width` at `aspect_ratio` (width ÷ height), rounded up.
///
/// Saturates at `u32::MAX` when a very flat aspect ratio would overflow.
pub fn target_height(width: u32, aspect_ratio: f64) -> u32 {
    (width as f64 / aspect_ratio).ceil().min(u32::MAX as f64) as u32
}

/// Full target resolution for one resize pass.
///
/// # Examples
/// ```
/// # use responsive_gal::sizing::{Grid, ResizeConfig, compute_target};
/// # use responsive_gal::types::{Dimensions, Viewport};
/// let config = ResizeConfig::new(1.33, 0.5).unwrap();
/// let dims = compute_target(&Grid::default(), &config, &Viewport::new(1800.0));
/// assert_eq!(dims, Dimensions::new(960, 722));
/// ```
pub fn compute_target(grid: &Grid, config: &ResizeConfig, viewport: &Viewport) -> Dimensions {
    let width = target_width(
        grid,
        effective_viewport_width(viewport),
        config.width_real_estate(),
    );
    Dimensions::new(width, target_height(width, config.aspect_ratio()))
}

/// Every resolution an attachment can request for logical viewport widths
/// within `range`.
///
/// Sorted by ascending width, one entry per bucket. This is the bounded set a
/// store needs to pre-render so no request ever misses. A layout that would
/// need more than [`MAX_BUCKETS`] renditions is rejected rather than listed.
pub fn bucket_sizes(
    grid: &Grid,
    config: &ResizeConfig,
    range: &BucketRange,
) -> Result<Vec<Dimensions>, ParamError> {
    grid.validate()?;
    let widest = Viewport::with_pixel_ratio(range.max_viewport_width(), range.max_pixel_ratio());
    let max_width = target_width(
        grid,
        effective_viewport_width(&widest),
        config.width_real_estate(),
    );
    let max_buckets = max_width / grid.bucket_width;
    if max_buckets > MAX_BUCKETS {
        return Err(ParamError::TooManyBuckets(max_buckets));
    }

    Ok((1..=max_buckets)
        .map(|n| {
            let width = n * grid.bucket_width;
            Dimensions::new(width, target_height(width, config.aspect_ratio()))
        })
        .collect())
}
