//! Resolution selection: from viewport geometry to a grid-snapped size.
//!
//! | Step | Function |
//! |---|---|
//! | **Density** | [`effective_viewport_width`]: scale by pixel ratio on hi-DPI displays |
//! | **Width** | [`target_width`]: `ceil(effective × real_estate / 300) × 320` |
//! | **Height** | [`target_height`]: `ceil(width / aspect_ratio)` |
//! | **Pre-render set** | [`bucket_sizes`]: every size reachable within a [`BucketRange`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Validated inputs ([`Grid`], [`ResizeConfig`], [`BucketRange`])

mod calculations;
mod params;

pub use calculations::{
    bucket_sizes, compute_target, effective_viewport_width, target_height, target_width,
};
pub use params::{
    BucketRange, Grid, MAX_BUCKETS, MAX_PIXEL_RATIO, MAX_VIEWPORT_WIDTH, ParamError, ResizeConfig,
};
