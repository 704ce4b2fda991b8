//! One-shot resolution planning for a single locator.
//!
//! [`plan`] runs a real attachment against a one-image [`MemoryDocument`], so
//! what it reports is exactly what a page would do on its first pass.

use crate::host::MemoryDocument;
use crate::locator::parse_dimensions;
use crate::resizer::{AttachError, Resizer};
use crate::sizing::{Grid, ResizeConfig, compute_target, effective_viewport_width};
use crate::types::{Dimensions, Viewport};
use serde::Serialize;

const SELECTOR: &str = "img";

/// Result of planning one locator against one viewport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub source: String,
    pub baseline: Dimensions,
    pub viewport: Viewport,
    pub effective_width: f64,
    pub target: Dimensions,
    /// Locator after the pass; equals `source` when `changed` is false.
    pub locator: String,
    pub changed: bool,
}

/// Attach to `source` with the given layout and report the first pass.
pub fn plan(
    grid: Grid,
    source: &str,
    viewport: Viewport,
    aspect_ratio: f64,
    width_real_estate: f64,
) -> Result<Plan, AttachError> {
    let mut doc = MemoryDocument::new();
    doc.insert(&[SELECTOR], source);

    let mut resizer = Resizer::new(grid)?;
    let _handle = resizer.attach(&mut doc, &viewport, SELECTOR, aspect_ratio, width_real_estate)?;
    let config = ResizeConfig::new(aspect_ratio, width_real_estate)?;

    let locator = doc
        .images()
        .next()
        .map(|(_, src)| src.to_string())
        .unwrap_or_else(|| source.to_string());

    Ok(Plan {
        source: source.to_string(),
        baseline: parse_dimensions(source)?,
        viewport,
        effective_width: effective_viewport_width(&viewport),
        target: compute_target(resizer.grid(), &config, &viewport),
        changed: locator != source,
        locator,
    })
}
