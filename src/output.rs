//! CLI output formatting for every command.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! https://cdn.example/photo_640x480
//!     Viewport: 1800px (effective 1800px)
//!     Baseline: 640x480
//!     Target:   960x722
//!     → https://cdn.example/photo_960x722
//! ```
//!
//! ## Buckets
//!
//! ```text
//! Buckets (aspect 1.33, real estate 0.5, up to 2560px @ 2x)
//! 001     320x241
//! 002     640x482
//! 003     960x722
//! ```
//!
//! ## Render
//!
//! ```text
//! abc123: 3 sizes, 2 rendered
//! 001     320x241  abc123_320x241  rendered
//! 002     640x482  abc123_640x482  kept
//! 003     960x722  abc123_960x722  rendered
//! ```
//!
//! ## Check
//!
//! ```text
//! Grid: 320px buckets per 300px viewport
//! Attachments
//! 001 thumbnails
//!     Selector: .thumb
//!     Layout: aspect 0.8, real estate 0.25
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::config::ResizerConfig;
use crate::locator::dimension_key;
use crate::plan::Plan;
use crate::store::Rendition;
use crate::types::Dimensions;

const INDENT: &str = "    ";

/// Positional index header, `001 title`.
fn entity_header(index: usize, title: &str) -> String {
    format!("{:03} {}", index, title)
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(plan: &Plan) -> Vec<String> {
    let mut lines = vec![plan.source.clone()];
    lines.push(format!(
        "{INDENT}Viewport: {}px (effective {}px)",
        plan.viewport.width, plan.effective_width
    ));
    lines.push(format!("{INDENT}Baseline: {}", plan.baseline));
    lines.push(format!("{INDENT}Target:   {}", plan.target));
    if plan.changed {
        lines.push(format!("{INDENT}→ {}", plan.locator));
    } else {
        lines.push(format!("{INDENT}unchanged (same {}px bucket)", plan.baseline.width));
    }
    lines
}

pub fn print_plan(plan: &Plan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Buckets
// ============================================================================

/// Column layout for the bucket table.
pub struct BucketHeading {
    pub aspect_ratio: f64,
    pub width_real_estate: f64,
    pub max_viewport_width: f64,
    pub max_pixel_ratio: f64,
}

/// One row per bucket. With `key`, each row also shows the store key the
/// rendition is saved under.
pub fn format_buckets(
    heading: &BucketHeading,
    sizes: &[Dimensions],
    key: Option<&str>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Buckets (aspect {}, real estate {}, up to {}px @ {}x)",
        heading.aspect_ratio,
        heading.width_real_estate,
        heading.max_viewport_width,
        heading.max_pixel_ratio
    )];
    for (i, dims) in sizes.iter().enumerate() {
        let size = format!("{:>11}", dims.to_string());
        let row = match key {
            Some(k) => format!("{:03} {size}  {}", i + 1, dimension_key(k, *dims)),
            None => format!("{:03} {size}", i + 1),
        };
        lines.push(row.trim_end().to_string());
    }
    lines
}

pub fn print_buckets(heading: &BucketHeading, sizes: &[Dimensions], key: Option<&str>) {
    for line in format_buckets(heading, sizes, key) {
        println!("{}", line);
    }
}

// ============================================================================
// Render
// ============================================================================

pub fn format_renditions(key: &str, renditions: &[Rendition]) -> Vec<String> {
    let rendered = renditions.iter().filter(|r| r.created).count();
    let mut lines = vec![format!(
        "{key}: {} sizes, {rendered} rendered",
        renditions.len()
    )];
    for (i, rendition) in renditions.iter().enumerate() {
        let status = if rendition.created { "rendered" } else { "kept" };
        lines.push(format!(
            "{:03} {:>11}  {}  {status}",
            i + 1,
            rendition.size.to_string(),
            rendition.key
        ));
    }
    lines
}

pub fn print_renditions(key: &str, renditions: &[Rendition]) {
    for line in format_renditions(key, renditions) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_config(config: &ResizerConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "Grid: {}px buckets per {}px viewport",
        config.grid.bucket_width, config.grid.viewport_step
    )];
    if config.attachments.is_empty() {
        lines.push("No attachments configured".to_string());
        return lines;
    }
    lines.push("Attachments".to_string());
    for (i, attachment) in config.attachments.iter().enumerate() {
        lines.push(entity_header(i + 1, &attachment.name));
        lines.push(format!("{INDENT}Selector: {}", attachment.selector));
        lines.push(format!(
            "{INDENT}Layout: aspect {}, real estate {}",
            attachment.aspect_ratio, attachment.width_real_estate
        ));
    }
    lines
}

pub fn print_config(config: &ResizerConfig) {
    for line in format_config(config) {
        println!("{}", line);
    }
}
