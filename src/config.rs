//! Resizer configuration module.
//!
//! Handles loading, validating, and merging `responsive-gal.toml`. User
//! values are layered over stock defaults, so a config file only needs the
//! keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [grid]
//! bucket_width = 320        # Requested widths are multiples of this
//! viewport_step = 300       # Effective viewport pixels per bucket
//!
//! [buckets]
//! max_viewport_width = 2560 # Widest logical viewport to pre-render for
//! max_pixel_ratio = 2.0     # Densest display to pre-render for
//!
//! [render]
//! quality = 75              # JPEG quality of rendered thumbnails
//! crop = false              # Center-crop to the thumbnail's aspect first
//!
//! [[attachments]]
//! name = "thumbnails"
//! selector = ".thumb"
//! aspect_ratio = 0.8        # width / height
//! width_real_estate = 0.25  # fraction of the viewport width
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::sizing::{BucketRange, Grid, ParamError, ResizeConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "responsive-gal.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `responsive-gal.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizerConfig {
    /// Resolution grid shared by every attachment.
    pub grid: Grid,
    /// Range the `buckets` and `render` commands pre-compute sizes for.
    pub buckets: BucketsConfig,
    /// How renditions are encoded.
    pub render: RenderConfig,
    /// Named selector bindings.
    pub attachments: Vec<AttachmentConfig>,
}

impl ResizerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate().map_err(validation)?;

        self.buckets
            .range(None, None)
            .map_err(|e| ConfigError::Validation(format!("buckets: {e}")))?;
        if !(1..=100).contains(&self.render.quality) {
            return Err(ConfigError::Validation(
                "render.quality must be 1-100".into(),
            ));
        }

        let mut names = HashSet::new();
        for attachment in &self.attachments {
            if attachment.selector.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "attachments.{}: selector must not be empty",
                    attachment.name
                )));
            }
            if !names.insert(attachment.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "attachments.{}: duplicate name",
                    attachment.name
                )));
            }
            attachment.resize_config().map_err(|e| {
                ConfigError::Validation(format!("attachments.{}: {e}", attachment.name))
            })?;
        }
        Ok(())
    }

    pub fn attachment(&self, name: &str) -> Option<&AttachmentConfig> {
        self.attachments.iter().find(|a| a.name == name)
    }
}

fn validation(e: ParamError) -> ConfigError {
    ConfigError::Validation(e.to_string())
}

/// Viewport range used to enumerate pre-rendered sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketsConfig {
    pub max_viewport_width: u32,
    pub max_pixel_ratio: f64,
}

impl Default for BucketsConfig {
    fn default() -> Self {
        Self {
            max_viewport_width: 2560,
            max_pixel_ratio: 2.0,
        }
    }
}

impl BucketsConfig {
    /// The configured range with optional command-line overrides applied.
    ///
    /// Overrides are held to the same bounds as the file values.
    pub fn range(
        &self,
        max_viewport_width: Option<f64>,
        max_pixel_ratio: Option<f64>,
    ) -> Result<BucketRange, ParamError> {
        BucketRange::new(
            max_viewport_width.unwrap_or(self.max_viewport_width as f64),
            max_pixel_ratio.unwrap_or(self.max_pixel_ratio),
        )
    }
}

/// Encoding settings for rendered thumbnails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// JPEG quality (1-100).
    pub quality: u8,
    /// Center-crop the source to the rendition's aspect ratio before scaling.
    pub crop: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: 75,
            crop: false,
        }
    }
}

/// One named selector binding. All fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttachmentConfig {
    pub name: String,
    pub selector: String,
    pub aspect_ratio: f64,
    pub width_real_estate: f64,
}

impl AttachmentConfig {
    pub fn resize_config(&self) -> Result<ResizeConfig, ParamError> {
        ResizeConfig::new(self.aspect_ratio, self.width_real_estate)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResizerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so an
///   `[[attachments]]` list in the overlay replaces the base list.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load [`CONFIG_FILE`] from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResizerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from [`CONFIG_FILE`] in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ResizerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `responsive-gal.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# responsive-gal configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resolution grid
# ---------------------------------------------------------------------------
[grid]
# Requested image widths are always a multiple of this many pixels, so the
# image store only ever renders a small set of sizes.
bucket_width = 320

# Effective viewport pixels (times the image's real estate) per bucket.
viewport_step = 300

# ---------------------------------------------------------------------------
# Pre-rendering range for `responsive-gal buckets`
# ---------------------------------------------------------------------------
[buckets]
# Widest logical viewport, in CSS pixels (at most 16384).
max_viewport_width = 2560

# Densest display (device pixel ratio, 1 to 8).
max_pixel_ratio = 2.0

# ---------------------------------------------------------------------------
# Thumbnail rendering for `responsive-gal render`
# ---------------------------------------------------------------------------
[render]
# JPEG quality (1-100).
quality = 75

# Center-crop the source to each thumbnail's aspect ratio before scaling.
# When false the whole image is scaled to fit inside the thumbnail box.
crop = false

# ---------------------------------------------------------------------------
# Attachments
# ---------------------------------------------------------------------------
# One block per group of images sharing a layout:
#
# [[attachments]]
# name = "thumbnails"
# selector = ".thumb"
# aspect_ratio = 0.8        # width / height, e.g. 1.33 for 4:3
# width_real_estate = 0.25  # fraction of the viewport width
"##
}
