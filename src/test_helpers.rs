//! Shared test utilities for the responsive-gal test suite.
//!
//! Builds in-memory documents and flattens them back into source lists so
//! resizer tests can assert on the whole page at once, and writes small
//! JPEG sources for store tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = gallery(&["a_640x480", "b_640x480"]);
//! // ... run passes against `doc` with selector THUMB ...
//! assert_eq!(sources(&doc), vec!["a_960x722", "b_960x722"]);
//! ```

use crate::host::MemoryDocument;
use image::{ImageEncoder, RgbImage};
use std::path::Path;

/// Selector every image built by [`gallery`] matches.
pub const THUMB: &str = ".thumb";

/// A document whose images all match [`THUMB`], in the given order.
pub fn gallery(locators: &[&str]) -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    for locator in locators {
        doc.insert(&[THUMB], *locator);
    }
    doc
}

/// Current source of every live image, in document order.
pub fn sources(doc: &MemoryDocument) -> Vec<String> {
    doc.images().map(|(_, src)| src.to_string()).collect()
}

/// Write a small valid JPEG. The path needs no extension.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
