//! Thumbnail rendering backend trait.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Store logic only sees the [`ThumbnailBackend`] trait, so tests run
//! against a recording mock.

use crate::types::Dimensions;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// One rendition to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Box the rendition must fit inside.
    pub size: Dimensions,
    /// Center-crop to the box's aspect ratio first, so the box is filled.
    pub crop: bool,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

pub trait ThumbnailBackend {
    /// Render `params.source` into `params.output` as JPEG and return the
    /// size actually written.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError>;
}
