//! On-demand thumbnail store: the server side of the `_WIDTHxHEIGHT` suffix.
//!
//! A source image is stored under a bare key (`abc123`); each rendition lives
//! next to it as `abc123_320x241`, which is exactly what a resizer-rewritten
//! locator asks for. Renditions are produced the first time they are
//! requested and served from disk afterwards.
//!
//! | Operation | Function |
//! |---|---|
//! | **Locate** | [`LocalStore::path`], [`LocalStore::thumbnail_path`] |
//! | **Render** | [`LocalStore::create_thumbnail`]: pre-shrink, optional crop, JPEG |
//! | **Deliver** | [`LocalStore::deliver_image`]: render when missing, return the file |
//! | **Pre-render** | [`LocalStore::render_missing`]: every listed bucket size |
//!
//! The module is split into:
//! - **Calculations**: Pure geometry for each rendering step (unit testable)
//! - **Backend**: [`ThumbnailBackend`] trait, so store logic never decodes pixels itself
//! - **RustBackend**: The `image` crate implementation

mod backend;
mod calculations;
mod rust_backend;

pub use backend::{BackendError, ThumbnailBackend, ThumbnailParams};
pub use calculations::{
    CropBox, ThumbnailPlan, crop_to_aspect, fit_within, plan_thumbnail, prescale,
};
pub use rust_backend::RustBackend;

use crate::config::RenderConfig;
use crate::locator::{InvalidStoreKey, check_store_key, dimension_key};
use crate::types::Dimensions;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    InvalidKey(#[from] InvalidStoreKey),
    #[error("source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("cannot render an empty {0} thumbnail")]
    EmptySize(Dimensions),
    #[error("rendering {key} failed: {source}")]
    Render { key: String, source: BackendError },
}

/// A directory of source images plus the renditions made from them.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    thumbnail_dir: PathBuf,
    render: RenderConfig,
}

/// One rendition after [`LocalStore::render_missing`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendition {
    /// Box that was requested.
    pub size: Dimensions,
    /// Store key of the rendition, `key_WxH`.
    pub key: String,
    pub path: PathBuf,
    /// `false` when the file already existed and was left alone.
    pub created: bool,
}

impl LocalStore {
    /// Sources and renditions both under `root`, stock render settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            thumbnail_dir: root.clone(),
            root,
            render: RenderConfig::default(),
        }
    }

    /// Write renditions somewhere other than next to the sources.
    pub fn with_thumbnail_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.thumbnail_dir = dir.into();
        self
    }

    pub fn with_render_config(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        check_store_key(key)?;
        Ok(self.root.join(key))
    }

    pub fn thumbnail_path(&self, key: &str, size: Dimensions) -> Result<PathBuf, StoreError> {
        check_store_key(key)?;
        Ok(self.thumbnail_dir.join(dimension_key(key, size)))
    }

    /// Render `key` into a `size` box, replacing any existing rendition.
    ///
    /// Returns the size actually written, which is smaller than the box when
    /// cropping is off or the source is small.
    pub fn create_thumbnail<B: ThumbnailBackend>(
        &self,
        backend: &B,
        key: &str,
        size: Dimensions,
    ) -> Result<Dimensions, StoreError> {
        let source = self.path(key)?;
        let output = self.thumbnail_path(key, size)?;
        if size.width == 0 || size.height == 0 {
            return Err(StoreError::EmptySize(size));
        }
        if !source.exists() {
            return Err(StoreError::SourceNotFound(source));
        }

        let params = ThumbnailParams {
            source,
            output,
            size,
            crop: self.render.crop,
            quality: self.render.quality,
        };
        let written = backend.thumbnail(&params).map_err(|e| StoreError::Render {
            key: dimension_key(key, size),
            source: e,
        })?;
        log::debug!("rendered {} at {}", dimension_key(key, size), written);
        Ok(written)
    }

    /// Path of the file to serve for `key`, rendering the `size` rendition
    /// first if it does not exist yet. Without a size, the source itself.
    pub fn deliver_image<B: ThumbnailBackend>(
        &self,
        backend: &B,
        key: &str,
        size: Option<Dimensions>,
    ) -> Result<PathBuf, StoreError> {
        let Some(size) = size else {
            let source = self.path(key)?;
            if !source.exists() {
                return Err(StoreError::SourceNotFound(source));
            }
            return Ok(source);
        };

        let path = self.thumbnail_path(key, size)?;
        if !path.exists() {
            self.create_thumbnail(backend, key, size)?;
        }
        Ok(path)
    }

    /// Make sure every size in `sizes` has a rendition for `key`.
    ///
    /// Existing files are kept unless `force` is set. Stops at the first
    /// failure.
    pub fn render_missing<B: ThumbnailBackend>(
        &self,
        backend: &B,
        key: &str,
        sizes: &[Dimensions],
        force: bool,
    ) -> Result<Vec<Rendition>, StoreError> {
        let source = self.path(key)?;
        if !source.exists() {
            return Err(StoreError::SourceNotFound(source));
        }

        sizes
            .iter()
            .map(|&size| -> Result<Rendition, StoreError> {
                let path = self.thumbnail_path(key, size)?;
                let created = force || !path.exists();
                if created {
                    self.create_thumbnail(backend, key, size)?;
                }
                Ok(Rendition {
                    size,
                    key: dimension_key(key, size),
                    path,
                    created,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::backend::tests::MockBackend;
    use super::*;
    use crate::test_helpers::create_test_jpeg;
    use std::fs;
    use tempfile::TempDir;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    fn store_with_source(tmp: &TempDir, key: &str) -> LocalStore {
        fs::write(tmp.path().join(key), b"source").unwrap();
        LocalStore::new(tmp.path())
    }

    // =========================================================================
    // paths
    // =========================================================================

    #[test]
    fn thumbnail_path_appends_dimensions() {
        let store = LocalStore::new("/srv/images");
        assert_eq!(
            store.thumbnail_path("abc", dims(320, 241)).unwrap(),
            PathBuf::from("/srv/images/abc_320x241")
        );
    }

    #[test]
    fn thumbnail_dir_override() {
        let store = LocalStore::new("/srv/images").with_thumbnail_dir("/srv/cache");
        assert_eq!(
            store.thumbnail_path("abc", dims(320, 241)).unwrap(),
            PathBuf::from("/srv/cache/abc_320x241")
        );
        assert_eq!(store.path("abc").unwrap(), PathBuf::from("/srv/images/abc"));
    }

    #[test]
    fn paths_reject_bad_keys() {
        let store = LocalStore::new("/srv/images");
        assert!(matches!(
            store.path("../etc/passwd"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.thumbnail_path("a/b", dims(320, 241)),
            Err(StoreError::InvalidKey(_))
        ));
    }

    // =========================================================================
    // create_thumbnail tests
    // =========================================================================

    #[test]
    fn create_thumbnail_passes_render_settings() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc").with_render_config(RenderConfig {
            quality: 90,
            crop: true,
        });
        let backend = MockBackend::with_source(dims(4000, 3000));

        let written = store
            .create_thumbnail(&backend, "abc", dims(320, 241))
            .unwrap();

        assert_eq!(written, dims(320, 241));
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].quality, 90);
        assert!(ops[0].crop);
        assert!(ops[0].output.ends_with("abc_320x241"));
    }

    #[test]
    fn create_thumbnail_missing_source() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let backend = MockBackend::new();

        let result = store.create_thumbnail(&backend, "nope", dims(320, 241));
        assert!(matches!(result, Err(StoreError::SourceNotFound(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn create_thumbnail_rejects_empty_box() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc");
        let result = store.create_thumbnail(&MockBackend::new(), "abc", dims(0, 241));
        assert!(matches!(result, Err(StoreError::EmptySize(_))));
    }

    // =========================================================================
    // deliver_image tests
    // =========================================================================

    #[test]
    fn deliver_renders_once() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc");
        let backend = MockBackend::with_source(dims(800, 600));

        let first = store
            .deliver_image(&backend, "abc", Some(dims(320, 241)))
            .unwrap();
        let second = store
            .deliver_image(&backend, "abc", Some(dims(320, 241)))
            .unwrap();

        assert_eq!(first, tmp.path().join("abc_320x241"));
        assert_eq!(first, second);
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn deliver_without_size_is_source() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc");
        let backend = MockBackend::new();

        let path = store.deliver_image(&backend, "abc", None).unwrap();
        assert_eq!(path, tmp.path().join("abc"));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn deliver_unknown_key_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let result = store.deliver_image(&MockBackend::new(), "nope", None);
        assert!(matches!(result, Err(StoreError::SourceNotFound(_))));
    }

    // =========================================================================
    // render_missing tests
    // =========================================================================

    #[test]
    fn render_missing_skips_existing() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc");
        fs::write(tmp.path().join("abc_640x482"), b"old").unwrap();
        let backend = MockBackend::with_source(dims(4000, 3000));

        let sizes = [dims(320, 241), dims(640, 482), dims(960, 722)];
        let renditions = store.render_missing(&backend, "abc", &sizes, false).unwrap();

        let created: Vec<bool> = renditions.iter().map(|r| r.created).collect();
        assert_eq!(created, vec![true, false, true]);
        assert_eq!(renditions[1].key, "abc_640x482");
        assert_eq!(backend.get_operations().len(), 2);
        assert_eq!(fs::read(tmp.path().join("abc_640x482")).unwrap(), b"old");
    }

    #[test]
    fn render_missing_force_rerenders() {
        let tmp = TempDir::new().unwrap();
        let store = store_with_source(&tmp, "abc");
        fs::write(tmp.path().join("abc_320x241"), b"old").unwrap();
        let backend = MockBackend::with_source(dims(4000, 3000));

        let renditions = store
            .render_missing(&backend, "abc", &[dims(320, 241)], true)
            .unwrap();
        assert!(renditions[0].created);
        assert_eq!(backend.get_operations().len(), 1);
    }

    #[test]
    fn render_missing_unknown_key() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let backend = MockBackend::new();

        let result = store.render_missing(&backend, "nope", &[dims(320, 241)], false);
        assert!(matches!(result, Err(StoreError::SourceNotFound(_))));
    }

    // =========================================================================
    // real backend
    // =========================================================================

    #[test]
    fn deliver_with_rust_backend_writes_jpeg() {
        let tmp = TempDir::new().unwrap();
        create_test_jpeg(&tmp.path().join("abc"), 1600, 1200);
        let out = tmp.path().join("cache");
        fs::create_dir(&out).unwrap();
        let store = LocalStore::new(tmp.path()).with_thumbnail_dir(&out);

        let path = store
            .deliver_image(&RustBackend::new(), "abc", Some(dims(320, 241)))
            .unwrap();

        assert_eq!(path, out.join("abc_320x241"));
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
