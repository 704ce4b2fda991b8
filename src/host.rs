//! Host document trait and an in-memory implementation.
//!
//! The [`Document`] trait is everything the resizer needs from the page that
//! owns the images: resolve a selector to elements, and read or write an
//! element's source locator. The document owns the elements; the resizer only
//! ever holds their handles for the duration of one pass.
//!
//! [`MemoryDocument`] keeps images in a `Vec` and matches selectors against a
//! per-image tag list. The CLI uses it to run a single attachment, and tests
//! use its write log to check exactly which locators a pass touched.

use std::fmt;

/// A page holding image elements whose sources can be rewritten.
pub trait Document {
    /// Handle to one element. Valid at least until the next mutation of the
    /// document's element set.
    type Element: Copy + Eq + fmt::Debug;

    /// Elements matching `selector`, in document order.
    fn select(&self, selector: &str) -> Vec<Self::Element>;

    /// Current source locator, or `None` if the element is gone.
    fn source(&self, element: Self::Element) -> Option<String>;

    /// Replace the source locator. The host is expected to fetch the new asset.
    fn set_source(&mut self, element: Self::Element, locator: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone, PartialEq)]
struct MemoryImage {
    tags: Vec<String>,
    source: String,
    removed: bool,
}

/// Document backed by a list of images, each matching a fixed set of selectors.
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    images: Vec<MemoryImage>,
    writes: Vec<(ElementId, String)>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an image that matches every selector in `tags`.
    pub fn insert(&mut self, tags: &[&str], source: impl Into<String>) -> ElementId {
        self.images.push(MemoryImage {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            source: source.into(),
            removed: false,
        });
        ElementId(self.images.len() - 1)
    }

    /// Detach an image from the document. Its handle stops matching anything.
    pub fn remove(&mut self, id: ElementId) {
        if let Some(image) = self.images.get_mut(id.0) {
            image.removed = true;
        }
    }

    /// Live images and their current sources, in document order.
    pub fn images(&self) -> impl Iterator<Item = (ElementId, &str)> + '_ {
        self.images
            .iter()
            .enumerate()
            .filter(|(_, image)| !image.removed)
            .map(|(i, image)| (ElementId(i), image.source.as_str()))
    }

    /// Every `set_source` call so far, oldest first.
    pub fn writes(&self) -> &[(ElementId, String)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn live(&self, id: ElementId) -> Option<&MemoryImage> {
        self.images.get(id.0).filter(|image| !image.removed)
    }
}

impl Document for MemoryDocument {
    type Element = ElementId;

    fn select(&self, selector: &str) -> Vec<ElementId> {
        self.images
            .iter()
            .enumerate()
            .filter(|(_, image)| !image.removed && image.tags.iter().any(|t| t == selector))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn source(&self, element: ElementId) -> Option<String> {
        self.live(element).map(|image| image.source.clone())
    }

    fn set_source(&mut self, element: ElementId, locator: String) {
        if let Some(image) = self.images.get_mut(element.0).filter(|i| !i.removed) {
            image.source = locator.clone();
            self.writes.push((element, locator));
        }
    }
}
