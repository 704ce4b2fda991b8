//! Viewport-driven source rewriting for groups of images.
//!
//! An [`Attachment`] binds a selector to a [`ResizeConfig`] and remembers the
//! width it last requested. Each resize pass computes the grid-snapped target
//! for the current viewport and, only when the width bucket changed, rewrites
//! the `_WIDTHxHEIGHT` suffix of every matching element.
//!
//! ```text
//! attach(".thumb", 1.33, 0.5)      photo_640x480  (baseline width 640)
//! viewport 900   → 640x482         unchanged, no writes
//! viewport 1200  → 640x482         unchanged, no writes
//! viewport 1800  → 960x722         photo_960x722
//! ```
//!
//! The [`Resizer`] is the page-session registry: the host calls
//! [`Resizer::on_viewport_resize`] on every resize notification and each live
//! attachment runs one pass, in attach order. [`Resizer::attach`] hands back an
//! [`AttachHandle`]; passing it to [`Resizer::detach`] unsubscribes.
//!
//! ## Baseline
//!
//! The baseline width is parsed from the *first* matched element only and is
//! shared by the whole group. Elements that start at a different resolution
//! are brought onto the group's size at the next bucket change.

use crate::host::Document;
use crate::locator::{ParseError, parse_dimensions, replace_dimensions};
use crate::sizing::{Grid, ParamError, ResizeConfig, compute_target};
use crate::types::{Dimensions, Viewport};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttachError {
    #[error("invalid resize configuration: {0}")]
    InvalidConfig(#[from] ParamError),
    #[error("selector {0:?} matched no elements")]
    NoMatchingElements(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What one resize pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Target width equals the cached width; the document was not touched.
    Unchanged { width: u32 },
    /// The width bucket changed and matching elements were rewritten.
    Resized {
        dims: Dimensions,
        /// Elements whose locator was replaced.
        rewritten: usize,
        /// Elements without a parseable suffix, left as they were.
        skipped: usize,
    },
}

/// One selector bound to a layout, plus the width it last requested.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    selector: String,
    config: ResizeConfig,
    current_width: u32,
}

impl Attachment {
    /// Bind `selector` and read the baseline width from its first element.
    ///
    /// Does not run a pass; [`Resizer::attach`] does that.
    pub fn new<D: Document>(
        doc: &D,
        selector: &str,
        config: ResizeConfig,
    ) -> Result<Self, AttachError> {
        let first = doc
            .select(selector)
            .into_iter()
            .find_map(|el| doc.source(el))
            .ok_or_else(|| AttachError::NoMatchingElements(selector.to_string()))?;
        let baseline = parse_dimensions(&first)?;

        Ok(Self {
            selector: selector.to_string(),
            config,
            current_width: baseline.width,
        })
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    /// Width of the most recently requested resolution.
    pub fn current_width(&self) -> u32 {
        self.current_width
    }

    /// Recompute the target for `viewport` and rewrite sources if its width moved.
    pub fn resize_pass<D: Document>(
        &mut self,
        doc: &mut D,
        grid: &Grid,
        viewport: &Viewport,
    ) -> ResizeOutcome {
        if let Some(ratio) = viewport.hidpi_ratio() {
            log::debug!("detected hidpi display with ratio={ratio}");
        }
        let target = compute_target(grid, &self.config, viewport);
        log::debug!(
            "resize pass selector={} viewport={} target={}",
            self.selector,
            viewport.width,
            target
        );

        if target.width == self.current_width {
            return ResizeOutcome::Unchanged {
                width: self.current_width,
            };
        }
        self.current_width = target.width;

        let mut rewritten = 0;
        let mut skipped = 0;
        for el in doc.select(&self.selector) {
            let Some(source) = doc.source(el) else {
                continue;
            };
            match replace_dimensions(&source, target) {
                Ok(updated) if updated == source => {}
                Ok(updated) => {
                    doc.set_source(el, updated);
                    rewritten += 1;
                }
                Err(e) => {
                    log::warn!("skipping element of {}: {e}", self.selector);
                    skipped += 1;
                }
            }
        }

        ResizeOutcome::Resized {
            dims: target,
            rewritten,
            skipped,
        }
    }
}

/// Proof of a live attachment, returned by [`Resizer::attach`].
///
/// Not `Clone`: detaching consumes it, so an attachment is detached at most once.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping the handle makes the attachment impossible to detach"]
pub struct AttachHandle {
    registry: u64,
    id: u64,
}

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// All attachments of one page session.
///
/// Not `Clone`: every registry has its own identity, and handles only
/// resolve in the registry that issued them.
#[derive(Debug)]
pub struct Resizer {
    grid: Grid,
    registry: u64,
    next_id: u64,
    attachments: Vec<(u64, Attachment)>,
}

impl Default for Resizer {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
            registry: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
            attachments: Vec::new(),
        }
    }
}

impl Resizer {
    pub fn new(grid: Grid) -> Result<Self, ParamError> {
        grid.validate()?;
        Ok(Self {
            grid,
            ..Self::default()
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Bind `selector`, run one pass against `viewport`, and keep the
    /// attachment for later resize notifications.
    ///
    /// On error nothing is registered and the document is untouched.
    pub fn attach<D: Document>(
        &mut self,
        doc: &mut D,
        viewport: &Viewport,
        selector: &str,
        aspect_ratio: f64,
        width_real_estate: f64,
    ) -> Result<AttachHandle, AttachError> {
        let config = ResizeConfig::new(aspect_ratio, width_real_estate)?;
        let mut attachment = Attachment::new(doc, selector, config)?;
        attachment.resize_pass(doc, &self.grid, viewport);

        let id = self.next_id;
        self.next_id += 1;
        self.attachments.push((id, attachment));
        Ok(AttachHandle {
            registry: self.registry,
            id,
        })
    }

    /// Stop resizing for `handle` and return its final state.
    ///
    /// `None` if the handle came from a different `Resizer`.
    pub fn detach(&mut self, handle: AttachHandle) -> Option<Attachment> {
        let pos = self.position(&handle)?;
        Some(self.attachments.remove(pos).1)
    }

    pub fn attachment(&self, handle: &AttachHandle) -> Option<&Attachment> {
        self.position(handle).map(|pos| &self.attachments[pos].1)
    }

    fn position(&self, handle: &AttachHandle) -> Option<usize> {
        if handle.registry != self.registry {
            return None;
        }
        self.attachments.iter().position(|(id, _)| *id == handle.id)
    }

    /// Run one pass per live attachment, in attach order.
    pub fn on_viewport_resize<D: Document>(
        &mut self,
        doc: &mut D,
        viewport: &Viewport,
    ) -> Vec<ResizeOutcome> {
        let grid = self.grid;
        self.attachments
            .iter_mut()
            .map(|(_, attachment)| attachment.resize_pass(doc, &grid, viewport))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}
