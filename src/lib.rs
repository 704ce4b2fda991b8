//! # Responsive Gal
//!
//! Picks the resolution a gallery image should be fetched at from the
//! viewport it is shown in. Image locators carry their resolution in a
//! `_WIDTHxHEIGHT` suffix (`photo_640x480`) and the image store renders any
//! size it is asked for; this crate decides which size to ask for, and
//! rewrites the suffix when that decision changes.
//!
//! # Architecture: Attach, Then React
//!
//! ```text
//! attach(selector, aspect, real estate)
//!     parse baseline width from first match   photo_640x480 → 640
//!     run one pass                            ─┐
//! on_viewport_resize(viewport)                 │ compute target
//!     run one pass per attachment             ─┘ rewrite if width bucket moved
//! detach(handle)
//! ```
//!
//! The host page is reached only through the [`host::Document`] trait, so the
//! same resizer runs against a browser binding, a headless renderer, or the
//! bundled [`host::MemoryDocument`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locator`] | `_WIDTHxHEIGHT` suffix parsing and rewriting, store key rules |
//! | [`sizing`] | Pure math: pixel density, grid snapping, height, pre-render set |
//! | [`host`] | [`host::Document`] trait and the in-memory document |
//! | [`resizer`] | Attachments, the per-page registry, attach/detach |
//! | [`plan`] | One-shot planning of a single locator (used by the CLI) |
//! | [`store`] | On-disk store that renders `key_WxH` renditions on demand |
//! | [`config`] | `responsive-gal.toml` loading, validation, and merging |
//! | [`types`] | Shared types ([`types::Dimensions`], [`types::Viewport`]) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Coarse Width Grid
//!
//! Requested widths are `ceil(effective_width × real_estate / 300) × 320`:
//! always a multiple of 320. A store rendering on demand then holds a handful
//! of renditions per image instead of one per visitor's window size, and the
//! [`sizing::bucket_sizes`] list tells it which ones to pre-render.
//!
//! ## Render on First Request
//!
//! The store side of the same grammar lives in [`store`]: a missing
//! `key_WxH` file is rendered from the source the first time it is asked
//! for, then served from disk. The `render` command fills in a whole bucket
//! list ahead of time.
//!
//! ## Rewrite Only on Bucket Changes
//!
//! Resize notifications are not debounced. Each one recomputes the target,
//! but the document is only touched when the width lands in a different
//! bucket, so dragging a window edge does not trigger a stream of fetches.
//!
//! ## Fail at Attach Time
//!
//! A first locator without a dimension suffix leaves nothing to compare
//! against. [`resizer::Resizer::attach`] returns the parse error and registers
//! nothing; the image stays at the resolution it was served at.
//!
//! ## One Baseline per Group
//!
//! The cached width of an attachment is read from its first matched element
//! and stands for the whole group. Groups are expected to share a layout, and
//! a single scalar keeps each pass a compare-then-maybe-write.

pub mod config;
pub mod host;
pub mod locator;
pub mod output;
pub mod plan;
pub mod resizer;
pub mod sizing;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
