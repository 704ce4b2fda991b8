//! End-to-end resize flows through the public API.
//!
//! Uses a small class-attribute document of its own to check that the
//! resizer depends only on the `Document` trait, and `MemoryDocument` for the
//! scenarios that need the write log.

use responsive_gal::host::{Document, MemoryDocument};
use responsive_gal::locator::ParseError;
use responsive_gal::resizer::{AttachError, ResizeOutcome, Resizer};
use responsive_gal::types::{Dimensions, Viewport};

/// `<img class=".." src="..">` elements, selected by exact class match.
#[derive(Default)]
struct ClassPage {
    images: Vec<(String, String)>,
}

impl ClassPage {
    fn with(images: &[(&str, &str)]) -> Self {
        Self {
            images: images
                .iter()
                .map(|(class, src)| (class.to_string(), src.to_string()))
                .collect(),
        }
    }

    fn srcs(&self) -> Vec<&str> {
        self.images.iter().map(|(_, src)| src.as_str()).collect()
    }
}

impl Document for ClassPage {
    type Element = usize;

    fn select(&self, selector: &str) -> Vec<usize> {
        let class = selector.trim_start_matches('.');
        (0..self.images.len())
            .filter(|&i| self.images[i].0 == class)
            .collect()
    }

    fn source(&self, element: usize) -> Option<String> {
        self.images.get(element).map(|(_, src)| src.clone())
    }

    fn set_source(&mut self, element: usize, locator: String) {
        if let Some(image) = self.images.get_mut(element) {
            image.1 = locator;
        }
    }
}

#[test]
fn viewport_walk_only_rewrites_on_bucket_change() {
    let mut page = ClassPage::with(&[("photo", "https://cdn.example/photo_640x480")]);
    let mut resizer = Resizer::default();

    let _handle = resizer
        .attach(&mut page, &Viewport::new(900.0), ".photo", 1.33, 0.5)
        .unwrap();
    assert_eq!(page.srcs(), vec!["https://cdn.example/photo_640x480"]);

    let outcomes = resizer.on_viewport_resize(&mut page, &Viewport::new(1200.0));
    assert_eq!(outcomes, vec![ResizeOutcome::Unchanged { width: 640 }]);
    assert_eq!(page.srcs(), vec!["https://cdn.example/photo_640x480"]);

    let outcomes = resizer.on_viewport_resize(&mut page, &Viewport::new(1800.0));
    assert_eq!(
        outcomes,
        vec![ResizeOutcome::Resized {
            dims: Dimensions::new(960, 722),
            rewritten: 1,
            skipped: 0,
        }]
    );
    assert_eq!(page.srcs(), vec!["https://cdn.example/photo_960x722"]);

    // Shrinking back crosses into the 640 bucket again
    resizer.on_viewport_resize(&mut page, &Viewport::new(1000.0));
    assert_eq!(page.srcs(), vec!["https://cdn.example/photo_640x482"]);
}

#[test]
fn other_classes_are_left_alone() {
    let mut page = ClassPage::with(&[
        ("photo", "a_640x480"),
        ("avatar", "me_64x64"),
        ("photo", "b_640x480"),
    ]);
    let mut resizer = Resizer::default();

    let _handle = resizer
        .attach(&mut page, &Viewport::new(1800.0), ".photo", 1.33, 0.5)
        .unwrap();

    assert_eq!(page.srcs(), vec!["a_960x722", "me_64x64", "b_960x722"]);
}

#[test]
fn repeated_notifications_in_same_bucket_write_nothing() {
    let mut doc = MemoryDocument::new();
    doc.insert(&[".thumb"], "t_320x400");
    let mut resizer = Resizer::default();
    let _handle = resizer
        .attach(&mut doc, &Viewport::new(1300.0), ".thumb", 0.8, 0.25)
        .unwrap();
    // 1300 * 0.25 / 300 = 1.08 → 640x800
    assert_eq!(doc.writes().len(), 1);

    for width in [1201.0, 1250.0, 1400.0, 1799.0, 1800.0] {
        resizer.on_viewport_resize(&mut doc, &Viewport::new(width));
    }
    assert_eq!(doc.writes().len(), 1);
}

#[test]
fn dense_display_requests_larger_rendition() {
    let mut standard = ClassPage::with(&[("photo", "p_320x240")]);
    let mut dense = ClassPage::with(&[("photo", "p_320x240")]);
    let mut resizer = Resizer::default();

    let _a = resizer
        .attach(&mut standard, &Viewport::with_pixel_ratio(1000.0, 1.0), ".photo", 1.5, 1.0)
        .unwrap();
    let _b = resizer
        .attach(&mut dense, &Viewport::with_pixel_ratio(1000.0, 2.0), ".photo", 1.5, 1.0)
        .unwrap();

    // 1000 / 300 = 3.33 → 1280; 2000 / 300 = 6.67 → 2240
    assert_eq!(standard.srcs(), vec!["p_1280x854"]);
    assert_eq!(dense.srcs(), vec!["p_2240x1494"]);
}

#[test]
fn malformed_locator_aborts_attach() {
    let mut page = ClassPage::with(&[("photo", "https://cdn.example/photo.jpg")]);
    let mut resizer = Resizer::default();

    let err = resizer
        .attach(&mut page, &Viewport::new(1800.0), ".photo", 1.33, 0.5)
        .unwrap_err();

    assert_eq!(
        err,
        AttachError::Parse(ParseError::MissingSuffix(
            "https://cdn.example/photo.jpg".to_string()
        ))
    );
    assert!(resizer.is_empty());
    assert!(resizer.on_viewport_resize(&mut page, &Viewport::new(3000.0)).is_empty());
    assert_eq!(page.srcs(), vec!["https://cdn.example/photo.jpg"]);
}

#[test]
fn detached_group_stops_following_viewport() {
    let mut doc = MemoryDocument::new();
    doc.insert(&[".thumb"], "t_320x400");
    doc.insert(&["#hero"], "h_640x427");
    let mut resizer = Resizer::default();
    let thumbs = resizer
        .attach(&mut doc, &Viewport::new(600.0), ".thumb", 0.8, 0.25)
        .unwrap();
    let _hero = resizer
        .attach(&mut doc, &Viewport::new(600.0), "#hero", 1.5, 1.0)
        .unwrap();

    assert!(resizer.detach(thumbs).is_some());
    resizer.on_viewport_resize(&mut doc, &Viewport::new(2400.0));

    let srcs: Vec<&str> = doc.images().map(|(_, src)| src).collect();
    assert_eq!(srcs, vec!["t_320x400", "h_2560x1707"]);
}

#[test]
fn images_added_after_attach_join_next_bucket_change() {
    let mut doc = MemoryDocument::new();
    doc.insert(&[".thumb"], "a_640x480");
    let mut resizer = Resizer::default();
    let _handle = resizer
        .attach(&mut doc, &Viewport::new(900.0), ".thumb", 1.33, 0.5)
        .unwrap();

    // next page of results rendered at the server's default size
    doc.insert(&[".thumb"], "b_320x241");
    resizer.on_viewport_resize(&mut doc, &Viewport::new(1800.0));

    let srcs: Vec<&str> = doc.images().map(|(_, src)| src).collect();
    assert_eq!(srcs, vec!["a_960x722", "b_960x722"]);
}
