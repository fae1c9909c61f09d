//! Element construction with per-kind defaults.
//!
//! Ids come from a single process-wide counter, so two factories (or two
//! engines) in the same process can never hand out the same id.

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Serialize, Serializer};

use crate::consts::{
    DEFAULT_WIDTH, DEFAULT_X, DEFAULT_Y, IMAGE_PLACEHOLDER, LINK_PLACEHOLDER, MEDIA_HEIGHT, TEXT_HEIGHT,
    TEXT_PLACEHOLDER,
};
use crate::doc::{CanvasElement, ElementContent, ElementId, ElementKind, Size};
use crate::surface::Point;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Issue the next element id. Strictly increasing for the life of the process.
fn next_id() -> ElementId {
    ElementId::from_raw(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// What a new element of a given kind starts out as.
///
/// Serializes in the same flat shape as a snapshot record: `content` is the
/// bare payload string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementDefaults {
    pub kind: ElementKind,
    #[serde(serialize_with = "payload_only")]
    pub content: ElementContent,
    pub position: Point,
    pub size: Size,
}

fn payload_only<S: Serializer>(content: &ElementContent, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(content.as_str())
}

/// Defaults for `kind`: placeholder payload, the shared spawn point, and a kind-specific size.
#[must_use]
pub fn defaults(kind: ElementKind) -> ElementDefaults {
    let (placeholder, height) = match kind {
        ElementKind::Text => (TEXT_PLACEHOLDER, TEXT_HEIGHT),
        ElementKind::Image => (IMAGE_PLACEHOLDER, MEDIA_HEIGHT),
        ElementKind::Link => (LINK_PLACEHOLDER, MEDIA_HEIGHT),
    };
    ElementDefaults {
        kind,
        content: ElementContent::new(kind, placeholder),
        position: Point::new(DEFAULT_X, DEFAULT_Y),
        size: Size::from_positive(DEFAULT_WIDTH, height),
    }
}

/// Create a new element of `kind` with a fresh id. Does not touch any store.
#[must_use]
pub fn create(kind: ElementKind) -> CanvasElement {
    let ElementDefaults { content, position, size, .. } = defaults(kind);
    CanvasElement::new(next_id(), content, position, size)
}
