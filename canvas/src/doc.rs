//! Document model: canvas elements, their payloads, and the in-memory store.
//!
//! This module defines what sits on the canvas (`CanvasElement`, its typed
//! payload `ElementContent`, and its geometry), a sparse-update type for
//! incremental edits (`ElementPatch`), and the runtime store that owns all
//! live elements plus the current selection (`ElementStore`).
//!
//! Elements are created by [`crate::factory`], mutated through
//! [`ElementStore::update`], and leave the store only through
//! [`ElementStore::remove`]. The store's element order is the draw order:
//! later elements render above earlier ones.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::surface::Point;

/// Unique identifier for a canvas element. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value behind this id.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// The kind of a canvas element. Fixed for the element's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Free-form text block.
    Text,
    /// Reference to an image by URL.
    Image,
    /// Reference to an external link by URL.
    Link,
}

impl ElementKind {
    /// All kinds, in toolbar order.
    pub const ALL: [ElementKind; 3] = [Self::Text, Self::Image, Self::Link];

    /// Lowercase name as used on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed payload of a canvas element. The variant doubles as the element's kind.
///
/// Image and link URLs are stored as entered; they are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum ElementContent {
    Text(String),
    Image(String),
    Link(String),
}

impl ElementContent {
    /// Build a payload of the given kind.
    #[must_use]
    pub fn new(kind: ElementKind, payload: impl Into<String>) -> Self {
        let payload = payload.into();
        match kind {
            ElementKind::Text => Self::Text(payload),
            ElementKind::Image => Self::Image(payload),
            ElementKind::Link => Self::Link(payload),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text(_) => ElementKind::Text,
            Self::Image(_) => ElementKind::Image,
            Self::Link(_) => ElementKind::Link,
        }
    }

    /// The literal text or URL carried by this payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Image(s) | Self::Link(s) => s,
        }
    }

    /// Replace the payload string, keeping the variant.
    fn replace_payload(&mut self, payload: String) {
        match self {
            Self::Text(s) | Self::Image(s) | Self::Link(s) => *s = payload,
        }
    }
}

/// Error returned by [`Size::new`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("element size must be finite and positive, got {width}x{height}")]
pub struct SizeError {
    pub width: f64,
    pub height: f64,
}

/// Width and height of an element. Both are strictly positive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSize")]
pub struct Size {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawSize {
    width: f64,
    height: f64,
}

impl TryFrom<RawSize> for Size {
    type Error = SizeError;

    fn try_from(raw: RawSize) -> Result<Self, Self::Error> {
        Size::new(raw.width, raw.height)
    }
}

impl Size {
    /// Validate and build a size.
    ///
    /// # Errors
    ///
    /// Returns [`SizeError`] if either dimension is zero, negative, or not finite.
    pub fn new(width: f64, height: f64) -> Result<Self, SizeError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(SizeError { width, height })
        }
    }

    /// Build a size from constants known to be positive.
    pub(crate) const fn from_positive(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.height
    }
}

/// A positioned, sized, typed entity on the canvas.
///
/// Not `Clone`: the store holds the only instance of each id. Copies leave
/// the store as [`crate::snapshot::ElementRecord`]s.
#[derive(Debug, PartialEq)]
pub struct CanvasElement {
    id: ElementId,
    content: ElementContent,
    position: Point,
    size: Size,
}

impl CanvasElement {
    pub(crate) fn new(id: ElementId, content: ElementContent, position: Point, size: Size) -> Self {
        Self { id, content, position, size }
    }

    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    #[must_use]
    pub fn content(&self) -> &ElementContent {
        &self.content
    }

    /// Top-left corner in canvas-local coordinates.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Whether `pt` lies within this element's bounds (left/top inclusive).
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.position.x
            && pt.y >= self.position.y
            && pt.x < self.position.x + self.size.width
            && pt.y < self.position.y + self.size.height
    }

    fn apply(&mut self, patch: &ElementPatch) {
        if let Some(pos) = patch.position {
            self.position = Point { x: pos.x.max(0.0), y: pos.y.max(0.0) };
        }
        if let Some(ref content) = patch.content {
            self.content.replace_payload(content.clone());
        }
        if let Some(size) = patch.size {
            self.size = size;
        }
    }
}

/// Sparse update for a canvas element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New top-left corner. Negative coordinates are clamped to zero, non-finite
    /// ones reject the whole patch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New payload string; the element keeps its kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl ElementPatch {
    #[must_use]
    pub fn position(position: Point) -> Self {
        Self { position: Some(position), ..Default::default() }
    }

    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self { content: Some(content.into()), ..Default::default() }
    }

    #[must_use]
    pub fn size(size: Size) -> Self {
        Self { size: Some(size), ..Default::default() }
    }

    /// Whether applying this patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.content.is_none() && self.size.is_none()
    }
}

/// In-memory store of canvas elements and the current selection.
///
/// Unknown ids are silent no-ops for every mutation; callers learn whether
/// anything happened from the return value, never from an error.
#[derive(Debug, Default)]
pub struct ElementStore {
    elements: Vec<CanvasElement>,
    selected: Option<ElementId>,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element; it becomes the topmost in draw order.
    pub fn add(&mut self, element: CanvasElement) {
        debug!(id = %element.id, kind = %element.kind(), "element added");
        self.elements.push(element);
    }

    /// Merge `patch` into the element with `id`.
    ///
    /// Returns false, leaving the store untouched, if no such element exists or
    /// the patch carries a non-finite position. Negative positions are clamped
    /// to zero; this is the one place canvas positions are clamped.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if patch.position.is_some_and(|pos| !pos.is_finite()) {
            debug!(%id, ?patch, "non-finite position rejected");
            return false;
        }
        let Some(element) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        element.apply(patch);
        debug!(%id, ?patch, "element updated");
        true
    }

    /// Remove the element with `id`, clearing the selection if it pointed there.
    pub fn remove(&mut self, id: ElementId) -> Option<CanvasElement> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        let removed = self.elements.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        debug!(%id, "element removed");
        Some(removed)
    }

    /// Set the selection. Existence is not checked here; `remove` keeps it consistent.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected = id;
    }

    /// The selected id, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    /// Resolve the selection to a live element.
    #[must_use]
    pub fn selected(&self) -> Option<&CanvasElement> {
        self.selected.and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// All elements in draw order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        &self.elements
    }

    /// The topmost element whose bounds contain `pt`.
    #[must_use]
    pub fn topmost_at(&self, pt: Point) -> Option<ElementId> {
        self.elements.iter().rev().find(|e| e.contains(pt)).map(|e| e.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
