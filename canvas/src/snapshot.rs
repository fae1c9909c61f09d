//! Point-in-time export of canvas state for a persistence collaborator.
//!
//! A snapshot owns its data: it is built by copying every element out of the
//! store into flat [`ElementRecord`]s, so later edits to the live canvas and
//! edits to the snapshot cannot see each other. No I/O happens here; the
//! host decides how (and whether) to serialize and ship the value.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::{CanvasElement, ElementId, ElementKind, ElementStore, Size};
use crate::surface::Point;

/// Flat, owned copy of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: ElementId,
    pub kind: ElementKind,
    /// Literal text for text blocks, URL for images and links.
    pub content: String,
    pub position: Point,
    pub size: Size,
}

impl From<&CanvasElement> for ElementRecord {
    fn from(el: &CanvasElement) -> Self {
        Self {
            id: el.id(),
            kind: el.kind(),
            content: el.content().as_str().to_owned(),
            position: el.position(),
            size: el.size(),
        }
    }
}

/// Owned copy of a whole canvas, elements in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSnapshot {
    /// Identity of the editing session the snapshot came from.
    pub canvas_id: Uuid,
    pub title: String,
    pub elements: Vec<ElementRecord>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected_id: Option<ElementId>,
}

impl CanvasSnapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Copy the store's current contents into a new snapshot.
#[must_use]
pub fn snapshot(canvas_id: Uuid, title: &str, store: &ElementStore) -> CanvasSnapshot {
    CanvasSnapshot {
        canvas_id,
        title: title.to_owned(),
        elements: store.elements().iter().map(ElementRecord::from).collect(),
        selected_id: store.selected_id(),
    }
}
