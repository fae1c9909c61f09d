//! Canvas engine: the intent surface that UI controls drive.
//!
//! `EngineCore` holds everything that does not depend on the host page
//! (store, drag session, session identity) so it can be tested natively.
//! `Engine` adds the host surface and measures it at drop time.
//!
//! Every intent returns an [`Action`] describing what changed. Intents that
//! name an unknown element, or drops that cannot be mapped, return
//! [`Action::None`]; nothing here fails across the boundary.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::debug;
use uuid::Uuid;

use crate::consts::DEFAULT_TITLE;
use crate::doc::{CanvasElement, ElementId, ElementKind, ElementPatch, ElementStore, Size};
use crate::factory;
use crate::input::{DragSession, DropOutcome};
use crate::snapshot::{self, CanvasSnapshot, ElementRecord};
use crate::surface::{Point, SurfaceGeometry, SurfaceRect};

/// Actions returned from intents for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    ElementCreated(ElementRecord),
    ElementUpdated { id: ElementId, fields: ElementPatch },
    ElementDeleted { id: ElementId },
    SelectionChanged { id: Option<ElementId> },
}

/// Core engine state. Holds all logic that doesn't depend on the host surface.
#[derive(Debug)]
pub struct EngineCore {
    pub store: ElementStore,
    pub drag: DragSession,
    canvas_id: Uuid,
    title: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineCore {
    /// Start a new editing session with a fresh canvas id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_title(DEFAULT_TITLE)
    }

    #[must_use]
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            store: ElementStore::new(),
            drag: DragSession::new(),
            canvas_id: Uuid::new_v4(),
            title: title.into(),
        }
    }

    // --- Toolbar / edit intents ---

    /// Create an element of `kind` and place it on top of the canvas.
    pub fn add_element(&mut self, kind: ElementKind) -> Action {
        let element = factory::create(kind);
        let record = ElementRecord::from(&element);
        self.store.add(element);
        Action::ElementCreated(record)
    }

    /// Replace an element's payload (text or URL).
    pub fn update_element_content(&mut self, id: ElementId, content: impl Into<String>) -> Action {
        self.apply(id, ElementPatch::content(content))
    }

    /// Resize an element.
    pub fn resize_element(&mut self, id: ElementId, size: Size) -> Action {
        self.apply(id, ElementPatch::size(size))
    }

    pub fn delete_element(&mut self, id: ElementId) -> Action {
        if self.store.remove(id).is_none() {
            return Action::None;
        }
        if self.drag.dragging() == Some(id) {
            self.drag.cancel();
        }
        Action::ElementDeleted { id }
    }

    pub fn select_element(&mut self, id: Option<ElementId>) -> Action {
        if self.store.selected_id() == id {
            return Action::None;
        }
        self.store.select(id);
        Action::SelectionChanged { id }
    }

    // --- Drag intents ---

    /// Pick up an element. Ignored if another drag is active or the id is unknown.
    pub fn begin_drag(&mut self, id: ElementId) -> Action {
        if self.store.get(id).is_none() {
            debug!(%id, "drag of unknown element ignored");
            return Action::None;
        }
        if let Err(e) = self.drag.begin_drag(id) {
            debug!(error = %e, "drag start ignored");
        }
        Action::None
    }

    /// Abandon the active drag; nothing moves.
    pub fn cancel_drag(&mut self) -> Action {
        self.drag.cancel();
        Action::None
    }

    /// Release `id` at `pointer` over a surface measured as `rect`.
    ///
    /// With no drag active the drop acts as a one-step pick-up and release of
    /// `id`. If a drag of a different element is active, that drag is
    /// cancelled and nothing moves.
    pub fn on_drop(&mut self, id: ElementId, pointer: Point, rect: Option<SurfaceRect>) -> Action {
        match self.drag.dragging() {
            Some(active) if active != id => {
                debug!(%active, dropped = %id, "drop does not match active drag");
                self.drag.cancel();
                return Action::None;
            }
            Some(_) => {}
            None => {
                if self.store.get(id).is_none() {
                    return Action::None;
                }
                if let Err(e) = self.drag.begin_drag(id) {
                    debug!(error = %e, "drop ignored");
                    return Action::None;
                }
            }
        }

        match self.drag.drop_on(&mut self.store, pointer, rect) {
            DropOutcome::Moved { id, position } => {
                Action::ElementUpdated { id, fields: ElementPatch::position(position) }
            }
            DropOutcome::Unmapped { .. } | DropOutcome::Missing { .. } | DropOutcome::NotDragging => Action::None,
        }
    }

    // --- Export ---

    /// Independent copy of the canvas for a persistence collaborator.
    #[must_use]
    pub fn export(&self) -> CanvasSnapshot {
        let snap = snapshot::snapshot(self.canvas_id, &self.title, &self.store);
        debug!(canvas_id = %self.canvas_id, elements = snap.len(), "canvas exported");
        snap
    }

    // --- Queries ---

    #[must_use]
    pub fn canvas_id(&self) -> Uuid {
        self.canvas_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.store.selected_id()
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.store.get(id)
    }

    /// Elements in draw order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[CanvasElement] {
        self.store.elements()
    }

    fn apply(&mut self, id: ElementId, patch: ElementPatch) -> Action {
        if self.store.update(id, &patch) {
            Action::ElementUpdated { id, fields: patch }
        } else {
            Action::None
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the host surface.
#[derive(Debug)]
pub struct Engine<S> {
    surface: S,
    pub core: EngineCore,
}

impl<S: SurfaceGeometry> Engine<S> {
    /// Create an engine bound to the given surface.
    #[must_use]
    pub fn new(surface: S) -> Self {
        Self { surface, core: EngineCore::new() }
    }

    #[must_use]
    pub fn with_core(surface: S, core: EngineCore) -> Self {
        Self { surface, core }
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // --- Delegated intents ---

    pub fn add_element(&mut self, kind: ElementKind) -> Action {
        self.core.add_element(kind)
    }

    pub fn update_element_content(&mut self, id: ElementId, content: impl Into<String>) -> Action {
        self.core.update_element_content(id, content)
    }

    pub fn resize_element(&mut self, id: ElementId, size: Size) -> Action {
        self.core.resize_element(id, size)
    }

    pub fn delete_element(&mut self, id: ElementId) -> Action {
        self.core.delete_element(id)
    }

    pub fn select_element(&mut self, id: Option<ElementId>) -> Action {
        self.core.select_element(id)
    }

    pub fn begin_drag(&mut self, id: ElementId) -> Action {
        self.core.begin_drag(id)
    }

    pub fn cancel_drag(&mut self) -> Action {
        self.core.cancel_drag()
    }

    /// Release `id` at a viewport pointer position, measuring the surface now.
    pub fn on_drop(&mut self, id: ElementId, pointer_x: f64, pointer_y: f64) -> Action {
        let rect = self.surface.bounding_rect();
        self.core.on_drop(id, Point::new(pointer_x, pointer_y), rect)
    }

    #[must_use]
    pub fn export(&self) -> CanvasSnapshot {
        self.core.export()
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.core.selection()
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.core.element(id)
    }
}
