//! Input model: the drag session state machine.
//!
//! A drag carries only the identity of the element being moved. Pointer
//! motion between pick-up and release never touches the store; the single
//! commit happens on drop, after the release point has been mapped into
//! canvas space. Every exit from `Dragging` lands back in `Idle`, whether
//! the drop committed, failed to map, or was cancelled.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use tracing::{debug, warn};

use crate::doc::{ElementId, ElementPatch, ElementStore};
use crate::surface::{MappingError, Point, SurfaceRect, to_canvas_space};

/// Internal state for the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The user has picked up an element and not yet released it.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
    },
}

/// Rejected drag transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DragError {
    /// A second drag was started while one is active (single pointer only).
    #[error("already dragging {0}")]
    AlreadyDragging(ElementId),
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    /// The element now sits at `position` (canvas-local, as stored).
    Moved { id: ElementId, position: Point },
    /// The release point could not be mapped; nothing moved.
    Unmapped { id: ElementId, reason: MappingError },
    /// The element vanished from the store mid-drag; nothing moved.
    Missing { id: ElementId },
    /// There was no active drag.
    NotDragging,
}

/// A single-pointer drag interaction.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Id of the element currently being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<ElementId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { id } => Some(id),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// `Idle -> Dragging(id)`.
    ///
    /// # Errors
    ///
    /// Returns [`DragError::AlreadyDragging`] if a drag is active; the active
    /// session is left as it was.
    pub fn begin_drag(&mut self, id: ElementId) -> Result<(), DragError> {
        if let DragState::Dragging { id: active } = self.state {
            warn!(%active, requested = %id, "drag already in progress");
            return Err(DragError::AlreadyDragging(active));
        }
        self.state = DragState::Dragging { id };
        debug!(%id, "drag started");
        Ok(())
    }

    /// `Dragging(id) -> Idle`, committing the mapped release point to the store.
    ///
    /// The store is only touched when mapping succeeds. A mapped point left of
    /// or above the surface origin is clamped by the store, and the outcome
    /// reports the position actually stored.
    pub fn drop_on(&mut self, store: &mut ElementStore, pointer: Point, rect: Option<SurfaceRect>) -> DropOutcome {
        let DragState::Dragging { id } = std::mem::take(&mut self.state) else {
            return DropOutcome::NotDragging;
        };

        let position = match to_canvas_space(pointer, rect) {
            Ok(position) => position,
            Err(reason) => {
                debug!(%id, %reason, "drop ignored");
                return DropOutcome::Unmapped { id, reason };
            }
        };

        if !store.update(id, &ElementPatch::position(position)) {
            return DropOutcome::Missing { id };
        }
        match store.get(id) {
            Some(element) => {
                let position = element.position();
                debug!(%id, x = position.x, y = position.y, "drag committed");
                DropOutcome::Moved { id, position }
            }
            None => DropOutcome::Missing { id },
        }
    }

    /// `Dragging(id) -> Idle` with no mutation. Returns the abandoned id.
    pub fn cancel(&mut self) -> Option<ElementId> {
        let abandoned = self.dragging();
        self.state = DragState::Idle;
        if let Some(id) = abandoned {
            debug!(%id, "drag cancelled");
        }
        abandoned
    }
}
