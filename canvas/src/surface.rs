//! Surface geometry and viewport-to-canvas coordinate mapping.
//!
//! Pointer events arrive in viewport space. The canvas surface is an element
//! somewhere on the page, so a pointer position only becomes a canvas-local
//! position once the surface's on-screen bounding box is known. That box can
//! only be measured while the surface is mounted, which is why every query
//! here may come back empty.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::{Deserialize, Serialize};

/// A point in either viewport or canvas-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// On-screen bounding box of the canvas surface, in viewport CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceRect {
    /// Distance from the viewport's left edge to the surface's left edge.
    pub left: f64,
    /// Distance from the viewport's top edge to the surface's top edge.
    pub top: f64,
    /// Visible width of the surface. Informational; the canvas itself is unbounded.
    pub width: f64,
    /// Visible height of the surface. Informational; the canvas itself is unbounded.
    pub height: f64,
}

impl SurfaceRect {
    /// A rect anchored at `(left, top)` with no measured extent.
    #[must_use]
    pub fn at(left: f64, top: f64) -> Self {
        Self { left, top, width: 0.0, height: 0.0 }
    }
}

/// Why a pointer position could not be mapped onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The surface is not mounted or could not be measured.
    #[error("canvas surface geometry is unavailable")]
    UnavailableSurface,
    /// The pointer or the measured rect produced a NaN or infinite coordinate.
    #[error("pointer position is not a finite point")]
    NonFinite,
}

/// Source of the surface's current bounding box.
///
/// Returns `None` whenever the surface cannot be measured (not mounted,
/// detached from the document, or the host's measurement failed).
pub trait SurfaceGeometry {
    fn bounding_rect(&self) -> Option<SurfaceRect>;
}

impl<F> SurfaceGeometry for F
where
    F: Fn() -> Option<SurfaceRect>,
{
    fn bounding_rect(&self) -> Option<SurfaceRect> {
        self()
    }
}

/// Translate a viewport pointer position into canvas-local coordinates.
///
/// # Errors
///
/// The result is the plain offset from the surface origin and may be
/// negative; the store clamps positions when it applies them.
///
/// # Errors
///
/// Returns [`MappingError::UnavailableSurface`] when `rect` is `None` and
/// [`MappingError::NonFinite`] when either mapped coordinate is NaN or infinite.
pub fn to_canvas_space(pointer: Point, rect: Option<SurfaceRect>) -> Result<Point, MappingError> {
    let rect = rect.ok_or(MappingError::UnavailableSurface)?;
    let mapped = Point { x: pointer.x - rect.left, y: pointer.y - rect.top };
    if !mapped.is_finite() {
        return Err(MappingError::NonFinite);
    }
    Ok(mapped)
}
