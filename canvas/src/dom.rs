//! Browser surface adapter.
//!
//! Measures a DOM element with `getBoundingClientRect`. A detached element
//! reports `None` so drops onto an unmounted canvas are ignored.

use web_sys::Element;

use crate::surface::{SurfaceGeometry, SurfaceRect};

/// The canvas surface as mounted in the page.
#[derive(Debug, Clone)]
pub struct DomSurface {
    element: Element,
}

impl DomSurface {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl SurfaceGeometry for DomSurface {
    fn bounding_rect(&self) -> Option<SurfaceRect> {
        if !self.element.is_connected() {
            return None;
        }
        let r = self.element.get_bounding_client_rect();
        Some(SurfaceRect { left: r.left(), top: r.top(), width: r.width(), height: r.height() })
    }
}
