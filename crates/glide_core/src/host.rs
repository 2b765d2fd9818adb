//! Layout host seam
//!
//! Motion code never owns layout. It asks a [`LayoutHost`] where elements are
//! and what the viewport looks like, and answers with [`VisualProps`] that the
//! host applies at paint time.
//!
//! [`MemoryHost`] is a plain in-memory implementation: element rectangles and
//! a scroll position that callers mutate directly. Tests and the headless demo
//! drive everything through it.
//!
//! [`VisualProps`]: crate::VisualProps

use slotmap::{new_key_type, SlotMap};

use crate::geometry::{Rect, Viewport};

new_key_type! {
    /// Handle to an element owned by the layout host
    pub struct ElementId;
}

/// Read access to layout and scroll state
pub trait LayoutHost {
    /// Document-space layout box of a mounted element
    ///
    /// Returns `None` for elements that are not (or no longer) mounted.
    fn element_bounds(&self, id: ElementId) -> Option<Rect>;

    /// Current viewport (scroll offset and size)
    fn viewport(&self) -> Viewport;
}

/// In-memory layout host
#[derive(Debug, Clone)]
pub struct MemoryHost {
    elements: SlotMap<ElementId, Rect>,
    viewport: Viewport,
}

impl MemoryHost {
    /// Create a host with the given viewport size, scrolled to the origin
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            elements: SlotMap::with_key(),
            viewport: Viewport::new(width, height),
        }
    }

    /// Mount an element with the given layout box
    pub fn insert(&mut self, bounds: Rect) -> ElementId {
        self.elements.insert(bounds)
    }

    /// Move or resize a mounted element
    ///
    /// Returns false if the element is not mounted.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) -> bool {
        match self.elements.get_mut(id) {
            Some(slot) => {
                *slot = bounds;
                true
            }
            None => false,
        }
    }

    /// Unmount an element
    pub fn remove(&mut self, id: ElementId) -> Option<Rect> {
        let removed = self.elements.remove(id);
        if removed.is_some() {
            tracing::trace!("MemoryHost: removed element {:?}", id);
        }
        removed
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Set the scroll offset
    pub fn scroll_to(&mut self, x: f32, y: f32) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
    }

    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }
}

impl LayoutHost for MemoryHost {
    fn element_bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).copied()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
