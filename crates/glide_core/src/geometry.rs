//! Geometry and visual property types
//!
//! All rectangles are in document coordinates (origin at the top-left of the
//! scrollable page, y growing downward). The viewport is the window onto the
//! document described by the current scroll offset.

/// An axis-aligned rectangle in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grow the rectangle by `margin` on every side
    ///
    /// A negative margin shrinks it, which is how trigger zones are made
    /// smaller than the viewport.
    pub fn outset(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: (self.width + margin * 2.0).max(0.0),
            height: (self.height + margin * 2.0).max(0.0),
        }
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Overlapping region of two rectangles, if they overlap with positive area
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    /// Fraction of this rectangle's area that lies inside `zone` (0.0 to 1.0)
    ///
    /// Degenerate (zero-area) rectangles count as fully visible when their
    /// origin lies inside the zone.
    pub fn visible_fraction(&self, zone: &Rect) -> f32 {
        let area = self.area();
        if area <= f32::EPSILON {
            return if zone.contains_point(self.x, self.y) {
                1.0
            } else {
                0.0
            };
        }

        self.intersection(zone)
            .map(|overlap| (overlap.area() / area).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}

/// Scroll axis for scroll-linked bindings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

/// The visible window onto the document
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width,
            height,
        }
    }

    /// The viewport as a document-space rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Scroll offset along an axis
    pub fn scroll(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.scroll_y,
            Axis::Horizontal => self.scroll_x,
        }
    }

    /// Viewport extent along an axis
    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// Visual-only properties an animation applies on top of layout
///
/// Translation is in pixels, scale is relative to the layout size with a
/// top-left origin. None of these ever feed back into layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualProps {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl VisualProps {
    /// Fully visible, untransformed
    pub const IDENTITY: VisualProps = VisualProps {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale_x = scale;
        self.scale_y = scale;
        self
    }

    pub fn with_scale_xy(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Check whether these props render the element exactly as laid out
    pub fn is_identity(&self) -> bool {
        const EPSILON: f32 = 1e-4;
        (self.opacity - 1.0).abs() < EPSILON
            && self.translate_x.abs() < EPSILON
            && self.translate_y.abs() < EPSILON
            && (self.scale_x - 1.0).abs() < EPSILON
            && (self.scale_y - 1.0).abs() < EPSILON
    }

    /// Where `layout` ends up on screen once these props are applied
    pub fn apply_to(&self, layout: Rect) -> Rect {
        Rect::new(
            layout.x + self.translate_x,
            layout.y + self.translate_y,
            layout.width * self.scale_x,
            layout.height * self.scale_y,
        )
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::IDENTITY
    }
}
