//! Scroll-bound parallax
//!
//! A parallax binding owns exactly one scroll trigger. The element's offset
//! (a percentage of its own size along the scroll axis) is
//! `progress * speed * 100`, where progress runs from 0.0 when the element's
//! leading edge enters the viewport to 1.0 when its trailing edge leaves.
//! With [`Scrub::Off`] the progress instead plays once, on the engine's
//! default timing, as soon as the element enters that range.

use glide_core::{Axis, ElementId, LayoutHost, VisualProps};

use crate::engine::{EngineHandle, Scrub, TriggerId};
use crate::preference::MotionPreference;

/// Parallax options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParallaxOptions {
    /// Fraction of the element's size travelled over the trigger range
    pub speed: f32,
    pub direction: Axis,
    pub scrub: Scrub,
}

impl ParallaxOptions {
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn direction(mut self, direction: Axis) -> Self {
        self.direction = direction;
        self
    }

    /// Accepts a [`Scrub`], a `bool` or a smoothing time in seconds
    pub fn scrub(mut self, scrub: impl Into<Scrub>) -> Self {
        self.scrub = scrub.into().sanitized();
        self
    }
}

impl Default for ParallaxOptions {
    fn default() -> Self {
        Self {
            speed: 0.5,
            direction: Axis::Vertical,
            scrub: Scrub::Continuous,
        }
    }
}

/// Owner of one parallax scroll trigger
///
/// Dropping the handle releases the trigger. An inert handle (reduced
/// motion, or no element to bind) registers nothing and always reports a
/// zero offset.
pub struct ParallaxHandle {
    engine: EngineHandle,
    trigger: Option<TriggerId>,
    element: Option<ElementId>,
    options: ParallaxOptions,
}

impl ParallaxHandle {
    pub fn bind(
        engine: &EngineHandle,
        preference: &MotionPreference,
        element: Option<ElementId>,
        options: ParallaxOptions,
        host: &dyn LayoutHost,
    ) -> Self {
        let Some(el) = element else {
            tracing::debug!("parallax: no element, binding inert");
            return Self::inert(options);
        };
        if preference.reduced_motion() {
            tracing::debug!(element = ?el, "parallax: reduced motion, binding inert");
            return Self::inert(options);
        }
        if host.element_bounds(el).is_none() {
            tracing::debug!(element = ?el, "parallax: element not mounted, binding inert");
            return Self::inert(options);
        }

        let trigger = engine.register(el, options.direction, options.scrub, host);
        Self {
            engine: engine.clone(),
            trigger,
            element: Some(el),
            options,
        }
    }

    fn inert(options: ParallaxOptions) -> Self {
        Self {
            engine: EngineHandle::detached(),
            trigger: None,
            element: None,
            options,
        }
    }

    /// Check whether this handle owns a live trigger
    pub fn is_active(&self) -> bool {
        self.trigger
            .is_some_and(|id| self.engine.progress(id).is_some())
    }

    pub fn progress(&self) -> f32 {
        self.trigger
            .and_then(|id| self.engine.progress(id))
            .unwrap_or(0.0)
    }

    /// Offset as a percentage of the element's size
    pub fn offset_percent(&self) -> f32 {
        self.progress() * self.options.speed * 100.0
    }

    /// Visual props translating the element by its current offset
    pub fn visual(&self, host: &dyn LayoutHost) -> VisualProps {
        let Some(bounds) = self.element.and_then(|el| host.element_bounds(el)) else {
            return VisualProps::IDENTITY;
        };
        let fraction = self.offset_percent() / 100.0;
        match self.options.direction {
            Axis::Vertical => VisualProps::IDENTITY.with_translate(0.0, bounds.height * fraction),
            Axis::Horizontal => VisualProps::IDENTITY.with_translate(bounds.width * fraction, 0.0),
        }
    }
}

impl Drop for ParallaxHandle {
    fn drop(&mut self) {
        if let Some(id) = self.trigger.take() {
            self.engine.unregister(id);
        }
    }
}

impl std::fmt::Debug for ParallaxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParallaxHandle")
            .field("active", &self.is_active())
            .field("offset_percent", &self.offset_percent())
            .finish()
    }
}
