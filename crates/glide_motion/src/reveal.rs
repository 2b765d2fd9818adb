//! Viewport-triggered reveal primitives
//!
//! A [`Reveal`] wraps one element. It starts hidden and, the first time the
//! element intersects the trigger zone (the viewport shrunk by a negative
//! margin), transitions to fully visible. Once triggered it never reverts or
//! re-triggers for the lifetime of the instance.
//!
//! Two flavours:
//! - **Fade**: from transparent and offset downward
//! - **Scale**: from transparent and slightly shrunk
//!
//! # Example
//!
//! ```
//! use glide_motion::Reveal;
//!
//! let mut reveal = Reveal::fade().delay(100).offset(32.0);
//! assert_eq!(reveal.visual().opacity, 0.0);
//!
//! assert!(reveal.on_intersection(true));
//! assert!(reveal.has_triggered());
//! ```

use glide_animation::{
    AnimatedProgress, Interpolate, MotionCategory, SchedulerHandle, StaggerOrder,
    TransitionDescriptor, PRESETS,
};
use glide_core::{ElementId, LayoutHost, Rect, Viewport, VisualProps};
use serde::{Deserialize, Serialize};

use crate::preference::MotionPreference;

/// Default downward offset for fade reveals, in pixels
pub const DEFAULT_FADE_OFFSET: f32 = 24.0;

/// Default starting scale for scale reveals
pub const DEFAULT_INITIAL_SCALE: f32 = 0.95;

/// When an element counts as "in view"
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportTrigger {
    /// Margin applied to the viewport; negative shrinks the trigger zone
    pub margin_px: f32,
    /// Visible fraction required; 0.0 means any part visible
    pub threshold: f32,
}

impl ViewportTrigger {
    /// The document-space zone an element has to reach
    pub fn zone(&self, viewport: &Viewport) -> Rect {
        viewport.rect().outset(self.margin_px)
    }

    pub fn is_triggered(&self, bounds: Rect, viewport: &Viewport) -> bool {
        let fraction = bounds.visible_fraction(&self.zone(viewport));
        if self.threshold <= 0.0 {
            fraction > 0.0
        } else {
            fraction >= self.threshold
        }
    }
}

impl Default for ViewportTrigger {
    fn default() -> Self {
        Self {
            margin_px: -50.0,
            threshold: 0.0,
        }
    }
}

/// Reveal flavour
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealKind {
    /// Fade in while sliding up from `offset` pixels below
    Fade { offset: f32 },
    /// Fade in while growing from `initial_scale`
    Scale { initial_scale: f32 },
}

enum RevealState {
    Hidden,
    Revealing(AnimatedProgress),
}

/// A once-only viewport reveal
pub struct Reveal {
    kind: RevealKind,
    delay_ms: Option<u32>,
    duration_ms: Option<u32>,
    transition: Option<TransitionDescriptor>,
    trigger: ViewportTrigger,
    element: Option<ElementId>,
    /// Stagger and start slot assigned by a [`RevealGroup`]
    stagger_ms: Option<u32>,
    stagger_rank: usize,
    scheduler: SchedulerHandle,
    preference: MotionPreference,
    state: RevealState,
}

impl Reveal {
    fn new(kind: RevealKind) -> Self {
        Self {
            kind,
            delay_ms: None,
            duration_ms: None,
            transition: None,
            trigger: ViewportTrigger::default(),
            element: None,
            stagger_ms: None,
            stagger_rank: 0,
            scheduler: SchedulerHandle::detached(),
            preference: MotionPreference::detached(),
            state: RevealState::Hidden,
        }
    }

    pub fn fade() -> Self {
        Self::new(RevealKind::Fade {
            offset: DEFAULT_FADE_OFFSET,
        })
    }

    pub fn scale() -> Self {
        Self::new(RevealKind::Scale {
            initial_scale: DEFAULT_INITIAL_SCALE,
        })
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Starting offset for fade reveals (ignored by scale reveals)
    pub fn offset(mut self, offset: f32) -> Self {
        if let RevealKind::Fade { offset: o } = &mut self.kind {
            *o = offset;
        }
        self
    }

    /// Starting scale for scale reveals (ignored by fade reveals)
    pub fn initial_scale(mut self, scale: f32) -> Self {
        if let RevealKind::Scale { initial_scale } = &mut self.kind {
            *initial_scale = scale;
        }
        self
    }

    /// Replace the category default descriptor entirely
    pub fn transition(mut self, descriptor: TransitionDescriptor) -> Self {
        self.transition = Some(descriptor);
        self
    }

    pub fn trigger(mut self, trigger: ViewportTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Bind the element whose intersection drives this reveal
    pub fn attach(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    /// Connect to a scheduler and preference gate
    pub fn bind(mut self, scheduler: SchedulerHandle, preference: MotionPreference) -> Self {
        self.scheduler = scheduler;
        self.preference = preference;
        self
    }

    pub fn kind(&self) -> RevealKind {
        self.kind
    }

    pub fn element(&self) -> Option<ElementId> {
        self.element
    }

    /// Descriptor used when the reveal fires, before the reduced-motion gate
    pub fn descriptor(&self) -> TransitionDescriptor {
        let mut desc = self
            .transition
            .unwrap_or_else(|| PRESETS.for_category(MotionCategory::ViewportReveal));
        if let Some(duration) = self.duration_ms {
            desc = desc.with_duration(duration);
        }
        if let Some(delay) = self.delay_ms {
            desc = desc.with_delay(delay);
        }
        if let Some(stagger) = self.stagger_ms {
            desc = desc.with_stagger(stagger);
        }
        desc
    }

    /// Visual state before the reveal fires
    pub fn hidden_state(&self) -> VisualProps {
        match self.kind {
            RevealKind::Fade { offset } => VisualProps::IDENTITY
                .with_opacity(0.0)
                .with_translate(0.0, offset),
            RevealKind::Scale { initial_scale } => VisualProps::IDENTITY
                .with_opacity(0.0)
                .with_scale(initial_scale),
        }
    }

    /// Current visual state
    pub fn visual(&self) -> VisualProps {
        match &self.state {
            RevealState::Hidden => self.hidden_state(),
            RevealState::Revealing(progress) => self
                .hidden_state()
                .lerp(&VisualProps::IDENTITY, progress.get()),
        }
    }

    pub fn has_triggered(&self) -> bool {
        matches!(self.state, RevealState::Revealing(_))
    }

    /// Check whether the reveal has fired and reached its final state
    pub fn is_complete(&self) -> bool {
        match &self.state {
            RevealState::Hidden => false,
            RevealState::Revealing(progress) => progress.is_finished(),
        }
    }

    /// Check the attached element against the trigger zone
    ///
    /// Returns true if this call fired the reveal. Without an attached (or a
    /// still mounted) element this does nothing.
    pub fn observe(&mut self, host: &dyn LayoutHost) -> bool {
        if self.has_triggered() {
            return false;
        }
        let Some(element) = self.element else {
            return false;
        };
        let Some(bounds) = host.element_bounds(element) else {
            tracing::debug!(?element, "reveal target not mounted, skipping");
            return false;
        };
        let visible = self.trigger.is_triggered(bounds, &host.viewport());
        self.on_intersection(visible)
    }

    /// Feed an intersection change from an external observer
    ///
    /// Returns true if this call fired the reveal.
    pub fn on_intersection(&mut self, intersecting: bool) -> bool {
        if !intersecting || self.has_triggered() {
            return false;
        }

        let descriptor = self.preference.resolve(self.descriptor());
        let offset_ms = descriptor.stagger_offset(self.stagger_rank);
        tracing::debug!(
            kind = ?self.kind,
            element = ?self.element,
            instant = descriptor.is_instant(),
            "reveal triggered"
        );
        self.state =
            RevealState::Revealing(AnimatedProgress::start(&self.scheduler, &descriptor, offset_ms));
        true
    }
}

impl std::fmt::Debug for Reveal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reveal")
            .field("kind", &self.kind)
            .field("element", &self.element)
            .field("triggered", &self.has_triggered())
            .finish()
    }
}

/// A list of reveals sharing one stagger
///
/// Items that become visible together start one after another; an item
/// that scrolls in on its own still waits its stagger slot.
#[derive(Debug)]
pub struct RevealGroup {
    stagger_ms: u32,
    order: StaggerOrder,
    items: Vec<Reveal>,
}

impl RevealGroup {
    /// Group whose items start `stagger_ms` apart
    pub fn new(stagger_ms: u32) -> Self {
        Self {
            stagger_ms,
            order: StaggerOrder::default(),
            items: Vec::new(),
        }
    }

    pub fn order(mut self, order: StaggerOrder) -> Self {
        self.order = order;
        self.restagger();
        self
    }

    pub fn push(&mut self, reveal: Reveal) {
        self.items.push(reveal);
        self.restagger();
    }

    pub fn items(&self) -> &[Reveal] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Observe every item; returns how many fired on this call
    pub fn observe(&mut self, host: &dyn LayoutHost) -> usize {
        self.items
            .iter_mut()
            .map(|reveal| reveal.observe(host))
            .filter(|fired| *fired)
            .count()
    }

    /// Visual state of each item, in insertion order
    pub fn visuals(&self) -> impl Iterator<Item = VisualProps> + '_ {
        self.items.iter().map(Reveal::visual)
    }

    fn restagger(&mut self) {
        let count = self.items.len();
        for (index, reveal) in self.items.iter_mut().enumerate() {
            reveal.stagger_ms = Some(self.stagger_ms);
            reveal.stagger_rank = self.order.rank(index, count);
        }
    }
}
