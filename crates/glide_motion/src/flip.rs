//! FLIP layout transitions
//!
//! First, Last, Invert, Play:
//!
//! 1. **First**: [`Flip::capture_state`] records where the targets are on
//!    screen, synchronously, before the layout-affecting state change.
//! 2. **Last**: the caller mutates layout.
//! 3. **Invert**: [`Flip::animate_from`] reads the new layout and computes
//!    the transform that puts each target back where it was.
//! 4. **Play**: the transform animates to identity.
//!
//! Scale uses a top-left origin, so the inverted translation is simply
//! `first - last`.
//!
//! A [`FlipState`] is a move-once token: it is not `Clone` and
//! `animate_from` consumes it, so one capture can never drive two
//! animations. Targets that were removed, or never existed, are skipped.

use glide_animation::{
    AnimatedProgress, Easing, Interpolate, Preset, SchedulerHandle, TransitionDescriptor, PRESETS,
};
use glide_core::{ElementId, LayoutHost, Rect, VisualProps};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::preference::MotionPreference;

/// Named defaults every [`FlipOptions`] is merged over
pub const FLIP_DEFAULTS: TransitionDescriptor = PRESETS.get(Preset::Flip);

/// Caller overrides for one FLIP animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipOptions {
    pub duration_ms: Option<u32>,
    pub ease: Option<Easing>,
    pub delay_ms: Option<u32>,
    pub stagger_ms: Option<u32>,
    /// Animate size changes through scale; when false only position moves
    pub scale: bool,
    /// Deltas smaller than this many pixels count as unchanged
    pub threshold: f32,
}

impl FlipOptions {
    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn stagger(mut self, stagger_ms: u32) -> Self {
        self.stagger_ms = Some(stagger_ms);
        self
    }

    pub fn scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// These options merged over [`FLIP_DEFAULTS`]
    pub fn descriptor(&self) -> TransitionDescriptor {
        let mut desc = FLIP_DEFAULTS;
        if let Some(duration) = self.duration_ms {
            desc = desc.with_duration(duration);
        }
        if let Some(ease) = self.ease {
            desc = desc.with_easing(ease);
        }
        if let Some(delay) = self.delay_ms {
            desc = desc.with_delay(delay);
        }
        if let Some(stagger) = self.stagger_ms {
            desc = desc.with_stagger(stagger);
        }
        desc
    }
}

impl Default for FlipOptions {
    fn default() -> Self {
        Self {
            duration_ms: None,
            ease: None,
            delay_ms: None,
            stagger_ms: None,
            scale: true,
            threshold: 0.5,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Capture {
    element: ElementId,
    /// On-screen box at capture time
    rect: Rect,
    opacity: f32,
}

/// Pre-mutation geometry for a set of targets
#[derive(Debug)]
pub struct FlipState {
    captures: SmallVec<[Capture; 8]>,
}

impl FlipState {
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.captures.iter().any(|c| c.element == element)
    }
}

/// The FLIP hook handed to page code
#[derive(Clone, Debug)]
pub struct Flip {
    scheduler: SchedulerHandle,
    preference: MotionPreference,
}

impl Flip {
    pub fn new(scheduler: SchedulerHandle, preference: MotionPreference) -> Self {
        Self {
            scheduler,
            preference,
        }
    }

    /// Record the current layout of `targets`
    ///
    /// Unmounted targets are left out of the capture.
    pub fn capture_state(
        &self,
        host: &dyn LayoutHost,
        targets: impl IntoIterator<Item = ElementId>,
    ) -> FlipState {
        self.capture_with(host, targets, |_| VisualProps::IDENTITY)
    }

    /// Record where `targets` are on screen while `running` is still playing
    ///
    /// Interrupting a layout transition this way continues from the sampled
    /// position instead of jumping to the old layout box.
    pub fn capture_state_during(
        &self,
        host: &dyn LayoutHost,
        targets: impl IntoIterator<Item = ElementId>,
        running: &FlipAnimation,
    ) -> FlipState {
        self.capture_with(host, targets, |el| running.visual(el))
    }

    fn capture_with(
        &self,
        host: &dyn LayoutHost,
        targets: impl IntoIterator<Item = ElementId>,
        visual: impl Fn(ElementId) -> VisualProps,
    ) -> FlipState {
        let mut captures = SmallVec::new();
        for element in targets {
            match host.element_bounds(element) {
                Some(layout) => {
                    let props = visual(element);
                    captures.push(Capture {
                        element,
                        rect: props.apply_to(layout),
                        opacity: props.opacity,
                    });
                }
                None => tracing::debug!(?element, "flip capture: target not mounted, skipping"),
            }
        }
        tracing::trace!(count = captures.len(), "flip state captured");
        FlipState { captures }
    }

    /// Animate every captured target from its old box to its new layout
    ///
    /// Must be called after the layout mutation. Targets whose geometry did
    /// not change produce no animation; targets that are gone are skipped.
    pub fn animate_from(
        &self,
        host: &dyn LayoutHost,
        state: FlipState,
        options: FlipOptions,
    ) -> FlipAnimation {
        let reduced = self.preference.reduced_motion();
        let descriptor = if reduced {
            options.descriptor().reduced()
        } else {
            options.descriptor()
        };

        let mut targets = FxHashMap::default();
        for capture in state.captures {
            let Some(last) = host.element_bounds(capture.element) else {
                tracing::debug!(
                    element = ?capture.element,
                    "flip: target removed after capture, skipping"
                );
                continue;
            };

            let Some(from) = invert(capture.rect, last, capture.opacity, &options) else {
                continue;
            };

            // Stagger counts only targets that actually move
            let stagger = descriptor.stagger_offset(targets.len());
            let progress = AnimatedProgress::start(&self.scheduler, &descriptor, stagger);
            targets.insert(capture.element, FlipTarget { from, progress });
        }

        tracing::debug!(targets = targets.len(), reduced, "flip animation started");
        FlipAnimation { targets }
    }
}

/// Transform that makes `last` look like `first`, or `None` when unchanged
fn invert(first: Rect, last: Rect, opacity: f32, options: &FlipOptions) -> Option<VisualProps> {
    let dx = first.x - last.x;
    let dy = first.y - last.y;
    let dw = first.width - last.width;
    let dh = first.height - last.height;
    let threshold = options.threshold.max(0.0);

    let moved = dx.abs() > threshold || dy.abs() > threshold;
    let resized = options.scale && (dw.abs() > threshold || dh.abs() > threshold);
    let faded = (opacity - 1.0).abs() > 1e-4;
    if !moved && !resized && !faded {
        return None;
    }

    let scale_axis = |first: f32, last: f32| {
        if resized && last > f32::EPSILON {
            first / last
        } else {
            1.0
        }
    };

    Some(
        VisualProps::IDENTITY
            .with_opacity(opacity)
            .with_translate(dx, dy)
            .with_scale_xy(
                scale_axis(first.width, last.width),
                scale_axis(first.height, last.height),
            ),
    )
}

struct FlipTarget {
    from: VisualProps,
    progress: AnimatedProgress,
}

/// A running FLIP transition
///
/// Dropping it cancels every target's animation; targets then render at
/// their new layout.
pub struct FlipAnimation {
    targets: FxHashMap<ElementId, FlipTarget>,
}

impl FlipAnimation {
    /// Current visual props for `element` (identity if it is not animating)
    pub fn visual(&self, element: ElementId) -> VisualProps {
        self.targets
            .get(&element)
            .map(|t| t.from.lerp(&VisualProps::IDENTITY, t.progress.get()))
            .unwrap_or(VisualProps::IDENTITY)
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.targets.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True when no target needed to move
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        self.targets.values().any(|t| t.progress.is_animating())
    }
}

impl std::fmt::Debug for FlipAnimation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipAnimation")
            .field("targets", &self.targets.len())
            .field("animating", &self.is_animating())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::ReducedMotionOverride;
    use glide_animation::AnimationScheduler;
    use glide_core::MemoryHost;

    fn flip(scheduler: &AnimationScheduler) -> Flip {
        Flip::new(scheduler.handle(), MotionPreference::detached())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(FLIP_DEFAULTS.duration_ms(), Some(600));
        assert_eq!(FLIP_DEFAULTS.stagger_ms, 0);
        assert_eq!(
            FlipOptions::default().descriptor().motion,
            glide_animation::Motion::Tween {
                easing: Easing::EaseInOutCubic,
                duration_ms: 600
            }
        );
        assert_eq!(Easing::EaseInOutCubic.to_string(), "power2.inOut");
    }

    #[test]
    fn test_options_merge_over_defaults() {
        let desc = FlipOptions::default().duration(200).stagger(30).descriptor();
        assert_eq!(desc.duration_ms(), Some(200));
        assert_eq!(desc.stagger_ms, 30);
        assert_eq!(
            desc.motion,
            glide_animation::Motion::Tween {
                easing: Easing::EaseInOutCubic,
                duration_ms: 200
            }
        );
    }

    #[test]
    fn test_unchanged_layout_is_identity() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let a = host.insert(Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = host.insert(Rect::new(0.0, 60.0, 100.0, 50.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [a, b]);
        assert_eq!(state.len(), 2);
        let anim = flip.animate_from(&host, state, FlipOptions::default());

        assert!(anim.is_empty());
        assert!(!anim.is_animating());
        assert!(anim.visual(a).is_identity());
        assert_eq!(scheduler.tween_count(), 0);
    }

    #[test]
    fn test_reorder_inverts_then_plays() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let a = host.insert(Rect::new(0.0, 0.0, 100.0, 50.0));
        let b = host.insert(Rect::new(0.0, 60.0, 100.0, 50.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [a, b]);
        // Swap
        host.set_bounds(a, Rect::new(0.0, 60.0, 100.0, 50.0));
        host.set_bounds(b, Rect::new(0.0, 0.0, 100.0, 50.0));
        let anim = flip.animate_from(&host, state, FlipOptions::default().ease(Easing::Linear));

        assert_eq!(anim.len(), 2);
        let start = anim.visual(a);
        assert_eq!(start.translate_y, -60.0);
        // Rendered where it was captured
        let on_screen = start.apply_to(host.element_bounds(a).unwrap());
        assert_eq!(on_screen.y, 0.0);

        scheduler.tick_ms(300.0);
        assert!((anim.visual(a).translate_y + 30.0).abs() < 1e-3);
        assert!((anim.visual(b).translate_y - 30.0).abs() < 1e-3);

        scheduler.tick_ms(300.0);
        assert!(!anim.is_animating());
        assert!(anim.visual(a).is_identity());
    }

    #[test]
    fn test_resize_uses_scale() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let card = host.insert(Rect::new(10.0, 10.0, 100.0, 100.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [card]);
        host.set_bounds(card, Rect::new(10.0, 10.0, 200.0, 50.0));
        let anim = flip.animate_from(&host, state, FlipOptions::default());

        let start = anim.visual(card);
        assert!((start.scale_x - 0.5).abs() < 1e-6);
        assert!((start.scale_y - 2.0).abs() < 1e-6);

        let state = flip.capture_state(&host, [card]);
        host.set_bounds(card, Rect::new(10.0, 10.0, 300.0, 50.0));
        let no_scale = flip.animate_from(&host, state, FlipOptions::default().scale(false));
        assert!(no_scale.is_empty());
    }

    #[test]
    fn test_sub_threshold_moves_are_ignored() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let el = host.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [el]);
        host.set_bounds(el, Rect::new(0.3, 0.2, 100.0, 100.0));
        assert!(flip
            .animate_from(&host, state, FlipOptions::default())
            .is_empty());
    }

    #[test]
    fn test_removed_and_unknown_targets_are_skipped() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let kept = host.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
        let removed = host.insert(Rect::new(0.0, 200.0, 100.0, 100.0));
        let never = {
            let id = host.insert(Rect::ZERO);
            host.remove(id);
            id
        };
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [kept, removed, never]);
        assert_eq!(state.len(), 2);
        assert!(!state.contains(never));

        host.remove(removed);
        host.set_bounds(kept, Rect::new(0.0, 100.0, 100.0, 100.0));
        let anim = flip.animate_from(&host, state, FlipOptions::default());

        assert_eq!(anim.len(), 1);
        assert!(anim.contains(kept));
        assert!(anim.visual(removed).is_identity());
    }

    #[test]
    fn test_stagger_offsets_targets() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let a = host.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = host.insert(Rect::new(0.0, 100.0, 100.0, 100.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [a, b]);
        host.set_bounds(a, Rect::new(200.0, 0.0, 100.0, 100.0));
        host.set_bounds(b, Rect::new(200.0, 100.0, 100.0, 100.0));
        let anim = flip.animate_from(
            &host,
            state,
            FlipOptions::default().duration(100).stagger(100).ease(Easing::Linear),
        );

        scheduler.tick_ms(100.0);
        assert!(anim.visual(a).is_identity());
        assert_eq!(anim.visual(b).translate_x, -200.0);
    }

    #[test]
    fn test_interrupted_capture_continues_from_screen() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let el = host.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
        let flip = flip(&scheduler);

        let state = flip.capture_state(&host, [el]);
        host.set_bounds(el, Rect::new(100.0, 0.0, 100.0, 100.0));
        let first = flip.animate_from(&host, state, FlipOptions::default().ease(Easing::Linear));
        scheduler.tick_ms(300.0);

        // Halfway: on screen at x = 50
        let state = flip.capture_state_during(&host, [el], &first);
        drop(first);
        host.set_bounds(el, Rect::new(0.0, 0.0, 100.0, 100.0));
        let second = flip.animate_from(&host, state, FlipOptions::default());
        assert!((second.visual(el).translate_x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_reduced_motion_lands_immediately() {
        let scheduler = AnimationScheduler::new();
        let mut host = MemoryHost::new(800.0, 600.0);
        let el = host.insert(Rect::new(0.0, 0.0, 100.0, 100.0));
        let flip = Flip::new(
            scheduler.handle(),
            MotionPreference::detached().with_override(ReducedMotionOverride::Always),
        );

        let state = flip.capture_state(&host, [el]);
        host.set_bounds(el, Rect::new(0.0, 300.0, 100.0, 100.0));
        let anim = flip.animate_from(&host, state, FlipOptions::default().stagger(50));

        assert!(!anim.is_animating());
        assert!(anim.visual(el).is_identity());
    }
}
