//! Imperative timeline engine binding
//!
//! Holds the process-wide engine defaults and every scroll-linked trigger.
//!
//! - [`TimelineEngine::configure`] applies the defaults once. Later calls
//!   (a hot reload, a second shell mounted on the same engine) are reported
//!   as [`ConfigureOutcome::AlreadyConfigured`] and change nothing.
//! - [`TimelineEngine::mount`] installs the history-navigation listener. The
//!   returned [`EngineMount`] guards it; the listener exists while at least
//!   one guard is alive and is never installed twice.
//! - Scroll triggers cache their start/end scroll offsets when measured.
//!   Scroll events only re-evaluate progress against the cached range; a
//!   [`refresh`](TimelineEngine::refresh) re-measures, and history
//!   navigation forces one so restored scroll positions never map through
//!   stale coordinates.
//! - An unscrubbed trigger ([`Scrub::Off`]) ignores the scroll position once
//!   it has started: the first time its element enters the range it plays
//!   0.0 to 1.0 on its own, timed by the configured default ease and
//!   duration.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glide_animation::{Easing, Motion, Preset, TransitionDescriptor, Tween, PRESETS};
use glide_core::{Axis, ElementId, LayoutHost, Rect, Viewport};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered scroll trigger
    pub struct TriggerId;
}

/// Process-wide defaults for imperative animations
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    /// Default easing curve
    pub ease: Easing,
    /// Default duration
    pub duration_ms: u32,
    /// Composite transforms on the GPU
    pub force_3d: bool,
    /// Draw trigger start/end markers
    pub debug_markers: bool,
    /// Re-measure scroll triggers on history navigation
    pub refresh_on_history: bool,
}

impl EngineDefaults {
    /// Descriptor for an imperative tween that uses these defaults
    pub fn descriptor(&self) -> TransitionDescriptor {
        TransitionDescriptor::tween(self.ease, self.duration_ms)
    }
}

impl Default for EngineDefaults {
    /// Timing comes from the shared preset table so both paradigms agree
    fn default() -> Self {
        let standard = PRESETS.get(Preset::StandardEase);
        let (ease, duration_ms) = match standard.motion {
            Motion::Tween {
                easing,
                duration_ms,
            } => (easing, duration_ms),
            Motion::Spring(_) => (Easing::EaseOut, 300),
        };
        Self {
            ease,
            duration_ms,
            force_3d: true,
            debug_markers: false,
            refresh_on_history: true,
        }
    }
}

/// Result of [`TimelineEngine::configure`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigureOutcome {
    Applied,
    AlreadyConfigured,
}

/// How trigger progress follows the scroll position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scrub {
    /// Progress tracks scroll exactly
    #[default]
    Continuous,
    /// Progress eases toward scroll with the given catch-up time in seconds
    Smooth(f32),
    /// Not tied to scroll; plays once with the engine defaults after the
    /// element first enters the range
    Off,
}

impl Scrub {
    /// `Smooth` with a catch-up time that is not a positive finite number
    /// tracks scroll exactly
    pub fn sanitized(self) -> Self {
        match self {
            Scrub::Smooth(seconds) if !(seconds.is_finite() && seconds > 0.0) => {
                tracing::debug!(seconds, "invalid scrub smoothing, tracking scroll exactly");
                Scrub::Continuous
            }
            scrub => scrub,
        }
    }
}

/// `true` tracks scroll exactly, `false` plays unscrubbed
impl From<bool> for Scrub {
    fn from(scrub: bool) -> Self {
        if scrub {
            Scrub::Continuous
        } else {
            Scrub::Off
        }
    }
}

/// Smoothing catch-up time in seconds
impl From<f32> for Scrub {
    fn from(seconds: f32) -> Self {
        Scrub::Smooth(seconds).sanitized()
    }
}

/// Cached scroll offsets between which a trigger runs from 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerRange {
    pub start: f32,
    pub end: f32,
}

impl TriggerRange {
    /// Range from "element's leading edge at the viewport's trailing edge" to
    /// "element's trailing edge at the viewport's leading edge"
    pub fn measure(bounds: Rect, viewport: &Viewport, axis: Axis) -> Self {
        let (lead, trail) = match axis {
            Axis::Vertical => (bounds.y, bounds.bottom()),
            Axis::Horizontal => (bounds.x, bounds.right()),
        };
        Self {
            start: lead - viewport.extent(axis),
            end: trail,
        }
    }

    pub fn progress(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= f32::EPSILON {
            return if scroll >= self.end { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

struct ScrollTrigger {
    element: ElementId,
    axis: Axis,
    scrub: Scrub,
    /// `None` while the element is not mounted
    range: Option<TriggerRange>,
    /// Progress implied by the current scroll position
    target: f32,
    /// Progress reported to the binding (lags `target` when smoothed)
    progress: f32,
    /// Playback of an unscrubbed trigger, started on first entry
    playback: Option<Tween>,
}

impl ScrollTrigger {
    fn measure(&mut self, host: &dyn LayoutHost, defaults: &EngineDefaults) {
        let viewport = host.viewport();
        self.range = host
            .element_bounds(self.element)
            .map(|bounds| TriggerRange::measure(bounds, &viewport, self.axis));
        if self.range.is_none() {
            tracing::debug!(element = ?self.element, "scroll trigger element not mounted, holding progress");
        }
        self.update_target(&viewport, defaults);
    }

    fn update_target(&mut self, viewport: &Viewport, defaults: &EngineDefaults) {
        let Some(range) = self.range else {
            return;
        };
        self.target = range.progress(viewport.scroll(self.axis));
        match self.scrub {
            Scrub::Continuous => self.progress = self.target,
            Scrub::Smooth(_) => {}
            Scrub::Off => {
                if self.playback.is_none() && self.target > 0.0 {
                    let tween = Tween::new(defaults.duration_ms, defaults.ease);
                    tracing::debug!(
                        element = ?self.element,
                        ease = %defaults.ease,
                        duration_ms = defaults.duration_ms,
                        "unscrubbed trigger started"
                    );
                    self.progress = tween.value();
                    self.playback = Some(tween);
                }
            }
        }
    }

    /// Returns true while the progress is still moving
    fn advance(&mut self, dt_ms: f32) -> bool {
        match self.scrub {
            Scrub::Continuous => false,
            Scrub::Smooth(seconds) => {
                let delta = self.target - self.progress;
                if delta.abs() < 1e-4 || !(seconds.is_finite() && seconds > 0.0) {
                    self.progress = self.target;
                    return false;
                }
                let alpha = 1.0 - (-(dt_ms / 1000.0) / seconds).exp();
                self.progress += delta * alpha;
                true
            }
            Scrub::Off => {
                let Some(tween) = self.playback.as_mut() else {
                    return false;
                };
                tween.tick(dt_ms);
                self.progress = tween.value();
                tween.is_playing()
            }
        }
    }
}

struct EngineInner {
    defaults: Option<EngineDefaults>,
    triggers: SlotMap<TriggerId, ScrollTrigger>,
    /// Live [`EngineMount`] guards; the history listener exists while > 0
    mounts: usize,
    refreshes: u64,
}

impl EngineInner {
    fn refresh(&mut self, host: &dyn LayoutHost) {
        self.refreshes += 1;
        let defaults = self.defaults.unwrap_or_default();
        for trigger in self.triggers.values_mut() {
            trigger.measure(host, &defaults);
        }
        tracing::debug!(
            triggers = self.triggers.len(),
            refresh = self.refreshes,
            "scroll triggers re-measured"
        );
    }
}

/// The imperative engine binding
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct TimelineEngine {
    inner: Rc<RefCell<EngineInner>>,
}

impl TimelineEngine {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EngineInner {
                defaults: None,
                triggers: SlotMap::with_key(),
                mounts: 0,
                refreshes: 0,
            })),
        }
    }

    /// Apply process-wide defaults, once
    pub fn configure(&self, defaults: EngineDefaults) -> ConfigureOutcome {
        let mut inner = self.inner.borrow_mut();
        if inner.defaults.is_some() {
            tracing::debug!("timeline engine already configured, ignoring");
            return ConfigureOutcome::AlreadyConfigured;
        }

        if defaults.debug_markers {
            tracing::warn!("scroll trigger debug markers are enabled");
        }
        tracing::debug!(
            ease = %defaults.ease,
            duration_ms = defaults.duration_ms,
            force_3d = defaults.force_3d,
            refresh_on_history = defaults.refresh_on_history,
            "timeline engine configured"
        );
        inner.defaults = Some(defaults);
        ConfigureOutcome::Applied
    }

    pub fn is_configured(&self) -> bool {
        self.inner.borrow().defaults.is_some()
    }

    /// Active defaults (the built-in ones until configured)
    pub fn defaults(&self) -> EngineDefaults {
        self.inner.borrow().defaults.unwrap_or_default()
    }

    /// Install the history-navigation listener for one page-level mount
    pub fn mount(&self) -> EngineMount {
        let mut inner = self.inner.borrow_mut();
        inner.mounts += 1;
        if inner.mounts == 1 {
            tracing::debug!("history listener installed");
        } else {
            tracing::trace!(mounts = inner.mounts, "history listener already installed");
        }
        EngineMount {
            engine: Rc::downgrade(&self.inner),
        }
    }

    pub fn has_history_listener(&self) -> bool {
        self.inner.borrow().mounts > 0
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Re-measure every trigger
    pub fn refresh(&self, host: &dyn LayoutHost) {
        self.inner.borrow_mut().refresh(host);
    }

    /// Browser-style history navigation (back/forward) happened
    ///
    /// Returns true if the triggers were re-measured. Nothing happens
    /// without an installed listener or when the configured policy turns
    /// history refreshes off.
    pub fn on_history_navigation(&self, host: &dyn LayoutHost) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.mounts == 0 {
            tracing::trace!("history navigation with no listener installed");
            return false;
        }
        if !inner.defaults.unwrap_or_default().refresh_on_history {
            return false;
        }
        inner.refresh(host);
        true
    }

    /// Re-evaluate trigger progress against the cached ranges
    pub fn on_scroll(&self, host: &dyn LayoutHost) {
        let viewport = host.viewport();
        let mut inner = self.inner.borrow_mut();
        let defaults = inner.defaults.unwrap_or_default();
        for trigger in inner.triggers.values_mut() {
            trigger.update_target(&viewport, &defaults);
        }
    }

    /// Advance smoothed and unscrubbed triggers; returns true if any is
    /// still moving
    pub fn tick_ms(&self, dt_ms: f32) -> bool {
        let dt_ms = dt_ms.max(0.0);
        let mut moving = false;
        for trigger in self.inner.borrow_mut().triggers.values_mut() {
            moving |= trigger.advance(dt_ms);
        }
        moving
    }

    pub fn trigger_count(&self) -> usize {
        self.inner.borrow().triggers.len()
    }

    /// Number of full re-measurements so far
    pub fn refresh_count(&self) -> u64 {
        self.inner.borrow().refreshes
    }
}

impl Default for TimelineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimelineEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("TimelineEngine")
            .field("configured", &inner.defaults.is_some())
            .field("triggers", &inner.triggers.len())
            .field("mounts", &inner.mounts)
            .finish()
    }
}

/// Guard for one page-level mount of the engine
///
/// Dropping the last guard removes the history listener.
#[must_use = "dropping the mount guard removes the history listener"]
pub struct EngineMount {
    engine: Weak<RefCell<EngineInner>>,
}

impl Drop for EngineMount {
    fn drop(&mut self) {
        let Some(inner) = self.engine.upgrade() else {
            return;
        };
        let mut inner = inner.borrow_mut();
        inner.mounts = inner.mounts.saturating_sub(1);
        if inner.mounts == 0 {
            tracing::debug!("history listener removed");
        }
    }
}

impl std::fmt::Debug for EngineMount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineMount").finish_non_exhaustive()
    }
}

/// Weak handle used by scroll bindings
#[derive(Clone)]
pub struct EngineHandle {
    inner: Weak<RefCell<EngineInner>>,
}

impl EngineHandle {
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Register a trigger and measure it immediately
    pub fn register(
        &self,
        element: ElementId,
        axis: Axis,
        scrub: Scrub,
        host: &dyn LayoutHost,
    ) -> Option<TriggerId> {
        let inner = self.inner.upgrade()?;
        let defaults = inner.borrow().defaults.unwrap_or_default();
        let scrub = scrub.sanitized();
        let mut trigger = ScrollTrigger {
            element,
            axis,
            scrub,
            range: None,
            target: 0.0,
            progress: 0.0,
            playback: None,
        };
        trigger.measure(host, &defaults);
        if let Scrub::Smooth(_) = scrub {
            // The first reading is exact even for smoothed triggers
            trigger.progress = trigger.target;
        }

        let id = inner.borrow_mut().triggers.insert(trigger);
        tracing::debug!(?id, ?element, ?axis, ?scrub, "scroll trigger registered");
        Some(id)
    }

    pub fn unregister(&self, id: TriggerId) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.borrow_mut().triggers.remove(id).is_some() {
                tracing::debug!(?id, "scroll trigger released");
            }
        }
    }

    pub fn progress(&self, id: TriggerId) -> Option<f32> {
        let inner = self.inner.upgrade()?;
        let inner = inner.borrow();
        inner.triggers.get(id).map(|t| t.progress)
    }

    pub fn range(&self, id: TriggerId) -> Option<TriggerRange> {
        let inner = self.inner.upgrade()?;
        let inner = inner.borrow();
        inner.triggers.get(id).and_then(|t| t.range)
    }

    /// Check whether an unscrubbed trigger's playback has started
    pub fn has_started(&self, id: TriggerId) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let inner = inner.borrow();
        inner.triggers.get(id).is_some_and(|t| t.playback.is_some())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_core::MemoryHost;

    fn host_with_element() -> (MemoryHost, ElementId) {
        let mut host = MemoryHost::new(800.0, 600.0);
        let el = host.insert(Rect::new(0.0, 1000.0, 800.0, 400.0));
        (host, el)
    }

    #[test]
    fn test_configure_is_idempotent() {
        let engine = TimelineEngine::new();
        let custom = EngineDefaults {
            duration_ms: 600,
            ease: Easing::EaseOutCubic,
            ..EngineDefaults::default()
        };

        assert_eq!(engine.configure(custom), ConfigureOutcome::Applied);
        assert_eq!(
            engine.configure(EngineDefaults::default()),
            ConfigureOutcome::AlreadyConfigured
        );
        assert_eq!(engine.defaults(), custom);
    }

    #[test]
    fn test_defaults_follow_preset_table() {
        let defaults = EngineDefaults::default();
        assert_eq!(defaults.descriptor(), PRESETS.get(Preset::StandardEase));
        assert!(!defaults.debug_markers);
    }

    #[test]
    fn test_mount_installs_one_listener() {
        let engine = TimelineEngine::new();
        assert!(!engine.has_history_listener());

        let first = engine.mount();
        let second = engine.mount();
        assert!(engine.has_history_listener());

        drop(first);
        assert!(engine.has_history_listener());
        drop(second);
        assert!(!engine.has_history_listener());
    }

    #[test]
    fn test_trigger_range_and_progress() {
        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let id = engine
            .handle()
            .register(el, Axis::Vertical, Scrub::Continuous, &host)
            .unwrap();

        let range = engine.handle().range(id).unwrap();
        assert_eq!(range, TriggerRange { start: 400.0, end: 1400.0 });
        assert_eq!(engine.handle().progress(id), Some(0.0));

        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        assert!((engine.handle().progress(id).unwrap() - 0.5).abs() < 1e-6);

        host.scroll_to(0.0, 5000.0);
        engine.on_scroll(&host);
        assert_eq!(engine.handle().progress(id), Some(1.0));
    }

    #[test]
    fn test_scroll_uses_cached_range_until_refresh() {
        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let _mount = engine.mount();
        let id = engine
            .handle()
            .register(el, Axis::Vertical, Scrub::Continuous, &host)
            .unwrap();

        // Layout shifts the element down by 200px
        host.set_bounds(el, Rect::new(0.0, 1200.0, 800.0, 400.0));
        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        assert!((engine.handle().progress(id).unwrap() - 0.5).abs() < 1e-6);

        assert!(engine.on_history_navigation(&host));
        assert!((engine.handle().progress(id).unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(engine.refresh_count(), 1);
    }

    #[test]
    fn test_history_refresh_needs_listener_and_policy() {
        let (host, _) = host_with_element();
        let engine = TimelineEngine::new();
        assert!(!engine.on_history_navigation(&host));

        engine.configure(EngineDefaults {
            refresh_on_history: false,
            ..EngineDefaults::default()
        });
        let _mount = engine.mount();
        assert!(!engine.on_history_navigation(&host));
        assert_eq!(engine.refresh_count(), 0);
    }

    #[test]
    fn test_smooth_scrub_catches_up() {
        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let id = engine
            .handle()
            .register(el, Axis::Vertical, Scrub::Smooth(0.1), &host)
            .unwrap();

        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        assert_eq!(engine.handle().progress(id), Some(0.0));

        assert!(engine.tick_ms(16.0));
        let partial = engine.handle().progress(id).unwrap();
        assert!(partial > 0.0 && partial < 0.5);

        for _ in 0..120 {
            engine.tick_ms(16.0);
        }
        assert!((engine.handle().progress(id).unwrap() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_non_finite_smoothing_tracks_scroll() {
        assert_eq!(Scrub::Smooth(f32::NAN).sanitized(), Scrub::Continuous);
        assert_eq!(Scrub::Smooth(f32::INFINITY).sanitized(), Scrub::Continuous);
        assert_eq!(Scrub::Smooth(-1.0).sanitized(), Scrub::Continuous);
        assert_eq!(Scrub::Smooth(0.2).sanitized(), Scrub::Smooth(0.2));
        assert_eq!(Scrub::from(f32::NAN), Scrub::Continuous);
        assert_eq!(Scrub::from(false), Scrub::Off);

        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let id = engine
            .handle()
            .register(el, Axis::Vertical, Scrub::Smooth(f32::NAN), &host)
            .unwrap();

        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        assert!(!engine.tick_ms(16.0));
        let progress = engine.handle().progress(id).unwrap();
        assert!(!progress.is_nan());
        assert!((progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unscrubbed_trigger_plays_with_configured_defaults() {
        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        engine.configure(EngineDefaults {
            ease: Easing::Linear,
            duration_ms: 50,
            ..EngineDefaults::default()
        });
        let handle = engine.handle();
        let id = handle
            .register(el, Axis::Vertical, Scrub::Off, &host)
            .unwrap();

        // Outside the range nothing starts
        assert!(!engine.tick_ms(100.0));
        assert!(!handle.has_started(id));
        assert_eq!(handle.progress(id), Some(0.0));

        // Barely inside the range: playback runs on its own clock
        host.scroll_to(0.0, 410.0);
        engine.on_scroll(&host);
        assert!(handle.has_started(id));
        assert_eq!(handle.progress(id), Some(0.0));

        assert!(engine.tick_ms(25.0));
        assert!((handle.progress(id).unwrap() - 0.5).abs() < 1e-5);
        assert!(!engine.tick_ms(30.0));
        assert_eq!(handle.progress(id), Some(1.0));

        // Scrolling back out does not rewind it
        host.scroll_to(0.0, 0.0);
        engine.on_scroll(&host);
        engine.refresh(&host);
        assert_eq!(handle.progress(id), Some(1.0));
    }

    #[test]
    fn test_unscrubbed_trigger_uses_builtin_defaults_until_configured() {
        let (mut host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let handle = engine.handle();
        let id = handle
            .register(el, Axis::Vertical, Scrub::Off, &host)
            .unwrap();

        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        // Standard preset is 300ms; 60ms in it is still playing
        assert!(engine.tick_ms(60.0));
        let progress = handle.progress(id).unwrap();
        assert!(progress > 0.0 && progress < 1.0);

        assert!(!engine.tick_ms(300.0));
        assert!((handle.progress(id).unwrap() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_unscrubbed_trigger_inside_range_starts_on_register() {
        let (mut host, el) = host_with_element();
        host.scroll_to(0.0, 900.0);
        let engine = TimelineEngine::new();
        let handle = engine.handle();
        let id = handle
            .register(el, Axis::Vertical, Scrub::Off, &host)
            .unwrap();

        assert!(handle.has_started(id));
        assert_eq!(handle.progress(id), Some(0.0));
        assert!(engine.tick_ms(16.0));
    }

    #[test]
    fn test_unregister_stops_updates() {
        let (host, el) = host_with_element();
        let engine = TimelineEngine::new();
        let handle = engine.handle();
        let id = handle
            .register(el, Axis::Vertical, Scrub::Continuous, &host)
            .unwrap();
        assert_eq!(engine.trigger_count(), 1);

        handle.unregister(id);
        assert_eq!(engine.trigger_count(), 0);
        assert_eq!(handle.progress(id), None);
    }

    #[test]
    fn test_missing_element_holds_zero() {
        let (mut host, el) = host_with_element();
        host.remove(el);
        let engine = TimelineEngine::new();
        let id = engine
            .handle()
            .register(el, Axis::Vertical, Scrub::Continuous, &host)
            .unwrap();

        host.scroll_to(0.0, 900.0);
        engine.on_scroll(&host);
        assert_eq!(engine.handle().progress(id), Some(0.0));
        assert_eq!(engine.handle().range(id), None);
    }
}
