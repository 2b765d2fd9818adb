//! Animation scheduler
//!
//! Holds every in-flight spring and tween and advances them once per frame.
//! Glide runs entirely on the host's event loop: there is no background
//! thread, and "in flight" only means an animation spans several frame
//! callbacks. The host calls [`AnimationScheduler::tick_ms`] from its frame
//! callback with the elapsed time.
//!
//! Producers hold a [`SchedulerHandle`], a weak reference that quietly no-ops
//! once the scheduler is gone. Animations are removed when the wrapper that
//! registered them drops (see [`AnimatedProgress`]), which is how superseded
//! animations are cancelled rather than queued.
//!
//! [`AnimatedProgress`]: crate::AnimatedProgress

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::spring::Spring;
use crate::tween::Tween;

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
    /// Handle to a registered tween
    pub struct TweenId;
}

/// A spring plus the delay that must pass before it starts moving
struct SpringEntry {
    spring: Spring,
    delay_ms: f32,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    springs: SlotMap<SpringId, SpringEntry>,
    tweens: SlotMap<TweenId, Tween>,
    frames: u64,
}

impl SchedulerInner {
    fn has_active(&self) -> bool {
        self.springs
            .values()
            .any(|e| e.delay_ms > 0.0 || !e.spring.is_settled())
            || self.tweens.values().any(|t| t.is_playing())
    }
}

/// The animation scheduler that ticks all active animations
///
/// Owned by the composition root; everything else talks to it through
/// [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                springs: SlotMap::with_key(),
                tweens: SlotMap::with_key(),
                frames: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Advance all animations by `dt_ms` milliseconds
    ///
    /// Returns true if any animation still needs another frame.
    pub fn tick_ms(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        let dt_ms = dt_ms.max(0.0);
        inner.frames += 1;

        for entry in inner.springs.values_mut() {
            let mut remaining = dt_ms;
            if entry.delay_ms > 0.0 {
                let consumed = entry.delay_ms.min(remaining);
                entry.delay_ms -= consumed;
                remaining -= consumed;
            }
            if remaining > 0.0 {
                entry.spring.step(remaining / 1000.0);
            }
        }

        for tween in inner.tweens.values_mut() {
            tween.tick(dt_ms);
        }

        // Finished entries stay registered until their owner drops them, so
        // a finished animation keeps reporting its final value.
        let active = inner.has_active();
        tracing::trace!(
            frame = inner.frames,
            springs = inner.springs.len(),
            tweens = inner.tweens.len(),
            active,
            "animation tick"
        );
        active
    }

    /// Check if any animations are still active
    pub fn has_active_animations(&self) -> bool {
        self.inner.borrow().has_active()
    }

    /// Get the number of registered springs
    pub fn spring_count(&self) -> usize {
        self.inner.borrow().springs.len()
    }

    /// Get the number of registered tweens
    pub fn tween_count(&self) -> usize {
        self.inner.borrow().tweens.len()
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frames
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak handle to the animation scheduler
///
/// Cheap to clone. Every operation is a no-op (returning `None`/`false`) once
/// the scheduler has been dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    /// A handle that was never attached to a scheduler
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    /// Register a spring that starts moving after `delay_ms`
    pub fn register_spring(&self, spring: Spring, delay_ms: u32) -> Option<SpringId> {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().springs.insert(SpringEntry {
            spring,
            delay_ms: delay_ms as f32,
        });
        Some(id)
    }

    pub fn spring_value(&self, id: SpringId) -> Option<f32> {
        let inner = self.inner.upgrade()?;
        let inner = inner.borrow();
        inner.springs.get(id).map(|e| e.spring.value())
    }

    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| {
                let inner = inner.borrow();
                inner
                    .springs
                    .get(id)
                    .map(|e| e.delay_ms <= 0.0 && e.spring.is_settled())
            })
            .unwrap_or(true)
    }

    pub fn remove_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().springs.remove(id);
        }
    }

    pub fn register_tween(&self, tween: Tween) -> Option<TweenId> {
        let inner = self.inner.upgrade()?;
        let id = inner.borrow_mut().tweens.insert(tween);
        Some(id)
    }

    pub fn tween_value(&self, id: TweenId) -> Option<f32> {
        let inner = self.inner.upgrade()?;
        let inner = inner.borrow();
        inner.tweens.get(id).map(|t| t.value())
    }

    pub fn is_tween_finished(&self, id: TweenId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| inner.borrow().tweens.get(id).map(|t| t.is_finished()))
            .unwrap_or(true)
    }

    pub fn remove_tween(&self, id: TweenId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.borrow_mut().tweens.remove(id);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::spring::SpringConfig;

    #[test]
    fn test_scheduler_ticks_tweens() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        let id = handle
            .register_tween(Tween::new(100, Easing::Linear))
            .unwrap();

        assert!(scheduler.tick_ms(50.0));
        assert!((handle.tween_value(id).unwrap() - 0.5).abs() < 1e-6);

        assert!(!scheduler.tick_ms(50.0));
        assert!(handle.is_tween_finished(id));
        assert_eq!(scheduler.frame_count(), 2);
    }

    #[test]
    fn test_spring_delay_is_consumed_first() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        let mut spring = Spring::new(SpringConfig::snappy(), 0.0);
        spring.set_target(1.0);
        let id = handle.register_spring(spring, 100).unwrap();

        scheduler.tick_ms(60.0);
        assert_eq!(handle.spring_value(id), Some(0.0));
        assert!(!handle.is_spring_settled(id));

        scheduler.tick_ms(60.0);
        assert!(handle.spring_value(id).unwrap() > 0.0);
    }

    #[test]
    fn test_removed_entries_stop_counting() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();

        let id = handle
            .register_tween(Tween::new(1000, Easing::Linear))
            .unwrap();
        assert!(scheduler.has_active_animations());

        handle.remove_tween(id);
        assert_eq!(scheduler.tween_count(), 0);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        assert!(!handle.is_alive());
        assert!(handle
            .register_tween(Tween::new(100, Easing::Linear))
            .is_none());
        assert!(handle.is_tween_finished(TweenId::default()));
    }
}
