//! Scheduler-backed progress
//!
//! [`AnimatedProgress`] turns a [`TransitionDescriptor`] into a value that
//! runs from 0.0 to 1.0 on the shared scheduler. Producers sample it each
//! frame and blend their own start/end states with it.
//!
//! Ownership is the cancellation mechanism: dropping an `AnimatedProgress`
//! removes its scheduler entry on the spot, so a superseded animation never
//! lingers, never queues and never reports again.

use crate::presets::{Motion, TransitionDescriptor};
use crate::scheduler::{SchedulerHandle, SpringId, TweenId};
use crate::spring::Spring;
use crate::tween::Tween;

enum Driver {
    Tween(TweenId),
    Spring(SpringId),
    /// No scheduler entry: the scheduler was gone at start, or the caller
    /// asked for the final state directly
    Complete,
}

/// Progress from 0.0 to 1.0 driven by the animation scheduler
pub struct AnimatedProgress {
    handle: SchedulerHandle,
    driver: Driver,
}

impl AnimatedProgress {
    /// Start progress using a descriptor, delayed by an extra `offset_ms`
    ///
    /// The offset is how callers apply per-target stagger.
    pub fn start(handle: &SchedulerHandle, descriptor: &TransitionDescriptor, offset_ms: u32) -> Self {
        let delay_ms = descriptor.delay_ms.saturating_add(offset_ms);

        let driver = match descriptor.motion {
            Motion::Tween {
                easing,
                duration_ms,
            } => handle
                .register_tween(Tween::new(duration_ms, easing).delay(delay_ms))
                .map(Driver::Tween),
            Motion::Spring(config) => {
                let mut spring = Spring::new(config, 0.0);
                spring.set_target(1.0);
                handle.register_spring(spring, delay_ms).map(Driver::Spring)
            }
        };

        let driver = driver.unwrap_or_else(|| {
            tracing::debug!("AnimatedProgress: scheduler unavailable, completing immediately");
            Driver::Complete
        });

        Self {
            handle: handle.clone(),
            driver,
        }
    }

    /// Progress that is already at its final value
    pub fn complete() -> Self {
        Self {
            handle: SchedulerHandle::detached(),
            driver: Driver::Complete,
        }
    }

    /// Current progress
    ///
    /// Springs may briefly overshoot 1.0. A lost scheduler entry reads as
    /// complete so the target lands in its final state rather than sticking
    /// halfway.
    pub fn get(&self) -> f32 {
        match self.driver {
            Driver::Tween(id) => self.handle.tween_value(id).unwrap_or(1.0),
            Driver::Spring(id) => self.handle.spring_value(id).unwrap_or(1.0),
            Driver::Complete => 1.0,
        }
    }

    /// Check whether the animation has finished
    pub fn is_finished(&self) -> bool {
        match self.driver {
            Driver::Tween(id) => self.handle.is_tween_finished(id),
            Driver::Spring(id) => self.handle.is_spring_settled(id),
            Driver::Complete => true,
        }
    }

    pub fn is_animating(&self) -> bool {
        !self.is_finished()
    }
}

impl Drop for AnimatedProgress {
    fn drop(&mut self) {
        match self.driver {
            Driver::Tween(id) => self.handle.remove_tween(id),
            Driver::Spring(id) => self.handle.remove_spring(id),
            Driver::Complete => {}
        }
    }
}

impl std::fmt::Debug for AnimatedProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedProgress")
            .field("value", &self.get())
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::presets::{Preset, PRESETS};
    use crate::scheduler::AnimationScheduler;

    #[test]
    fn test_tween_progress() {
        let scheduler = AnimationScheduler::new();
        let desc = TransitionDescriptor::tween(Easing::Linear, 200);
        let progress = AnimatedProgress::start(&scheduler.handle(), &desc, 0);

        assert_eq!(progress.get(), 0.0);
        scheduler.tick_ms(100.0);
        assert!((progress.get() - 0.5).abs() < 1e-6);
        scheduler.tick_ms(100.0);
        assert!(progress.is_finished());
    }

    #[test]
    fn test_offset_adds_to_delay() {
        let scheduler = AnimationScheduler::new();
        let desc = TransitionDescriptor::tween(Easing::Linear, 100).with_delay(50);
        let progress = AnimatedProgress::start(&scheduler.handle(), &desc, 50);

        scheduler.tick_ms(100.0);
        assert_eq!(progress.get(), 0.0);
        scheduler.tick_ms(50.0);
        assert!((progress.get() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_spring_progress_settles() {
        let scheduler = AnimationScheduler::new();
        let desc = PRESETS.get(Preset::Spring);
        let progress = AnimatedProgress::start(&scheduler.handle(), &desc, 0);

        for _ in 0..180 {
            scheduler.tick_ms(1000.0 / 60.0);
        }
        assert!(progress.is_finished());
        assert_eq!(progress.get(), 1.0);
    }

    #[test]
    fn test_reduced_descriptor_finishes_without_ticks() {
        let scheduler = AnimationScheduler::new();
        let desc = PRESETS.get(Preset::StandardEase).reduced();
        let progress = AnimatedProgress::start(&scheduler.handle(), &desc, 0);

        assert!(progress.is_finished());
        assert_eq!(progress.get(), 1.0);
    }

    #[test]
    fn test_drop_cancels() {
        let scheduler = AnimationScheduler::new();
        let desc = TransitionDescriptor::tween(Easing::Linear, 1000);
        let progress = AnimatedProgress::start(&scheduler.handle(), &desc, 0);
        assert_eq!(scheduler.tween_count(), 1);

        drop(progress);
        assert_eq!(scheduler.tween_count(), 0);
        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_detached_scheduler_completes() {
        let desc = TransitionDescriptor::tween(Easing::Linear, 1000);
        let progress = AnimatedProgress::start(&SchedulerHandle::detached(), &desc, 0);
        assert!(progress.is_finished());
        assert_eq!(progress.get(), 1.0);
    }
}
