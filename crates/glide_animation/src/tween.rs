//! Tweens and interpolation
//!
//! A [`Tween`] is eased, fixed-duration progress from 0.0 to 1.0 with an
//! optional start delay. Producers keep their own `from`/`to` values and
//! blend them with [`Interpolate`], so one scheduler entry drives any number
//! of properties.

use glide_core::{Rect, VisualProps};

use crate::easing::Easing;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t
    ///
    /// `t` is not clamped: spring-driven progress may overshoot 1.0.
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Rect {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Rect::new(
            self.x.lerp(&other.x, t),
            self.y.lerp(&other.y, t),
            self.width.lerp(&other.width, t),
            self.height.lerp(&other.height, t),
        )
    }
}

impl Interpolate for VisualProps {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        VisualProps {
            // Overshoot must never push opacity outside its range
            opacity: self.opacity.lerp(&other.opacity, t).clamp(0.0, 1.0),
            translate_x: self.translate_x.lerp(&other.translate_x, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
            scale_x: self.scale_x.lerp(&other.scale_x, t),
            scale_y: self.scale_y.lerp(&other.scale_y, t),
        }
    }
}

/// Eased progress over a fixed duration
#[derive(Clone, Debug)]
pub struct Tween {
    delay_ms: f32,
    duration_ms: f32,
    easing: Easing,
    /// Time since start, including the delay
    elapsed_ms: f32,
}

impl Tween {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms: duration_ms as f32,
            easing,
            elapsed_ms: 0.0,
        }
    }

    /// Set delay before progress starts moving
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms as f32;
        self
    }

    /// Advance by delta time (in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        if self.is_finished() {
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.delay_ms + self.duration_ms);
    }

    /// Check whether the start delay is still running
    pub fn is_delayed(&self) -> bool {
        self.elapsed_ms < self.delay_ms
    }

    /// Linear progress (0.0 to 1.0), ignoring easing
    ///
    /// A zero-length tween is complete as soon as its delay has passed.
    pub fn linear_progress(&self) -> f32 {
        let active = self.elapsed_ms - self.delay_ms;
        if active < 0.0 {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (active / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Eased progress (0.0 to 1.0)
    pub fn value(&self) -> f32 {
        self.easing.apply(self.linear_progress())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.delay_ms + self.duration_ms
    }

    /// Check whether the tween is still moving (or waiting on its delay)
    pub fn is_playing(&self) -> bool {
        !self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_tween() {
        let mut tween = Tween::new(1000, Easing::Linear);
        assert_eq!(tween.value(), 0.0);

        tween.tick(500.0);
        assert!((tween.value() - 0.5).abs() < 1e-6);

        tween.tick(600.0);
        assert_eq!(tween.value(), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn test_delay_holds_progress_at_zero() {
        let mut tween = Tween::new(100, Easing::Linear).delay(200);

        tween.tick(150.0);
        assert!(tween.is_delayed());
        assert_eq!(tween.value(), 0.0);

        tween.tick(100.0);
        assert!(!tween.is_delayed());
        assert!((tween.value() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_is_complete_immediately() {
        let tween = Tween::new(0, Easing::EaseOutCubic);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 1.0);
    }

    #[test]
    fn test_visual_props_lerp_clamps_opacity() {
        let from = VisualProps::IDENTITY.with_opacity(0.0).with_translate(0.0, 8.0);
        let to = VisualProps::IDENTITY;

        let mid = from.lerp(&to, 0.5);
        assert!((mid.opacity - 0.5).abs() < 1e-6);
        assert!((mid.translate_y - 4.0).abs() < 1e-6);

        let overshoot = from.lerp(&to, 1.2);
        assert_eq!(overshoot.opacity, 1.0);
    }

    #[test]
    fn test_rect_lerp() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(100.0, 50.0, 200.0, 0.0);
        assert_eq!(a.lerp(&b, 0.5), Rect::new(50.0, 25.0, 150.0, 50.0));
    }
}
