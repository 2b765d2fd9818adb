//! Glide Animation System
//!
//! Frame-driven animation primitives shared by both motion paradigms.
//!
//! # Features
//!
//! - **Easing**: CSS and power curves plus arbitrary cubic beziers, parseable
//!   from the names used in config files
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Tweens**: delayed, eased, fixed-duration progress
//! - **Scheduler**: single-threaded, ticked by the host's frame callback;
//!   dropping a handle cancels its animation
//! - **Presets**: one immutable table of transition descriptors consulted by
//!   every animation producer

pub mod easing;
pub mod presets;
pub mod progress;
pub mod scheduler;
pub mod spring;
pub mod tween;

pub use easing::{Easing, ParseEasingError};
pub use presets::{
    Motion, MotionCategory, Preset, PresetTable, StaggerOrder, TransitionDescriptor, PRESETS,
};
pub use progress::AnimatedProgress;
pub use scheduler::{AnimationScheduler, SchedulerHandle, SpringId, TweenId};
pub use spring::{Spring, SpringConfig};
pub use tween::{Interpolate, Tween};
