//! Transition descriptors and the shared preset table
//!
//! Both paradigms read durations and curves from one place. Declarative
//! reveals and route transitions look up their category default here, and
//! the imperative engine derives its global defaults from the same table, so
//! there is exactly one copy of every timing constant.
//!
//! ```
//! use glide_animation::{MotionCategory, Preset, PRESETS};
//!
//! let page = PRESETS.for_category(MotionCategory::PageTransition);
//! assert_eq!(page, PRESETS.get(Preset::StandardEase));
//! ```

use crate::easing::Easing;
use crate::spring::SpringConfig;

/// How progress moves from 0.0 to 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    /// Fixed duration with an easing curve
    Tween { easing: Easing, duration_ms: u32 },
    /// Physics-driven; duration emerges from the spring parameters
    Spring(SpringConfig),
}

/// A named bundle of timing parameters
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionDescriptor {
    pub motion: Motion,
    /// Delay before the first (or only) target starts
    pub delay_ms: u32,
    /// Extra delay added per target index when animating several targets
    pub stagger_ms: u32,
}

impl TransitionDescriptor {
    pub const fn tween(easing: Easing, duration_ms: u32) -> Self {
        Self {
            motion: Motion::Tween {
                easing,
                duration_ms,
            },
            delay_ms: 0,
            stagger_ms: 0,
        }
    }

    pub const fn spring(config: SpringConfig) -> Self {
        Self {
            motion: Motion::Spring(config),
            delay_ms: 0,
            stagger_ms: 0,
        }
    }

    pub const fn with_delay(self, delay_ms: u32) -> Self {
        Self { delay_ms, ..self }
    }

    pub const fn with_stagger(self, stagger_ms: u32) -> Self {
        Self { stagger_ms, ..self }
    }

    /// Override the duration
    ///
    /// A spring has no duration, so overriding one turns it into an
    /// `ease-out` tween of the requested length.
    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        let easing = match self.motion {
            Motion::Tween { easing, .. } => easing,
            Motion::Spring(_) => Easing::EaseOut,
        };
        self.motion = Motion::Tween {
            easing,
            duration_ms,
        };
        self
    }

    /// Override the easing curve, keeping the duration
    ///
    /// Springs keep their physics; there is no curve to replace.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        if let Motion::Tween { duration_ms, .. } = self.motion {
            self.motion = Motion::Tween {
                easing,
                duration_ms,
            };
        }
        self
    }

    /// Duration for tweens; `None` for springs
    pub fn duration_ms(&self) -> Option<u32> {
        match self.motion {
            Motion::Tween { duration_ms, .. } => Some(duration_ms),
            Motion::Spring(_) => None,
        }
    }

    /// Stagger part of the start delay for the target at `rank`
    pub fn stagger_offset(&self, rank: usize) -> u32 {
        self.stagger_ms.saturating_mul(rank as u32)
    }

    /// Start delay for the target at `rank`
    pub fn delay_for(&self, rank: usize) -> u32 {
        self.delay_ms.saturating_add(self.stagger_offset(rank))
    }

    /// The reduced-motion form of this descriptor
    ///
    /// A zero-length tween with no delay or stagger: the target still goes
    /// through a transition to its final state, it just completes on the
    /// first sample, so layout never sees an intermediate frame.
    pub fn reduced(&self) -> Self {
        Self::tween(Easing::Linear, 0)
    }

    /// Check whether this descriptor finishes without any visible frames
    pub fn is_instant(&self) -> bool {
        self.delay_ms == 0 && self.duration_ms() == Some(0)
    }
}

/// Which target of a staggered set starts first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StaggerOrder {
    #[default]
    FirstToLast,
    LastToFirst,
    /// The middle target first, spreading toward both ends
    CenterOut,
}

impl StaggerOrder {
    /// Slot of the target at `index` among `count`, 0 starting first
    pub fn rank(self, index: usize, count: usize) -> usize {
        match self {
            StaggerOrder::FirstToLast => index,
            StaggerOrder::LastToFirst => count.saturating_sub(index + 1),
            StaggerOrder::CenterOut => index.abs_diff(count / 2),
        }
    }
}

/// Named presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Physics spring for playful, interruptible motion
    Spring,
    /// Short, strongly decelerating ease (viewport reveals)
    FastEase,
    /// Balanced ease (page transitions, imperative defaults)
    StandardEase,
    /// Layout transitions
    Flip,
}

/// What an animation is for; each category has exactly one default preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionCategory {
    PageTransition,
    ViewportReveal,
    Layout,
}

impl MotionCategory {
    pub const fn default_preset(self) -> Preset {
        match self {
            MotionCategory::PageTransition => Preset::StandardEase,
            MotionCategory::ViewportReveal => Preset::FastEase,
            MotionCategory::Layout => Preset::Flip,
        }
    }
}

/// Immutable table of preset descriptors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PresetTable {
    spring: TransitionDescriptor,
    fast_ease: TransitionDescriptor,
    standard_ease: TransitionDescriptor,
    flip: TransitionDescriptor,
}

impl PresetTable {
    const fn new() -> Self {
        Self {
            spring: TransitionDescriptor::spring(SpringConfig::snappy()),
            fast_ease: TransitionDescriptor::tween(Easing::CubicBezier(0.22, 1.0, 0.36, 1.0), 400),
            standard_ease: TransitionDescriptor::tween(Easing::CubicBezier(0.4, 0.0, 0.2, 1.0), 300),
            flip: TransitionDescriptor::tween(Easing::EaseInOutCubic, 600),
        }
    }

    pub const fn get(&self, preset: Preset) -> TransitionDescriptor {
        match preset {
            Preset::Spring => self.spring,
            Preset::FastEase => self.fast_ease,
            Preset::StandardEase => self.standard_ease,
            Preset::Flip => self.flip,
        }
    }

    pub const fn for_category(&self, category: MotionCategory) -> TransitionDescriptor {
        self.get(category.default_preset())
    }
}

/// The process-wide preset table
///
/// A `const` so other constants (such as layout-transition defaults) can be
/// derived from it at compile time.
pub const PRESETS: PresetTable = PresetTable::new();
