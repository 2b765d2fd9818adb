//! Motion preference oracle
//!
//! Every producer asks [`MotionPreference::reduced_motion`] at the instant an
//! animation would start. The answer is never cached: the user can flip the
//! accessibility setting while the page is open and the next animation must
//! see it.

use std::fmt;
use std::rc::Rc;

use glide_animation::TransitionDescriptor;
use glide_core::MotionEnvironment;
use serde::{Deserialize, Serialize};

/// Configured override for the accessibility signal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducedMotionOverride {
    /// Defer to the environment
    #[default]
    System,
    /// Always reduce motion
    Always,
    /// Never reduce motion, whatever the environment says
    Never,
}

/// Reduced-motion gate shared by both animation paradigms
#[derive(Clone, Default)]
pub struct MotionPreference {
    environment: Option<Rc<dyn MotionEnvironment>>,
    forced: ReducedMotionOverride,
}

impl MotionPreference {
    pub fn new(environment: Rc<dyn MotionEnvironment>) -> Self {
        Self {
            environment: Some(environment),
            forced: ReducedMotionOverride::System,
        }
    }

    /// A preference with no environment attached (always "no preference")
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, forced: ReducedMotionOverride) -> Self {
        self.forced = forced;
        self
    }

    pub fn override_mode(&self) -> ReducedMotionOverride {
        self.forced
    }

    /// Whether reduced motion is requested right now
    ///
    /// Safe to call at any time, including before the environment is ready:
    /// a missing environment or an unavailable signal means "no preference".
    pub fn reduced_motion(&self) -> bool {
        let reduced = match self.forced {
            ReducedMotionOverride::Always => true,
            ReducedMotionOverride::Never => false,
            ReducedMotionOverride::System => self
                .environment
                .as_ref()
                .and_then(|env| env.prefers_reduced_motion())
                .unwrap_or(false),
        };
        tracing::trace!(reduced, mode = ?self.forced, "reduced motion query");
        reduced
    }

    /// The descriptor to actually run
    ///
    /// Under reduced motion every descriptor collapses to a zero-length
    /// transition; the target still ends in its final state.
    pub fn resolve(&self, descriptor: TransitionDescriptor) -> TransitionDescriptor {
        if self.reduced_motion() {
            descriptor.reduced()
        } else {
            descriptor
        }
    }
}

impl fmt::Debug for MotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionPreference")
            .field("environment", &self.environment.is_some())
            .field("forced", &self.forced)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_animation::{Preset, PRESETS};
    use glide_core::{SharedPreference, Unavailable};

    #[test]
    fn test_detached_means_no_preference() {
        assert!(!MotionPreference::detached().reduced_motion());
    }

    #[test]
    fn test_unavailable_signal_means_no_preference() {
        let pref = MotionPreference::new(Rc::new(Unavailable));
        assert!(!pref.reduced_motion());
    }

    #[test]
    fn test_reads_live_value() {
        let shared = SharedPreference::new();
        let pref = MotionPreference::new(Rc::new(shared.clone()));
        assert!(!pref.reduced_motion());

        shared.set(true);
        assert!(pref.reduced_motion());

        shared.clear();
        assert!(!pref.reduced_motion());
    }

    #[test]
    fn test_override_wins() {
        let shared = SharedPreference::with_value(true);
        let never = MotionPreference::new(Rc::new(shared.clone()))
            .with_override(ReducedMotionOverride::Never);
        assert!(!never.reduced_motion());

        let always = MotionPreference::detached().with_override(ReducedMotionOverride::Always);
        assert!(always.reduced_motion());
    }

    #[test]
    fn test_resolve_collapses_under_reduced_motion() {
        let desc = PRESETS.get(Preset::FastEase).with_delay(120);

        let normal = MotionPreference::detached();
        assert_eq!(normal.resolve(desc), desc);

        let reduced = MotionPreference::detached().with_override(ReducedMotionOverride::Always);
        assert!(reduced.resolve(desc).is_instant());
    }
}
