//! Accessibility environment seam
//!
//! The host exposes the user's "prefers reduced motion" setting through
//! [`MotionEnvironment`]. The query may be unavailable (no display attached,
//! the page is still being rendered off-screen, the platform has no such
//! setting); implementations report that as `None`.

use std::cell::Cell;
use std::rc::Rc;

/// Source of the reduced-motion accessibility signal
pub trait MotionEnvironment {
    /// `Some(true)` when reduced motion is requested, `Some(false)` when it is
    /// not, `None` when the query mechanism is unavailable
    fn prefers_reduced_motion(&self) -> Option<bool>;
}

/// An environment with no accessibility query at all
#[derive(Clone, Copy, Debug, Default)]
pub struct Unavailable;

impl MotionEnvironment for Unavailable {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        None
    }
}

/// A live preference cell the host updates as the setting changes
///
/// Cloning shares the cell, so a media-query listener can hold one clone and
/// write into it while the motion layer reads another. Starts unavailable
/// until the host sets a value.
#[derive(Clone, Debug, Default)]
pub struct SharedPreference {
    value: Rc<Cell<Option<bool>>>,
}

impl SharedPreference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell that already holds a value
    pub fn with_value(reduced: bool) -> Self {
        let pref = Self::new();
        pref.set(reduced);
        pref
    }

    pub fn set(&self, reduced: bool) {
        self.value.set(Some(reduced));
    }

    /// Mark the signal as unavailable again
    pub fn clear(&self) {
        self.value.set(None);
    }
}

impl MotionEnvironment for SharedPreference {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.value.get()
    }
}
