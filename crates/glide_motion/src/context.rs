//! Page-level motion context
//!
//! What page code receives from the shell: factories for reveals, the FLIP
//! hook and parallax bindings, all wired to the same scheduler, preference
//! gate and engine.

use glide_animation::SchedulerHandle;
use glide_core::{ElementId, LayoutHost};

use crate::engine::EngineHandle;
use crate::flip::Flip;
use crate::parallax::{ParallaxHandle, ParallaxOptions};
use crate::preference::MotionPreference;
use crate::reveal::{Reveal, ViewportTrigger};

#[derive(Clone, Debug)]
pub struct MotionContext {
    scheduler: SchedulerHandle,
    preference: MotionPreference,
    engine: EngineHandle,
    trigger: ViewportTrigger,
}

impl MotionContext {
    pub fn new(
        scheduler: SchedulerHandle,
        preference: MotionPreference,
        engine: EngineHandle,
        trigger: ViewportTrigger,
    ) -> Self {
        Self {
            scheduler,
            preference,
            engine,
            trigger,
        }
    }

    /// A fade reveal using the configured trigger zone
    pub fn fade(&self) -> Reveal {
        self.bind(Reveal::fade())
    }

    /// A scale reveal using the configured trigger zone
    pub fn scale(&self) -> Reveal {
        self.bind(Reveal::scale())
    }

    fn bind(&self, reveal: Reveal) -> Reveal {
        reveal
            .trigger(self.trigger)
            .bind(self.scheduler.clone(), self.preference.clone())
    }

    pub fn use_flip(&self) -> Flip {
        Flip::new(self.scheduler.clone(), self.preference.clone())
    }

    /// Bind a parallax effect; `None` yields an inert handle
    pub fn use_parallax(
        &self,
        element: Option<ElementId>,
        options: ParallaxOptions,
        host: &dyn LayoutHost,
    ) -> ParallaxHandle {
        ParallaxHandle::bind(&self.engine, &self.preference, element, options, host)
    }

    pub fn preference(&self) -> &MotionPreference {
        &self.preference
    }

    pub fn reduced_motion(&self) -> bool {
        self.preference.reduced_motion()
    }

    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }
}
