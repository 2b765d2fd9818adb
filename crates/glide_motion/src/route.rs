//! Route transition controller
//!
//! Keeps the rendered page set in step with navigation:
//!
//! ```text
//! Idle ──navigate──▶ Exiting { outgoing, pending } ──exit done──▶ Entering { incoming } ──enter done──▶ Idle
//! ```
//!
//! The first page mounts without animation. Every later navigation to a
//! different path animates the current page away and, once it is gone,
//! animates the new page in. Navigating again mid-flight cancels rather than
//! queues:
//!
//! - while **exiting**, the new target replaces the pending one; the earlier
//!   pending page is dropped without ever mounting
//! - while **entering**, the entering page becomes the outgoing page and its
//!   exit starts from wherever it currently is on screen
//!
//! At most one page is entering and at most one is exiting at any instant.
//!
//! With [`OverlapPolicy::Simultaneous`] the exit and the enter run together.
//! An exiting page is never removed before its exit finishes: a navigation
//! made while one is still running becomes the pending target, and once the
//! exit slot frees up the entering page exits from where it is while the
//! pending page enters.

use glide_animation::{
    AnimatedProgress, Interpolate, MotionCategory, SchedulerHandle, TransitionDescriptor, PRESETS,
};
use glide_core::VisualProps;
use serde::{Deserialize, Serialize};

use crate::preference::MotionPreference;

/// Vertical travel of the page transition in pixels
const PAGE_SHIFT: f32 = 8.0;

/// Whether exit and enter run one after the other or together
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// The new page mounts only after the old one has fully exited
    #[default]
    Wait,
    /// Exit and enter run at the same time (cross-fade)
    Simultaneous,
}

/// Monotonic id for each mounted page instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageGeneration(u64);

impl PageGeneration {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What a rendered page is currently doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageRole {
    Current,
    Entering,
    Exiting,
}

/// Coarse controller state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoutePhase {
    /// Nothing mounted yet
    Empty,
    Idle,
    Exiting,
    Entering,
    /// Exit and enter running together (simultaneous overlap only)
    CrossFading,
}

/// A page in the render tree, as the host should draw it
#[derive(Debug)]
pub struct RenderedPage<'a, C> {
    pub generation: PageGeneration,
    pub path: &'a str,
    pub content: &'a C,
    pub role: PageRole,
    pub visual: VisualProps,
}

/// Visual state of a page that is not on screen
fn away_below() -> VisualProps {
    VisualProps::IDENTITY
        .with_opacity(0.0)
        .with_translate(0.0, PAGE_SHIFT)
}

fn away_above() -> VisualProps {
    VisualProps::IDENTITY
        .with_opacity(0.0)
        .with_translate(0.0, -PAGE_SHIFT)
}

struct Page<C> {
    generation: PageGeneration,
    path: String,
    content: C,
    from: VisualProps,
    to: VisualProps,
    progress: AnimatedProgress,
}

impl<C> Page<C> {
    fn visual(&self) -> VisualProps {
        self.from.lerp(&self.to, self.progress.get())
    }
}

/// Sequences exit and enter animations around navigation
pub struct RouteTransition<C> {
    scheduler: SchedulerHandle,
    preference: MotionPreference,
    descriptor: TransitionDescriptor,
    overlap: OverlapPolicy,
    /// Mounted page; animating in while its progress runs
    current: Option<Page<C>>,
    outgoing: Option<Page<C>>,
    /// Navigation target waiting for the exit to finish
    pending: Option<(String, C)>,
    next_generation: u64,
}

impl<C> RouteTransition<C> {
    pub fn new(scheduler: SchedulerHandle, preference: MotionPreference) -> Self {
        Self {
            scheduler,
            preference,
            descriptor: PRESETS.for_category(MotionCategory::PageTransition),
            overlap: OverlapPolicy::default(),
            current: None,
            outgoing: None,
            pending: None,
            next_generation: 0,
        }
    }

    pub fn with_overlap(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_transition(mut self, descriptor: TransitionDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    pub fn overlap(&self) -> OverlapPolicy {
        self.overlap
    }

    /// Navigate to `path`
    ///
    /// The same path as the navigation target swaps content in place.
    pub fn navigate(&mut self, path: impl Into<String>, content: C) {
        let path = path.into();

        if self.current.is_none() && self.outgoing.is_none() && self.pending.is_none() {
            tracing::debug!(%path, "route: initial mount");
            let page = self.mount(path, content, None);
            self.current = Some(page);
            return;
        }

        if let Some((pending_path, pending_content)) = &mut self.pending {
            if *pending_path == path {
                *pending_content = content;
                return;
            }
        } else if let Some(current) = self.current.as_mut().filter(|c| c.path == path) {
            tracing::trace!(%path, "route: same path, replacing content");
            current.content = content;
            return;
        }

        match self.overlap {
            OverlapPolicy::Wait => self.navigate_sequential(path, content),
            OverlapPolicy::Simultaneous => self.navigate_simultaneous(path, content),
        }
        self.update();
    }

    fn navigate_sequential(&mut self, path: String, content: C) {
        if self.outgoing.is_some() {
            if let Some((dropped, _)) = self.pending.replace((path.clone(), content)) {
                tracing::debug!(%dropped, %path, "route: pending navigation superseded");
            }
            return;
        }

        self.start_exit();
        self.pending = Some((path, content));
    }

    fn navigate_simultaneous(&mut self, path: String, content: C) {
        if self.outgoing.is_none() {
            self.start_exit();
            let page = self.mount(path, content, Some(away_below()));
            self.current = Some(page);
            return;
        }

        // The exit slot is busy; the entering page keeps going and the
        // target waits for the exit to finish
        if let Some(current) = self.current.as_mut().filter(|c| c.path == path) {
            if let Some((dropped, _)) = self.pending.take() {
                tracing::debug!(%dropped, %path, "route: pending navigation superseded");
            }
            current.content = content;
            return;
        }
        if let Some((dropped, _)) = self.pending.replace((path.clone(), content)) {
            tracing::debug!(%dropped, %path, "route: pending navigation superseded");
        }
    }

    /// Move the current page into the outgoing slot, exiting from where it is
    fn start_exit(&mut self) {
        let Some(page) = self.current.take() else {
            return;
        };
        let from = page.visual();
        if page.progress.is_animating() {
            tracing::debug!(path = %page.path, "route: entering page superseded, exiting");
        }
        let progress = self.start_progress();
        self.outgoing = Some(Page {
            from,
            to: away_above(),
            progress,
            ..page
        });
    }

    fn mount(&mut self, path: String, content: C, from: Option<VisualProps>) -> Page<C> {
        let generation = PageGeneration(self.next_generation);
        self.next_generation += 1;

        let (from, progress) = match from {
            Some(from) => (from, self.start_progress()),
            None => (VisualProps::IDENTITY, AnimatedProgress::complete()),
        };
        tracing::debug!(%path, generation = generation.0, "route: page mounted");
        Page {
            generation,
            path,
            content,
            from,
            to: VisualProps::IDENTITY,
            progress,
        }
    }

    fn start_progress(&self) -> AnimatedProgress {
        let descriptor = self.preference.resolve(self.descriptor);
        AnimatedProgress::start(&self.scheduler, &descriptor, 0)
    }

    /// Advance the state machine; call after each scheduler tick
    ///
    /// Returns true once nothing is left to animate.
    pub fn update(&mut self) -> bool {
        if self
            .outgoing
            .as_ref()
            .is_some_and(|page| page.progress.is_finished())
        {
            if let Some(page) = self.outgoing.take() {
                tracing::debug!(path = %page.path, generation = page.generation.0, "route: exit complete");
            }
            if let Some((path, content)) = self.pending.take() {
                // Empty under `Wait`; a page still entering under
                // `Simultaneous` takes over the exit slot
                self.start_exit();
                let page = self.mount(path, content, Some(away_below()));
                self.current = Some(page);
            }
        }
        self.is_settled()
    }

    pub fn is_settled(&self) -> bool {
        self.outgoing.is_none()
            && self.pending.is_none()
            && self
                .current
                .as_ref()
                .map_or(true, |page| page.progress.is_finished())
    }

    pub fn phase(&self) -> RoutePhase {
        let entering = self
            .current
            .as_ref()
            .is_some_and(|page| page.progress.is_animating());
        match (&self.outgoing, &self.current) {
            (Some(_), Some(_)) => RoutePhase::CrossFading,
            (Some(_), None) => RoutePhase::Exiting,
            (None, Some(_)) if entering => RoutePhase::Entering,
            (None, Some(_)) => RoutePhase::Idle,
            (None, None) => RoutePhase::Empty,
        }
    }

    /// Path of the page the user is heading to
    pub fn target_path(&self) -> Option<&str> {
        self.pending
            .as_ref()
            .map(|(path, _)| path.as_str())
            .or_else(|| self.current.as_ref().map(|page| page.path.as_str()))
    }

    /// Pages in the render tree, bottom first
    pub fn pages(&self) -> Vec<RenderedPage<'_, C>> {
        let outgoing = self.outgoing.as_ref().map(|page| (page, PageRole::Exiting));
        let current = self.current.as_ref().map(|page| {
            let role = if page.progress.is_animating() {
                PageRole::Entering
            } else {
                PageRole::Current
            };
            (page, role)
        });

        outgoing
            .into_iter()
            .chain(current)
            .map(|(page, role)| RenderedPage {
                generation: page.generation,
                path: &page.path,
                content: &page.content,
                role,
                visual: page.visual(),
            })
            .collect()
    }
}

impl<C> std::fmt::Debug for RouteTransition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTransition")
            .field("phase", &self.phase())
            .field("target", &self.target_path())
            .field("overlap", &self.overlap)
            .finish()
    }
}
