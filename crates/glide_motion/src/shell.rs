//! Composition root
//!
//! [`MotionShell`] wraps every navigated page. It owns the animation
//! scheduler and the route controller, configures the shared engine once,
//! holds the history listener for as long as it is mounted, and hands page
//! code a [`MotionContext`].
//!
//! The host forwards its events:
//!
//! | Host event | Shell call |
//! |---|---|
//! | route change | [`navigate`](MotionShell::navigate) |
//! | frame callback | [`frame`](MotionShell::frame) |
//! | scroll | [`scroll`](MotionShell::scroll) |
//! | back/forward | [`history_navigation`](MotionShell::history_navigation) |

use std::rc::Rc;

use glide_animation::AnimationScheduler;
use glide_core::{LayoutHost, MotionEnvironment};

use crate::config::MotionConfig;
use crate::context::MotionContext;
use crate::engine::{ConfigureOutcome, EngineMount, TimelineEngine};
use crate::preference::MotionPreference;
use crate::route::{RenderedPage, RoutePhase, RouteTransition};

pub struct MotionShell<C> {
    scheduler: AnimationScheduler,
    engine: TimelineEngine,
    route: RouteTransition<C>,
    context: MotionContext,
    /// Re-measure scroll triggers once the current navigation settles
    refresh_pending: bool,
    _mount: EngineMount,
}

impl<C> MotionShell<C> {
    /// Mount the shell with its first page
    ///
    /// `environment` is the accessibility source; `None` means the host has
    /// no way to ask (treated as "no preference").
    pub fn mount(
        engine: &TimelineEngine,
        config: &MotionConfig,
        environment: Option<Rc<dyn MotionEnvironment>>,
        path: impl Into<String>,
        content: C,
    ) -> Self {
        if engine.configure(config.engine_defaults()) == ConfigureOutcome::AlreadyConfigured {
            tracing::debug!("shell mounted on an already configured engine");
        }
        let mount = engine.mount();

        let preference = environment
            .map(MotionPreference::new)
            .unwrap_or_default()
            .with_override(config.accessibility.reduced_motion);

        let scheduler = AnimationScheduler::new();
        let mut route = RouteTransition::new(scheduler.handle(), preference.clone())
            .with_overlap(config.route.overlap);
        route.navigate(path, content);

        let context = MotionContext::new(
            scheduler.handle(),
            preference,
            engine.handle(),
            config.reveal,
        );

        Self {
            scheduler,
            engine: engine.clone(),
            route,
            context,
            refresh_pending: false,
            _mount: mount,
        }
    }

    pub fn navigate(&mut self, path: impl Into<String>, content: C) {
        let path = path.into();
        tracing::debug!(%path, "navigate");
        self.route.navigate(path, content);
        self.refresh_pending = true;
    }

    /// Advance one frame
    ///
    /// Returns true while anything still needs frames.
    pub fn frame(&mut self, dt_ms: f32, host: &dyn LayoutHost) -> bool {
        let animating = self.scheduler.tick_ms(dt_ms);
        let scrubbing = self.engine.tick_ms(dt_ms);
        let settled = self.route.update();

        if settled && self.refresh_pending {
            // The new page's layout is final; triggers measured against the
            // old page would map scroll through stale coordinates
            self.engine.refresh(host);
            self.refresh_pending = false;
        }

        animating || scrubbing || !settled
    }

    pub fn scroll(&mut self, host: &dyn LayoutHost) {
        self.engine.on_scroll(host);
    }

    pub fn history_navigation(&mut self, host: &dyn LayoutHost) -> bool {
        self.engine.on_history_navigation(host)
    }

    pub fn pages(&self) -> Vec<RenderedPage<'_, C>> {
        self.route.pages()
    }

    pub fn phase(&self) -> RoutePhase {
        self.route.phase()
    }

    pub fn is_settled(&self) -> bool {
        self.route.is_settled()
    }

    pub fn context(&self) -> &MotionContext {
        &self.context
    }

    pub fn engine(&self) -> &TimelineEngine {
        &self.engine
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }
}

impl<C> std::fmt::Debug for MotionShell<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionShell")
            .field("route", &self.route)
            .field("engine", &self.engine)
            .field("frames", &self.scheduler.frame_count())
            .finish()
    }
}
