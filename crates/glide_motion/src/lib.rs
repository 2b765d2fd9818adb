//! Glide Motion
//!
//! Motion coordination for multi-page sites. Two animation paradigms share
//! one reduced-motion gate and one preset table:
//!
//! - **Declarative**: [`Reveal`] primitives fire once when their element
//!   scrolls into view; [`RouteTransition`] sequences page exit and enter
//!   around navigation
//! - **Imperative**: the [`TimelineEngine`] holds process-wide defaults and
//!   scroll triggers; [`ParallaxHandle`] and [`Flip`] are the hooks page
//!   code uses
//!
//! [`MotionShell`] is the composition root that wires both to a host.
//!
//! # Example
//!
//! ```
//! use glide_core::MemoryHost;
//! use glide_motion::{MotionConfig, MotionShell, TimelineEngine};
//!
//! let engine = TimelineEngine::new();
//! let host = MemoryHost::new(1280.0, 800.0);
//! let mut shell = MotionShell::mount(&engine, &MotionConfig::default(), None, "/", "home");
//!
//! shell.navigate("/privacy/", "privacy");
//! while shell.frame(16.0, &host) {}
//!
//! assert_eq!(shell.pages()[0].path, "/privacy/");
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod flip;
pub mod parallax;
pub mod preference;
pub mod reveal;
pub mod route;
pub mod shell;

pub use config::{AccessibilityConfig, MotionConfig, RouteConfig};
pub use context::MotionContext;
pub use engine::{
    ConfigureOutcome, EngineDefaults, EngineHandle, EngineMount, Scrub, TimelineEngine, TriggerId,
    TriggerRange,
};
pub use error::{MotionError, Result};
pub use flip::{Flip, FlipAnimation, FlipOptions, FlipState, FLIP_DEFAULTS};
pub use parallax::{ParallaxHandle, ParallaxOptions};
pub use preference::{MotionPreference, ReducedMotionOverride};
pub use glide_animation::StaggerOrder;
pub use reveal::{Reveal, RevealGroup, RevealKind, ViewportTrigger};
pub use route::{
    OverlapPolicy, PageGeneration, PageRole, RenderedPage, RoutePhase, RouteTransition,
};
pub use shell::MotionShell;
