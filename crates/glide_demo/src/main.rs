//! Glide demo
//!
//! Drives a motion shell on an in-memory layout host: a page transition,
//! a scrolled parallax section, staggered reveals and a FLIP reorder,
//! logging what a renderer would draw.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glide_core::{MemoryHost, MotionEnvironment, Rect, SharedPreference};
use glide_motion::{
    FlipOptions, MotionConfig, MotionShell, ParallaxOptions, RevealGroup, TimelineEngine,
};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const FRAME_MS: f32 = 1000.0 / 60.0;

#[derive(Parser)]
#[command(name = "glide-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless Glide motion demo", long_about = None)]
struct Cli {
    /// Motion config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the engine's default easing (e.g. "power2.out")
    #[arg(long)]
    ease: Option<String>,

    /// Simulate the reduced-motion accessibility setting
    #[arg(long)]
    reduced_motion: bool,

    /// Frames to run per scenario
    #[arg(short, long, default_value = "90")]
    frames: u32,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = match &cli.config {
        Some(path) => MotionConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MotionConfig::default(),
    };
    if let Some(ease) = &cli.ease {
        config = config.with_ease(ease)?;
    }
    debug!("effective config:\n{}", config.to_toml_string()?);

    let environment = SharedPreference::with_value(cli.reduced_motion);
    let engine = TimelineEngine::new();
    let mut host = MemoryHost::new(1280.0, 800.0);
    let mut shell = MotionShell::mount(
        &engine,
        &config,
        Some(Rc::new(environment) as Rc<dyn MotionEnvironment>),
        "/",
        "home",
    );
    info!(
        reduced_motion = shell.context().reduced_motion(),
        defaults = ?engine.defaults(),
        "shell mounted"
    );

    page_transition(&mut shell, &host, cli.frames);
    parallax(&mut shell, &mut host, cli.frames);
    reveals(&mut shell, &mut host, cli.frames);
    flip_reorder(&mut shell, &mut host, cli.frames);

    info!(frames = shell.scheduler().frame_count(), "done");
    Ok(())
}

fn page_transition(shell: &mut MotionShell<&'static str>, host: &MemoryHost, frames: u32) {
    info!("navigating / -> /privacy/");
    shell.navigate("/privacy/", "privacy");

    for frame in 0..frames {
        let busy = shell.frame(FRAME_MS, host);
        for page in shell.pages() {
            info!(
                frame,
                path = page.path,
                role = ?page.role,
                opacity = %format!("{:.3}", page.visual.opacity),
                y = %format!("{:.2}", page.visual.translate_y),
                "page"
            );
        }
        if !busy {
            break;
        }
    }
}

fn parallax(shell: &mut MotionShell<&'static str>, host: &mut MemoryHost, frames: u32) {
    let section = host.insert(Rect::new(0.0, 1600.0, 1280.0, 600.0));
    let handle = shell
        .context()
        .use_parallax(Some(section), ParallaxOptions::default(), host);
    info!(active = handle.is_active(), "parallax bound");

    let start = 1600.0 - 800.0;
    let end = 1600.0 + 600.0;
    let frames = frames.max(1);
    for frame in 0..=frames {
        let scroll = start + (end - start) * frame as f32 / frames as f32;
        host.scroll_to(0.0, scroll);
        shell.scroll(host);
        shell.frame(FRAME_MS, host);
        if frame % 10 == 0 || frame == frames {
            info!(
                scroll,
                offset = %format!("{:.2}%", handle.offset_percent()),
                "parallax"
            );
        }
    }

    host.scroll_to(0.0, 0.0);
    shell.scroll(host);
    drop(handle);
    info!(triggers = shell.engine().trigger_count(), "parallax released");
}

fn reveals(shell: &mut MotionShell<&'static str>, host: &mut MemoryHost, frames: u32) {
    let mut group = RevealGroup::new(80);
    for i in 0..4 {
        let card = host.insert(Rect::new(40.0 + i as f32 * 300.0, 900.0, 280.0, 200.0));
        group.push(shell.context().fade().attach(card));
    }

    info!(fired = group.observe(host), "cards below the fold");
    host.scroll_to(0.0, 400.0);
    shell.scroll(host);
    info!(fired = group.observe(host), "cards scrolled into view");

    for frame in 0..frames {
        let busy = shell.frame(FRAME_MS, host);
        if frame % 5 == 0 || !busy {
            let opacities: Vec<String> = group
                .visuals()
                .map(|v| format!("{:.2}", v.opacity))
                .collect();
            info!(frame, opacities = %opacities.join(" "), "reveals");
        }
        if !busy {
            break;
        }
    }
}

fn flip_reorder(shell: &mut MotionShell<&'static str>, host: &mut MemoryHost, frames: u32) {
    let rows: Vec<_> = (0..3)
        .map(|i| host.insert(Rect::new(0.0, i as f32 * 80.0, 600.0, 72.0)))
        .collect();

    let flip = shell.context().use_flip();
    let state = flip.capture_state(host, rows.iter().copied());

    // Reverse the list
    for (i, row) in rows.iter().rev().enumerate() {
        host.set_bounds(*row, Rect::new(0.0, i as f32 * 80.0, 600.0, 72.0));
    }
    let animation = flip.animate_from(host, state, FlipOptions::default().stagger(40));
    info!(targets = animation.len(), "flip started");

    for frame in 0..frames {
        let busy = shell.frame(FRAME_MS, host);
        if frame % 10 == 0 || !busy {
            let offsets: Vec<String> = rows
                .iter()
                .map(|row| format!("{:.1}", animation.visual(*row).translate_y))
                .collect();
            info!(frame, offsets = %offsets.join(" "), "flip");
        }
        if !busy {
            break;
        }
    }
}
