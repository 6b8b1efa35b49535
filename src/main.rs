//! Renders a sphere scene with Monte-Carlo path tracing and prints it to
//! the terminal as colored glyphs.
//!
//! Usage:
//!   glint                       - render the reference scene at 500x500
//!   glint --fit --samples 64    - quick render sized to the terminal
//!   glint --scene showcase      - mirror, metal and glass spheres

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use glint::config::RenderConfig;
use glint::renderer::Renderer;
use glint::scene::Scene;
use glint::{display, terminal};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenePreset {
    /// Green and blue diffuse spheres under a single light.
    Reference,
    /// Mirror, brushed metal and glass spheres under the same light.
    Showcase,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser)]
#[command(name = "glint")]
#[command(about = "A Monte-Carlo path tracer for the terminal")]
struct Args {
    /// Frame width in pixels (each pixel prints two glyphs wide)
    #[arg(long, default_value_t = 500)]
    width: usize,

    /// Frame height in pixels
    #[arg(long, default_value_t = 500)]
    height: usize,

    /// Samples per pixel
    #[arg(short, long, default_value_t = 1024)]
    samples: u32,

    /// Scene to render
    #[arg(long, value_enum, default_value_t = ScenePreset::Reference)]
    scene: ScenePreset,

    /// Shrink the frame to fit the current terminal window
    #[arg(long)]
    fit: bool,

    /// Set the logging level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let (width, height) = if args.fit {
        terminal::fit_to_terminal(args.width, args.height)?
    } else {
        (args.width, args.height)
    };
    ensure!(width > 0 && height > 0, "frame must be at least 1x1");
    ensure!(args.samples > 0, "sample count must be positive");

    let config = RenderConfig {
        width,
        height,
        samples_per_pixel: args.samples,
        ..RenderConfig::default()
    };

    let scene = match args.scene {
        ScenePreset::Reference => Scene::reference(),
        ScenePreset::Showcase => Scene::showcase(),
    };
    info!("scene: {} spheres", scene.spheres.len());

    let mut renderer = Renderer::new(config);
    renderer.render(&scene);

    let frame = display::to_ansi(renderer.framebuffer(), config.width, config.height);
    terminal::write_frame(&frame)?;

    Ok(())
}
