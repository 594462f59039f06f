mod scene;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flightscene_assets::ModelTable;
use flightscene_render::{Framebuffer, FrameStats, Renderer, Scene, SceneRenderer};
use tracing_subscriber::EnvFilter;

use crate::scene::{LoadedScene, SceneFile};

/// Frame cadence used by the demo loop, in microseconds.
const DEMO_FRAME_MICROS: u32 = 25_000;

#[derive(Parser)]
#[command(name = "flightscene-cli", about = "Render fixed-point flight scenes to PPM images")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Animate the built-in scene and save the last frame
    Demo {
        /// Output image
        #[arg(short, long, default_value = "demo.ppm")]
        out: PathBuf,
        /// Number of frames to simulate
        #[arg(short, long, default_value = "40")]
        frames: u32,
    },
    /// Render a JSON scene description
    Render {
        /// Scene file
        #[arg(short, long)]
        scene: PathBuf,
        /// Output image
        #[arg(short, long, default_value = "scene.ppm")]
        out: PathBuf,
    },
    /// List the models in a packed environment blob
    Inspect {
        /// Model blob
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("flightscene-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", flightscene_common::crate_info());
            println!("math: {}", flightscene_math::crate_info());
            println!("assets: {}", flightscene_assets::crate_info());
            println!("entities: {}", flightscene_entities::crate_info());
            println!("render: {}", flightscene_render::crate_info());
        }
        Commands::Demo { out, frames } => {
            let scene = SceneFile::demo()?;
            let mut loaded = scene.load()?;
            let mut renderer = SceneRenderer::new(scene.config.clone())?;
            let mut fb = Framebuffer::new(scene.config.viewport);

            let mut now = scene.now;
            let mut stats = FrameStats::default();
            for _ in 0..frames.max(1) {
                loaded.store.expire(now);
                stats = draw(&mut renderer, &mut fb, &scene, &mut loaded, now);
                now = now.wrapping_add(DEMO_FRAME_MICROS);
            }

            save(&fb, &out)?;
            report(&stats, &fb, &out);
        }
        Commands::Render { scene, out } => {
            let file = SceneFile::read(&scene)?;
            let mut loaded = file.load()?;
            let mut renderer = SceneRenderer::new(file.config.clone())
                .with_context(|| format!("invalid render config in {}", scene.display()))?;
            let mut fb = Framebuffer::new(file.config.viewport);

            let stats = draw(&mut renderer, &mut fb, &file, &mut loaded, file.now);
            save(&fb, &out)?;
            report(&stats, &fb, &out);
        }
        Commands::Inspect { file } => {
            let table = ModelTable::load(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            println!("{}: {} models", file.display(), table.len());
            for (i, model) in table.iter().enumerate() {
                let c = model.center();
                println!(
                    "  [{i}] label={} {:?} vertices={} faces={} center=({}, {}, {}) radius={}",
                    model.label(),
                    model.topology(),
                    model.vertex_count(),
                    model.face_count(),
                    c.x,
                    c.y,
                    c.z,
                    model.radius()
                );
            }
        }
    }

    Ok(())
}

fn draw(
    renderer: &mut SceneRenderer,
    fb: &mut Framebuffer,
    file: &SceneFile,
    loaded: &mut LoadedScene,
    now: u32,
) -> FrameStats {
    fb.clear(renderer.config().background);
    let mut scene = Scene {
        models: &loaded.models,
        hidden_labels: &file.hidden_labels,
        ship: &loaded.ship,
        entities: &mut loaded.store,
        camera: file.camera,
        now,
        status: file.status.as_deref(),
    };
    renderer.render(&mut scene, fb)
}

fn save(fb: &Framebuffer, out: &Path) -> anyhow::Result<()> {
    fb.save_ppm(out)
        .with_context(|| format!("writing {}", out.display()))
}

fn report(stats: &FrameStats, fb: &Framebuffer, out: &Path) {
    println!(
        "Frame: candidates={}, drawn={}, behind={}, offscreen={}, lines={}",
        stats.candidates,
        stats.accepted,
        stats.behind_camera,
        stats.off_screen,
        fb.lines_drawn()
    );
    println!("Wrote {}", out.display());
}
