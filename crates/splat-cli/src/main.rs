use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use tracing_subscriber::EnvFilter;

use splat_data::{codec, generate, Scene};
use splat_render::{run, ViewerConfig};

#[derive(Parser)]
#[command(name = "splatview")]
#[command(about = "Gaussian splat scene viewer and tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer
    View {
        /// Scene JSON to load; starts empty when omitted
        #[arg(short, long)]
        scene: Option<PathBuf>,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 720)]
        height: u32,
    },

    /// Generate a synthetic scene file
    Gen {
        #[arg(value_enum)]
        kind: SceneKind,

        /// Total records (points per axis for `grid`)
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,

        /// Grid spacing in world units
        #[arg(long, default_value_t = 0.5)]
        spacing: f32,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Print a summary of a scene file
    Info { scene: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SceneKind {
    Grid,
    Galaxy,
    Ribbon,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::View {
            scene,
            width,
            height,
        } => {
            let (scene_data, scene_path) = match scene {
                Some(path) => match codec::load(&path) {
                    Ok(loaded) => {
                        tracing::info!(count = loaded.len(), path = %path.display(), "scene loaded");
                        (loaded, Some(path))
                    }
                    // A bad scene file is recoverable: view an empty scene.
                    Err(err) => {
                        tracing::error!(path = %path.display(), %err, "scene load failed, starting empty");
                        (Scene::new(), None)
                    }
                },
                None => (Scene::new(), None),
            };

            run(
                scene_data,
                scene_path,
                ViewerConfig {
                    title: "splatview".to_owned(),
                    width,
                    height,
                },
            )
        }

        Commands::Gen {
            kind,
            count,
            spacing,
            seed,
            out,
        } => {
            let scene = match kind {
                SceneKind::Grid => generate::grid(count, spacing),
                SceneKind::Galaxy => generate::galaxy(count, seed),
                SceneKind::Ribbon => generate::ribbon(count, seed),
            };
            codec::save(&out, &scene)
                .with_context(|| format!("writing scene to {}", out.display()))?;
            tracing::info!(count = scene.len(), path = %out.display(), "scene written");
            Ok(())
        }

        Commands::Info { scene } => {
            let loaded = codec::load(&scene)
                .with_context(|| format!("loading scene {}", scene.display()))?;
            print_summary(&scene, &loaded);
            Ok(())
        }
    }
}

fn print_summary(path: &std::path::Path, scene: &Scene) {
    println!("scene:     {}", path.display());
    println!("gaussians: {}", scene.len());
    if scene.is_empty() {
        return;
    }

    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    let mut opacity_sum = 0.0f32;
    for g in scene.iter() {
        min = min.min(g.mean);
        max = max.max(g.mean);
        opacity_sum += g.opacity;
    }
    println!(
        "bounds:    [{:.3}, {:.3}, {:.3}] .. [{:.3}, {:.3}, {:.3}]",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    println!(
        "opacity:   {:.3} mean",
        opacity_sum / scene.len() as f32
    );
}
