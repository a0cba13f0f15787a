//! lattice-layout - lay out a JSON scene and print the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lattice::primitives::Rect;
use lattice::scene::Scene;

#[derive(Debug, Parser)]
#[command(name = "lattice-layout", about = "Lay out a JSON scene and print the result")]
struct Args {
    /// Scene file to lay out.
    scene: PathBuf,

    /// Override the scene's maximum width.
    #[arg(long)]
    width: Option<f64>,

    /// Override the scene's maximum height.
    #[arg(long)]
    height: Option<f64>,

    /// Override the rendering scale.
    #[arg(long)]
    scale: Option<f64>,

    /// Also print the element tree as ASCII art.
    #[arg(long)]
    ascii: bool,

    /// Print leaf frames as JSON instead of the layout tree.
    #[arg(long)]
    json: bool,

    /// Log layout decisions (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct LeafFrame {
    name: String,
    frame: Rect,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("lattice=trace")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut scene = Scene::from_path(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;
    if let Some(width) = args.width {
        scene.bounds.max_width = Some(width);
    }
    if let Some(height) = args.height {
        scene.bounds.max_height = Some(height);
    }
    if let Some(scale) = args.scale {
        scene.environment.scale = scale;
    }

    let element = scene.to_element();
    if args.ascii {
        println!("{}", element.ascii_art());
    }

    let layout = scene.layout().context("layout failed")?;
    tracing::debug!(size = %layout.size(), "scene laid out");

    if args.json {
        let frames: Vec<LeafFrame> = layout
            .leaf_frames()
            .into_iter()
            .map(|(content, frame)| LeafFrame {
                name: content.debug_name().to_string(),
                frame,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        print!("{}", layout.describe());
    }
    Ok(())
}
