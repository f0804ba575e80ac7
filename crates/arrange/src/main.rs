mod document;

use anyhow::{Context, Result};
use clap::Parser;
use concept_layout::{Grouping, LayeredLayout, Vec2};
use document::{placed_concepts, Document};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Auto-arrange a concept map document and print where every concept goes
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Concept map document (RON)
    document: PathBuf,

    /// Layout configuration overrides (RON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width, overrides the document
    #[arg(long)]
    width: Option<f32>,

    /// Canvas height, overrides the document
    #[arg(long)]
    height: Option<f32>,

    /// Cluster siblings by their parents instead of one group per concept
    #[arg(long)]
    associative: bool,
}

fn load_config(args: &Args) -> Result<LayeredLayout> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ron::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => LayeredLayout::default(),
    };
    if args.associative {
        config = config.with_grouping(Grouping::Associative);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let config = load_config(&args)?;
    debug!("Layout configuration: {config:?}");

    let document = Document::load(&args.document)?;
    let (mut map, mut ctx) = document.to_map()?;
    ctx.canvas = Vec2::new(
        args.width.unwrap_or(ctx.canvas.x),
        args.height.unwrap_or(ctx.canvas.y),
    );

    let placed = config
        .arrange_in_place(&mut map, &ctx)
        .with_context(|| format!("Failed to arrange {}", args.document.display()))?;
    info!("Arranged {placed} concepts");

    let output =
        ron::ser::to_string_pretty(&placed_concepts(&map), ron::ser::PrettyConfig::default())?;
    println!("{output}");

    Ok(())
}
