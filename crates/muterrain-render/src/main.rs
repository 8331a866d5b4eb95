//! Render a region of an MU terrain map to a PNG image.
//!
//! Reads the encrypted map and attribute files of one world, resolves tile
//! textures from the data directories and composites the requested region.

mod args;
mod resolver;
mod world;

use std::process::ExitCode;
use std::time::Instant;

use args::RenderArgs;
use resolver::DirectoryResolver;
use world::World;

fn run(args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let world = World::load(&args.world_dir, args.world)?;

    let config = args.config();
    let region = args
        .region()
        .ok_or("render region does not fit in cell coordinates")?;
    let resolver = DirectoryResolver::new(args.texture_search_path());
    let target = muterrain::render(
        &world.terrain,
        &world.attributes,
        &resolver,
        &config,
        region,
    )?;

    let (width, height) = (target.width(), target.height());
    let image = target
        .into_image()
        .ok_or_else(|| format!("output of {width}x{height} pixels is too large"))?;
    image.save(&args.output)?;

    tracing::info!(
        output = %args.output.display(),
        width,
        height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Wrote terrain image"
    );
    Ok(())
}

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args = RenderArgs::parse_args();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Render failed: {e}");
            ExitCode::FAILURE
        }
    }
}
