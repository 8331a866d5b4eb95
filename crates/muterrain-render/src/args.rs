//! Command-line parameter parsing.

use std::path::PathBuf;

use clap::Parser;
use glam::IVec2;
use muterrain::{DEFAULT_WORLD_UNITS_PER_REPEAT, RenderConfig, RenderRegion};
use muterrain_decode::DEFAULT_GRID_SIZE;

/// Default world number (Lorencia).
const DEFAULT_WORLD_ID: u32 = 1;
/// Default region center on the X axis, in cells.
const DEFAULT_CENTER_X: i32 = 133;
/// Default region center on the Y axis, in cells.
const DEFAULT_CENTER_Y: i32 = 120;
/// Default half-width of the rendered region, in cells.
const DEFAULT_RADIUS: u32 = 24;
/// Largest accepted radius: enough to cover the whole grid from any cell.
const MAX_RADIUS: u32 = DEFAULT_GRID_SIZE as u32;
/// Default output pixels per tile edge.
const DEFAULT_RESOLUTION: u32 = 64;

/// Parsed command line.
#[derive(Parser, Debug)]
#[command(about = "Render a region of an MU terrain map to a PNG image")]
pub struct RenderArgs {
    /// Directory holding the world's map and attribute files.
    pub world_dir: PathBuf,

    /// World number used in file names (`EncTerrain<ID>.map`).
    #[arg(long, default_value_t = DEFAULT_WORLD_ID)]
    pub world: u32,

    /// Output PNG path.
    #[arg(short, long, default_value = "terrain.png")]
    pub output: PathBuf,

    /// Region center on the X axis, in cells.
    #[arg(long, default_value_t = DEFAULT_CENTER_X)]
    pub center_x: i32,

    /// Region center on the Y axis, in cells.
    #[arg(long, default_value_t = DEFAULT_CENTER_Y)]
    pub center_y: i32,

    /// Cells rendered on each side of the center.
    #[arg(
        long,
        default_value_t = DEFAULT_RADIUS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_RADIUS))
    )]
    pub radius: u32,

    /// Render the whole grid instead of a centered region.
    #[arg(long, conflicts_with_all = ["center_x", "center_y", "radius"])]
    pub full: bool,

    /// Output pixels per tile edge.
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    pub resolution: u32,

    /// Elapsed time driving the water animation, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub time_ms: u64,

    /// Apply per-cell attribute symmetry to texture coordinates.
    #[arg(long)]
    pub symmetry: bool,

    /// Blend fully saturated cells instead of drawing their overlay alone.
    #[arg(long)]
    pub no_shortcut: bool,

    /// World units spanned by one texture repetition.
    #[arg(long, default_value_t = DEFAULT_WORLD_UNITS_PER_REPEAT)]
    pub world_units: f64,

    /// Extra directories searched for tile textures, after the world directory.
    #[arg(long = "textures")]
    pub texture_dirs: Vec<PathBuf>,
}

impl RenderArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Render configuration for these arguments.
    pub fn config(&self) -> RenderConfig {
        RenderConfig::default()
            .with_grid_size(DEFAULT_GRID_SIZE)
            .with_tile_resolution(self.resolution)
            .with_time_ms(self.time_ms)
            .with_symmetry(self.symmetry)
            .with_world_units_per_repeat(self.world_units)
            .with_saturated_layer_shortcut(!self.no_shortcut)
    }

    /// Region of the grid to render.
    ///
    /// Returns `None` if the centered region does not fit in cell
    /// coordinates.
    pub fn region(&self) -> Option<RenderRegion> {
        if self.full {
            Some(RenderRegion::full(DEFAULT_GRID_SIZE))
        } else {
            RenderRegion::centered(IVec2::new(self.center_x, self.center_y), self.radius)
        }
    }

    /// Directories searched for textures, in order.
    pub fn texture_search_path(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.world_dir.clone()];
        dirs.extend(self.texture_dirs.iter().cloned());
        dirs
    }
}
