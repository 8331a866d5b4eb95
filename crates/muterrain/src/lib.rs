//! Composite decoded MU terrain grids into raster images.
//!
//! This crate turns a [`TerrainGrid`] and [`AttributeGrid`] (see
//! `muterrain-decode`) into an RGB image, reproducing the client's terrain
//! shading: world-anchored nearest-neighbour texturing, per-vertex alpha
//! blending between two layers, and the water scroll/wave animation.
//!
//! # Design principles
//!
//! - **Storage-agnostic**: Textures come from an [`AssetResolver`]
//! - **Deterministic**: Output depends only on inputs and `time_ms`
//! - **Preload, then fill**: Textures are resolved once, single-threaded,
//!   before the parallel pixel fill
//!
//! # Example
//!
//! ```ignore
//! use muterrain::{render, MemoryResolver, RenderConfig, RenderRegion};
//!
//! let terrain = muterrain_decode::load_terrain_map(&map_bytes, 256)?;
//! let attributes = muterrain_decode::load_attributes(&att_bytes, 256)?;
//! let config = RenderConfig::default().with_tile_resolution(32);
//! let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(256))?;
//! target.into_image().unwrap().save("terrain.png")?;
//! ```

pub mod cache;
pub mod catalog;
mod compositor;
mod config;
mod error;
mod resolver;
pub mod sampler;

pub use cache::{CachedTile, TextureCache};
pub use compositor::{
    CellLayers, RenderTarget, blend, corner_indices, interpolate_alpha, region_tile_indices,
    render, render_with_cache, select_layers,
};
pub use config::{
    DEFAULT_TILE_RESOLUTION, DEFAULT_WORLD_UNITS_PER_REPEAT, RenderConfig, RenderRegion,
};
pub use error::{Error, Result};
pub use resolver::{AssetResolver, MemoryResolver, PLACEHOLDER_COLOR, Rgb, TileAsset};
pub use sampler::TextureSampler;

// Re-export decode types for convenience.
pub use muterrain_decode::{AttributeGrid, NO_OVERLAY, Symmetry, TerrainGrid};
