//! Decode encrypted MU terrain files.
//!
//! This crate provides pure synchronous decoding for the terrain layer
//! map, the attribute grid and the tile texture containers. All functions
//! are designed to be called from any threading context - the library
//! user controls parallelism.
//!
//! # Pipeline
//!
//! ```text
//! map bytes       -> decrypt -> decode_terrain_map -> TerrainGrid
//! attribute bytes -> decrypt -> mask -> decode_attributes -> AttributeGrid
//! ```
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Stateless**: Cipher state is a value owned by each call
//! - **No I/O**: Callers read files and pass byte slices

mod attributes;
pub mod cipher;
mod error;
mod grid;
mod map;
pub mod texture;

pub use attributes::decode_attributes;
pub use cipher::{StreamDecryptor, apply_attribute_mask, decrypt, decrypt_attributes, encrypt};
pub use error::{DecodeError, DecodeResult};
pub use grid::{
    AttributeCell, AttributeGrid, AttributeLayout, DEFAULT_GRID_SIZE, MapHeader, NO_OVERLAY,
    Symmetry, TerrainCell, TerrainGrid,
};
pub use map::decode_terrain_map;
pub use texture::{DecodedTexture, TextureFormat, decode_texture};

/// Decrypt and decode a map file in one step.
pub fn load_terrain_map(encrypted: &[u8], size: usize) -> DecodeResult<TerrainGrid> {
    decode_terrain_map(&decrypt(encrypted), size)
}

/// Decrypt, unmask and decode an attribute file in one step.
pub fn load_attributes(encrypted: &[u8], size: usize) -> DecodeResult<AttributeGrid> {
    decode_attributes(&decrypt_attributes(encrypted), size)
}
