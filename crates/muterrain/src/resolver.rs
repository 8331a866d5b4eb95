//! Tile texture lookup.
//!
//! The compositor never touches storage. It asks an [`AssetResolver`] for
//! the texture behind a tile index and gets back a [`TileAsset`] or nothing.

use std::collections::HashMap;

use glam::DVec2;
use muterrain_decode::DecodedTexture;

/// An 8-bit RGB color.
pub type Rgb = [u8; 3];

/// Color substituted for tiles whose texture could not be resolved.
pub const PLACEHOLDER_COLOR: Rgb = [255, 0, 255];

/// A resolved tile texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileAsset {
    name: String,
    width: u32,
    height: u32,
    /// Row-major RGB data, 3 bytes per pixel.
    pixels: Vec<u8>,
}

impl TileAsset {
    /// Create an asset from RGB pixel data.
    ///
    /// Returns `None` if either dimension is zero or the pixel buffer does
    /// not hold exactly `width * height` RGB triples.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        if pixels.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            name: name.into(),
            width,
            height,
            pixels,
        })
    }

    /// Create a single-color asset of the given size.
    #[must_use]
    pub fn solid(name: impl Into<String>, width: u32, height: u32, color: Rgb) -> Self {
        let count = (width.max(1) as usize) * (height.max(1) as usize);
        Self {
            name: name.into(),
            width: width.max(1),
            height: height.max(1),
            pixels: color.repeat(count),
        }
    }

    /// Flat magenta stand-in for an unresolved tile.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::solid("missing", 256, 256, PLACEHOLDER_COLOR)
    }

    /// Wrap a decoded texture.
    #[must_use]
    pub fn from_decoded(name: impl Into<String>, texture: DecodedTexture) -> Option<Self> {
        Self::new(name, texture.width, texture.height, texture.data)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color of the texel at `(x, y)`. Coordinates must be in range.
    #[must_use]
    pub fn pixel_at(&self, x: u32, y: u32) -> Rgb {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Texture-space advance per grid cell on each axis.
    ///
    /// A 256-texel texture at the default of 64 gives 0.25, i.e. one
    /// repetition every four cells.
    #[must_use]
    pub fn uv_scale(&self, world_units_per_repeat: f64) -> DVec2 {
        DVec2::new(
            world_units_per_repeat / f64::from(self.width),
            world_units_per_repeat / f64::from(self.height),
        )
    }
}

/// Maps tile indices to textures.
pub trait AssetResolver {
    /// Look up the texture for `index`, or `None` if it is unavailable.
    fn resolve(&self, index: u8) -> Option<TileAsset>;
}

impl<F> AssetResolver for F
where
    F: Fn(u8) -> Option<TileAsset>,
{
    fn resolve(&self, index: u8) -> Option<TileAsset> {
        self(index)
    }
}

/// A resolver backed by textures held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    assets: HashMap<u8, TileAsset>,
}

impl MemoryResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the texture for `index`, replacing any previous one.
    pub fn insert(&mut self, index: u8, asset: TileAsset) {
        self.assets.insert(index, asset);
    }

    /// Builder-style [`MemoryResolver::insert`].
    #[must_use]
    pub fn with(mut self, index: u8, asset: TileAsset) -> Self {
        self.insert(index, asset);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetResolver for MemoryResolver {
    fn resolve(&self, index: u8) -> Option<TileAsset> {
        self.assets.get(&index).cloned()
    }
}
