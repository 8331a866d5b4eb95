//! Resolved tile texture cache.
//!
//! The cache is filled by a single-threaded [`TextureCache::preload`] pass
//! before any pixel work starts. Each index is resolved at most once, and
//! afterwards the cache is only read, so render workers can share it
//! without locking.

use crate::catalog;
use crate::resolver::{AssetResolver, TileAsset};

/// A cached texture together with its animation flag.
#[derive(Debug, Clone)]
pub struct CachedTile {
    asset: TileAsset,
    water: bool,
    missing: bool,
}

impl CachedTile {
    fn resolved(index: u8, asset: TileAsset) -> Self {
        let water = catalog::is_water(index, asset.name());
        Self {
            asset,
            water,
            missing: false,
        }
    }

    fn missing(index: u8) -> Self {
        Self {
            asset: TileAsset::placeholder(),
            water: index == catalog::WATER_TILE_INDEX,
            missing: true,
        }
    }

    #[must_use]
    pub fn asset(&self) -> &TileAsset {
        &self.asset
    }

    /// Whether sampling this tile applies the water animation.
    #[must_use]
    pub fn is_water(&self) -> bool {
        self.water
    }

    /// Whether the resolver had no texture and the placeholder stands in.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.missing
    }
}

/// Tile index to resolved texture map.
#[derive(Debug, Clone)]
pub struct TextureCache {
    entries: Vec<Option<CachedTile>>,
    placeholder: CachedTile,
}

impl TextureCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![None; usize::from(u8::MAX) + 1],
            // Not the water index, so lookups of never-preloaded tiles are static.
            placeholder: CachedTile::missing(0),
        }
    }

    /// Resolve every index in `indices` that is not cached yet.
    ///
    /// Misses are cached as the placeholder and logged once per index.
    ///
    /// # Returns
    ///
    /// The number of indices newly resolved (hits and misses).
    pub fn preload<R, I>(&mut self, resolver: &R, indices: I) -> usize
    where
        R: AssetResolver + ?Sized,
        I: IntoIterator<Item = u8>,
    {
        let mut resolved = 0;
        for index in indices {
            let slot = &mut self.entries[usize::from(index)];
            if slot.is_some() {
                continue;
            }

            let tile = if let Some(asset) = resolver.resolve(index) {
                tracing::trace!(
                    index,
                    name = asset.name(),
                    width = asset.width(),
                    height = asset.height(),
                    "Resolved tile texture"
                );
                CachedTile::resolved(index, asset)
            } else {
                tracing::warn!(
                    index,
                    name = %catalog::tile_name(index),
                    "Tile texture not found, using placeholder"
                );
                CachedTile::missing(index)
            };

            *slot = Some(tile);
            resolved += 1;
        }
        resolved
    }

    /// Cached tile for `index`, or the placeholder if it was never preloaded.
    #[must_use]
    pub fn get(&self, index: u8) -> &CachedTile {
        self.entries[usize::from(index)]
            .as_ref()
            .unwrap_or(&self.placeholder)
    }

    /// Whether `index` has been preloaded.
    #[must_use]
    pub fn contains(&self, index: u8) -> bool {
        self.entries[usize::from(index)].is_some()
    }

    /// Number of preloaded indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of preloaded indices that fell back to the placeholder.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|tile| tile.is_missing())
            .count()
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}
