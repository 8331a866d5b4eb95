//! Per-cell layer selection and per-pixel alpha compositing.
//!
//! Every cell is a quad whose four corners are grid vertices:
//!
//! ```text
//! c1 = (x,   y  )    c2 = (x+1, y  )
//! c4 = (x,   y+1)    c3 = (x+1, y+1)
//! ```
//!
//! Corner coordinates are clamped to the grid, never wrapped. Texture
//! indices always come from `c1`; the alpha of each corner is bilinearly
//! interpolated across the cell to blend the overlay onto the base.

use std::time::Instant;

use glam::{DVec2, IVec2};
use muterrain_decode::{AttributeGrid, NO_OVERLAY, Symmetry, TerrainGrid};
use rayon::prelude::*;

use crate::cache::TextureCache;
use crate::config::{RenderConfig, RenderRegion};
use crate::error::{Error, Result};
use crate::resolver::{AssetResolver, Rgb};
use crate::sampler::TextureSampler;

/// Interpolated alpha at or below this value skips the overlay sample.
const MIN_BLEND_ALPHA: f64 = 0.001;

/// An RGB8 framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RenderTarget {
    /// A black target of the given size.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 3],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`. Coordinates must be in range.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = (y * self.width + x) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Row-major RGB bytes.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Convert into an `image` buffer for encoding.
    ///
    /// Returns `None` if a dimension exceeds `u32`.
    #[must_use]
    pub fn into_image(self) -> Option<image::RgbImage> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        image::RgbImage::from_raw(width, height, self.pixels)
    }
}

/// Grid indices of a cell's four corners, each axis clamped to `[0, size)`.
///
/// Order: `(x, y)`, `(x+1, y)`, `(x+1, y+1)`, `(x, y+1)`.
#[must_use]
pub fn corner_indices(size: usize, cell: IVec2) -> [usize; 4] {
    let max = size.saturating_sub(1) as i64;
    let clamp = |v: i32| i64::from(v).clamp(0, max) as usize;
    let x0 = clamp(cell.x);
    let x1 = clamp(cell.x.saturating_add(1));
    let y0 = clamp(cell.y);
    let y1 = clamp(cell.y.saturating_add(1));
    [
        y0 * size + x0,
        y0 * size + x1,
        y1 * size + x1,
        y1 * size + x0,
    ]
}

/// Bilinear interpolation of corner alphas `[a1, a2, a3, a4]` at `uv`.
#[must_use]
pub fn interpolate_alpha(corners: [f64; 4], uv: DVec2) -> f64 {
    let [a1, a2, a3, a4] = corners;
    let top = a1 * (1.0 - uv.x) + a2 * uv.x;
    let bottom = a4 * (1.0 - uv.x) + a3 * uv.x;
    top * (1.0 - uv.y) + bottom * uv.y
}

/// Linear blend of two colors, truncated and clamped per channel.
#[must_use]
pub fn blend(base: Rgb, overlay: Rgb, alpha: f64) -> Rgb {
    let mix = |b: u8, o: u8| {
        let value = f64::from(b) * (1.0 - alpha) + f64::from(o) * alpha;
        // Truncate toward zero, then clamp.
        (value as i64).clamp(0, 255) as u8
    };
    [
        mix(base[0], overlay[0]),
        mix(base[1], overlay[1]),
        mix(base[2], overlay[2]),
    ]
}

/// Textures chosen for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellLayers {
    /// Tile drawn underneath.
    pub base: u8,
    /// Tile blended on top, if the alpha pass runs.
    pub overlay: Option<u8>,
    /// Corner alphas `[a1, a2, a3, a4]`.
    pub corner_alpha: [f64; 4],
}

/// Pick the base and overlay textures for `cell`.
///
/// With the shortcut enabled, a cell whose four corner alphas are all 1
/// draws the overlay tile of `c1` as its only layer. Otherwise the base
/// tile of `c1` is drawn and the overlay of `c1` is blended on top when it
/// exists and at least one corner alpha is positive.
#[must_use]
pub fn select_layers(terrain: &TerrainGrid, cell: IVec2, saturated_shortcut: bool) -> CellLayers {
    let corners = corner_indices(terrain.size(), cell);
    let alpha = terrain.alpha_layer();
    let corner_alpha = corners.map(|i| alpha[i]);
    let c1 = corners[0];
    let overlay = terrain.overlay_layer()[c1];

    let saturated = corner_alpha.iter().all(|&a| a >= 1.0);
    if saturated_shortcut && saturated {
        return CellLayers {
            base: overlay,
            overlay: None,
            corner_alpha,
        };
    }

    let any_alpha = corner_alpha.iter().any(|&a| a > 0.0);
    CellLayers {
        base: terrain.base_layer()[c1],
        overlay: (overlay != NO_OVERLAY && any_alpha).then_some(overlay),
        corner_alpha,
    }
}

/// Distinct tile indices drawn by the in-grid cells of `region`.
#[must_use]
pub fn region_tile_indices(
    terrain: &TerrainGrid,
    region: &RenderRegion,
    saturated_shortcut: bool,
) -> Vec<u8> {
    let mut used = [false; 256];
    for cell in region.cells().filter(|c| in_grid(terrain.size(), *c)) {
        let layers = select_layers(terrain, cell, saturated_shortcut);
        used[usize::from(layers.base)] = true;
        if let Some(overlay) = layers.overlay {
            used[usize::from(overlay)] = true;
        }
    }
    (0..=u8::MAX).filter(|&i| used[usize::from(i)]).collect()
}

fn in_grid(size: usize, cell: IVec2) -> bool {
    cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < size && (cell.y as usize) < size
}

/// Render `region` of the terrain into a fresh target.
///
/// Textures used by the region are resolved once through `resolver`
/// before the parallel pixel fill starts.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the two grids do
/// not match each other or `config.grid_size`.
pub fn render<R>(
    terrain: &TerrainGrid,
    attributes: &AttributeGrid,
    resolver: &R,
    config: &RenderConfig,
    region: RenderRegion,
) -> Result<RenderTarget>
where
    R: AssetResolver + ?Sized,
{
    check_inputs(terrain, attributes, config)?;

    let started = Instant::now();
    let indices = region_tile_indices(terrain, &region, config.saturated_layer_shortcut);
    let mut cache = TextureCache::new();
    let resolved = cache.preload(resolver, indices);
    tracing::debug!(
        resolved,
        missing = cache.missing_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Preloaded tile textures"
    );

    render_with_cache(terrain, attributes, &cache, config, region)
}

/// Render `region` using an already-preloaded cache.
///
/// Indices missing from `cache` sample as the placeholder color.
pub fn render_with_cache(
    terrain: &TerrainGrid,
    attributes: &AttributeGrid,
    cache: &TextureCache,
    config: &RenderConfig,
    region: RenderRegion,
) -> Result<RenderTarget> {
    check_inputs(terrain, attributes, config)?;

    let started = Instant::now();
    let resolution = config.tile_resolution as usize;
    let edge = region.pixel_size(config.tile_resolution);
    let mut target = RenderTarget::new(edge, edge);

    tracing::info!(
        origin_x = region.origin.x,
        origin_y = region.origin.y,
        tiles = region.size,
        width = edge,
        height = edge,
        time_ms = config.time_ms,
        "Rendering terrain"
    );

    if edge > 0 {
        let compositor = Compositor {
            terrain,
            attributes,
            sampler: TextureSampler::new(cache, config.world_units_per_repeat),
            config,
        };
        let band_len = resolution * edge * 3;

        // One band per row of tiles; bands never overlap.
        target
            .pixels
            .par_chunks_mut(band_len)
            .enumerate()
            .for_each(|(row, band)| {
                for column in 0..region.size as usize {
                    let cell = region.origin + IVec2::new(column as i32, row as i32);
                    compositor.fill_cell(cell, band, column * resolution, edge);
                }
            });
    }

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Terrain render complete"
    );
    Ok(target)
}

fn check_inputs(
    terrain: &TerrainGrid,
    attributes: &AttributeGrid,
    config: &RenderConfig,
) -> Result<()> {
    config.validate()?;
    if terrain.size() != attributes.size() {
        return Err(Error::GridMismatch {
            terrain: terrain.size(),
            attributes: attributes.size(),
        });
    }
    if terrain.size() != config.grid_size {
        return Err(Error::InvalidConfig {
            detail: format!(
                "grid size {} does not match terrain size {}",
                config.grid_size,
                terrain.size()
            ),
        });
    }
    Ok(())
}

/// Read-only state shared by all render workers.
struct Compositor<'a> {
    terrain: &'a TerrainGrid,
    attributes: &'a AttributeGrid,
    sampler: TextureSampler<'a>,
    config: &'a RenderConfig,
}

impl Compositor<'_> {
    /// Fill one cell into a band of `resolution` output rows.
    ///
    /// `x_offset` is the cell's first pixel column and `stride` the band width
    /// in pixels. Cells outside the grid are left untouched.
    fn fill_cell(&self, cell: IVec2, band: &mut [u8], x_offset: usize, stride: usize) {
        let size = self.terrain.size();
        if !in_grid(size, cell) {
            return;
        }

        let layers = select_layers(self.terrain, cell, self.config.saturated_layer_shortcut);
        let symmetry = if self.config.use_symmetry {
            self.attributes
                .cell(cell.x as usize, cell.y as usize)
                .map(|a| a.symmetry)
                .unwrap_or_default()
        } else {
            Symmetry::default()
        };

        let resolution = self.config.tile_resolution as usize;
        let time_ms = self.config.time_ms;
        let inv = 1.0 / resolution as f64;

        for py in 0..resolution {
            let v = (py as f64 + 0.5) * inv;
            for px in 0..resolution {
                let u = (px as f64 + 0.5) * inv;
                let uv = DVec2::new(u, v);
                let (su, sv) = symmetry.apply(u, v);
                let sample_uv = DVec2::new(su, sv);

                let mut color = self.sampler.sample(layers.base, sample_uv, cell, time_ms);
                if let Some(overlay) = layers.overlay {
                    let alpha = interpolate_alpha(layers.corner_alpha, uv);
                    if alpha > MIN_BLEND_ALPHA {
                        let top = self.sampler.sample(overlay, sample_uv, cell, time_ms);
                        color = blend(color, top, alpha);
                    }
                }

                let i = (py * stride + x_offset + px) * 3;
                band[i..i + 3].copy_from_slice(&color);
            }
        }
    }
}
