//! World-space texture sampling.
//!
//! Terrain textures are not stretched per cell. Each cell maps to a window
//! of a repeating texture anchored in world space:
//!
//! ```text
//! eff_u = (cell_x + u) * scale_u [+ water_scroll]
//! eff_v = (cell_y + v) * scale_v [+ water_wave]
//! texel = floor(fract(eff) * size) mod size
//! ```
//!
//! where `scale = world_units_per_repeat / texture_size`. Lookups are
//! nearest-neighbour with wrap addressing.

use glam::{DVec2, IVec2};

use crate::cache::TextureCache;
use crate::resolver::Rgb;

/// Period of the water scroll, in milliseconds.
const WATER_SCROLL_PERIOD_MS: u64 = 20_000;

/// Texture-space scroll per millisecond of the water scroll.
const WATER_SCROLL_RATE: f64 = 0.000_05;

/// Period of the wind phase, in milliseconds.
const WIND_PERIOD_MS: u64 = 720_000;

/// Wind phase advance per millisecond.
const WIND_RATE: f64 = 0.002;

/// Wind phase advance per world unit along X.
const WAVE_FREQUENCY: f64 = 5.0;

/// Wave amplitude before conversion to texture space.
const WAVE_AMPLITUDE: f64 = 10.0;

/// Conversion of the wave amplitude to texture space.
const WAVE_TO_UV: f64 = 0.002;

/// Horizontal water scroll at `time_ms`.
///
/// Periodic with period 20 000 ms.
#[must_use]
pub fn water_scroll(time_ms: u64) -> f64 {
    (time_ms % WATER_SCROLL_PERIOD_MS) as f64 * WATER_SCROLL_RATE
}

/// Vertical water wave at world X position `world_x` and `time_ms`.
#[must_use]
pub fn water_wave(time_ms: u64, world_x: f64) -> f64 {
    let wind_phase = (time_ms % WIND_PERIOD_MS) as f64 * WIND_RATE;
    (wind_phase + world_x * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE * WAVE_TO_UV
}

/// Samples preloaded tile textures at world positions.
#[derive(Debug, Clone, Copy)]
pub struct TextureSampler<'a> {
    cache: &'a TextureCache,
    world_units_per_repeat: f64,
}

impl<'a> TextureSampler<'a> {
    #[must_use]
    pub fn new(cache: &'a TextureCache, world_units_per_repeat: f64) -> Self {
        Self {
            cache,
            world_units_per_repeat,
        }
    }

    /// Sample tile `index` at sub-tile position `uv` within `cell`.
    ///
    /// `uv` components are in `[0, 1)`. Tiles that were never resolved
    /// sample as the placeholder color.
    #[must_use]
    pub fn sample(&self, index: u8, uv: DVec2, cell: IVec2, time_ms: u64) -> Rgb {
        let tile = self.cache.get(index);
        let asset = tile.asset();
        let scale = asset.uv_scale(self.world_units_per_repeat);
        let world = cell.as_dvec2() + uv;

        let mut eff = world * scale;
        if tile.is_water() {
            eff.x += water_scroll(time_ms);
            eff.y += water_wave(time_ms, world.x);
        }

        let x = wrap_texel(eff.x, asset.width());
        let y = wrap_texel(eff.y, asset.height());
        asset.pixel_at(x, y)
    }
}

/// Wrap a texture coordinate into `[0, 1)` and pick the nearest texel.
fn wrap_texel(coord: f64, size: u32) -> u32 {
    let wrapped = coord.rem_euclid(1.0);
    let size = i64::from(size);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    ((wrapped * size as f64).floor() as i64).rem_euclid(size) as u32
}
