//! Render configuration and region selection.

use glam::IVec2;
use muterrain_decode::DEFAULT_GRID_SIZE;

use crate::error::{Error, Result};

/// Default output pixels per tile edge.
pub const DEFAULT_TILE_RESOLUTION: u32 = 16;

/// Default world units spanned by one texture repetition.
pub const DEFAULT_WORLD_UNITS_PER_REPEAT: f64 = 64.0;

/// Parameters of a single render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Expected grid edge length in cells.
    pub grid_size: usize,
    /// Output pixels per tile edge.
    pub tile_resolution: u32,
    /// Elapsed time driving the water animation, in milliseconds.
    pub time_ms: u64,
    /// Apply per-cell attribute symmetry to sampled coordinates.
    pub use_symmetry: bool,
    /// World units spanned by one texture repetition.
    pub world_units_per_repeat: f64,
    /// Draw fully saturated cells from the overlay layer alone.
    pub saturated_layer_shortcut: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            tile_resolution: DEFAULT_TILE_RESOLUTION,
            time_ms: 0,
            use_symmetry: false,
            world_units_per_repeat: DEFAULT_WORLD_UNITS_PER_REPEAT,
            saturated_layer_shortcut: true,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    #[must_use]
    pub fn with_tile_resolution(mut self, tile_resolution: u32) -> Self {
        self.tile_resolution = tile_resolution;
        self
    }

    #[must_use]
    pub fn with_time_ms(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    #[must_use]
    pub fn with_symmetry(mut self, use_symmetry: bool) -> Self {
        self.use_symmetry = use_symmetry;
        self
    }

    #[must_use]
    pub fn with_world_units_per_repeat(mut self, units: f64) -> Self {
        self.world_units_per_repeat = units;
        self
    }

    #[must_use]
    pub fn with_saturated_layer_shortcut(mut self, enabled: bool) -> Self {
        self.saturated_layer_shortcut = enabled;
        self
    }

    /// Check that the configuration can drive a render.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidConfig {
                detail: "grid size must be positive".to_string(),
            });
        }
        if self.tile_resolution == 0 {
            return Err(Error::InvalidConfig {
                detail: "tile resolution must be positive".to_string(),
            });
        }
        if !self.world_units_per_repeat.is_finite() || self.world_units_per_repeat <= 0.0 {
            return Err(Error::InvalidConfig {
                detail: format!(
                    "world units per repeat must be positive and finite, got {}",
                    self.world_units_per_repeat
                ),
            });
        }
        Ok(())
    }
}

/// A square block of cells to render.
///
/// The region may extend past the grid; cells outside it stay black.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRegion {
    /// Top-left cell.
    pub origin: IVec2,
    /// Edge length in cells.
    pub size: u32,
}

impl RenderRegion {
    #[must_use]
    pub fn new(origin: IVec2, size: u32) -> Self {
        Self { origin, size }
    }

    /// The whole of an `n * n` grid.
    #[must_use]
    pub fn full(n: usize) -> Self {
        Self {
            origin: IVec2::ZERO,
            size: n as u32,
        }
    }

    /// `2 * radius` cells on each axis, starting `radius` cells before `center`.
    ///
    /// Returns `None` if the size or the origin does not fit in cell
    /// coordinates.
    #[must_use]
    pub fn centered(center: IVec2, radius: u32) -> Option<Self> {
        let offset = i32::try_from(radius).ok()?;
        let size = radius.checked_mul(2)?;
        let origin = IVec2::new(
            center.x.checked_sub(offset)?,
            center.y.checked_sub(offset)?,
        );
        Some(Self { origin, size })
    }

    /// Iterate over every cell of the region, row by row.
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |dy| (0..size).map(move |dx| self.origin + IVec2::new(dx, dy)))
    }

    /// Output image edge length in pixels.
    #[must_use]
    pub fn pixel_size(&self, tile_resolution: u32) -> usize {
        self.size as usize * tile_resolution as usize
    }
}
