//! Decoded terrain grids.
//!
//! Both grids are square, row-major (`index = y * size + x`) and immutable
//! once decoded.

/// Default edge length of a terrain grid in cells.
pub const DEFAULT_GRID_SIZE: usize = 256;

/// Overlay index meaning "this cell has no second layer".
pub const NO_OVERLAY: u8 = 255;

/// Header bytes that precede the map payload.
///
/// Map variants carry zero, one or two header bytes. With two bytes the
/// first is the format version and the second the map number; with one
/// byte only the version is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapHeader {
    pub version: Option<u8>,
    pub map_number: Option<u8>,
}

/// One cell of the terrain layer grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainCell {
    /// Base-layer tile index.
    pub base: u8,
    /// Overlay-layer tile index ([`NO_OVERLAY`] if absent).
    pub overlay: u8,
    /// Overlay blend weight at this grid vertex, normalized to `[0, 1]`.
    pub alpha: f64,
}

impl TerrainCell {
    /// Whether the cell carries an overlay layer.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.overlay != NO_OVERLAY
    }
}

/// Base layer, overlay layer and alpha grids of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    size: usize,
    header: MapHeader,
    base: Vec<u8>,
    overlay: Vec<u8>,
    alpha: Vec<f64>,
}

impl TerrainGrid {
    /// Build a grid from already-normalized layers.
    ///
    /// Returns `None` if any layer length differs from `size * size` or an
    /// alpha value falls outside `[0, 1]`.
    #[must_use]
    pub fn from_layers(
        size: usize,
        base: Vec<u8>,
        overlay: Vec<u8>,
        alpha: Vec<f64>,
    ) -> Option<Self> {
        let cells = size * size;
        if base.len() != cells || overlay.len() != cells || alpha.len() != cells {
            return None;
        }
        if alpha.iter().any(|a| !(0.0..=1.0).contains(a)) {
            return None;
        }
        Some(Self {
            size,
            header: MapHeader::default(),
            base,
            overlay,
            alpha,
        })
    }

    pub(crate) fn with_header(mut self, header: MapHeader) -> Self {
        self.header = header;
        self
    }

    /// Edge length in cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Header bytes found in front of the payload.
    #[must_use]
    pub fn header(&self) -> MapHeader {
        self.header
    }

    /// Row-major index of `(x, y)`. Coordinates must be in range.
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<TerrainCell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let i = self.index(x, y);
        Some(TerrainCell {
            base: self.base[i],
            overlay: self.overlay[i],
            alpha: self.alpha[i],
        })
    }

    #[must_use]
    pub fn base_layer(&self) -> &[u8] {
        &self.base
    }

    #[must_use]
    pub fn overlay_layer(&self) -> &[u8] {
        &self.overlay
    }

    #[must_use]
    pub fn alpha_layer(&self) -> &[f64] {
        &self.alpha
    }
}

/// Per-cell texture symmetry code (3 bits).
///
/// - Bit 0: flip X
/// - Bit 1: flip Y
/// - Bit 2: swap axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Symmetry(u8);

impl Symmetry {
    pub const FLIP_X: u8 = 0b001;
    pub const FLIP_Y: u8 = 0b010;
    pub const SWAP_AXES: u8 = 0b100;
    const MASK: u8 = 0b111;

    /// Take the low three bits of `bits`.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn flip_x(self) -> bool {
        self.0 & Self::FLIP_X != 0
    }

    #[must_use]
    pub fn flip_y(self) -> bool {
        self.0 & Self::FLIP_Y != 0
    }

    #[must_use]
    pub fn swap_axes(self) -> bool {
        self.0 & Self::SWAP_AXES != 0
    }

    /// Transform a sub-tile coordinate.
    ///
    /// Flips are applied first, then the axis swap `(u, v) -> (1 - v, u)`.
    #[must_use]
    pub fn apply(self, u: f64, v: f64) -> (f64, f64) {
        let mut u = u;
        let mut v = v;
        if self.flip_x() {
            u = 1.0 - u;
        }
        if self.flip_y() {
            v = 1.0 - v;
        }
        if self.swap_axes() {
            (u, v) = (1.0 - v, u);
        }
        (u, v)
    }
}

/// One cell of the attribute grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeCell {
    pub symmetry: Symmetry,
    /// Collision flags, i.e. the canonical byte with bits 0-2 cleared.
    pub collision: u8,
}

impl AttributeCell {
    /// Split a canonical attribute byte into symmetry and collision parts.
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            symmetry: Symmetry::from_bits(byte),
            collision: byte & !Symmetry::MASK,
        }
    }

    /// Reassemble the canonical attribute byte.
    #[must_use]
    pub fn raw(self) -> u8 {
        self.symmetry.bits() | self.collision
    }
}

/// On-disk attribute layout a grid was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLayout {
    /// 4-byte header followed by one 16-bit word per cell.
    Word,
    /// One byte per cell, taken from the end of the buffer.
    Byte,
}

/// Symmetry and collision grid of a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeGrid {
    size: usize,
    layout: AttributeLayout,
    cells: Vec<AttributeCell>,
}

impl AttributeGrid {
    pub(crate) fn from_bytes(size: usize, layout: AttributeLayout, bytes: &[u8]) -> Self {
        Self {
            size,
            layout,
            cells: bytes.iter().copied().map(AttributeCell::from_byte).collect(),
        }
    }

    /// A grid of `size * size` cells with no symmetry and no collision flags.
    #[must_use]
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            layout: AttributeLayout::Byte,
            cells: vec![AttributeCell::default(); size * size],
        }
    }

    /// Edge length in cells.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<AttributeCell> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.cells[y * self.size + x])
    }

    #[must_use]
    pub fn cells(&self) -> &[AttributeCell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_layers_rejects_bad_lengths() {
        assert!(TerrainGrid::from_layers(2, vec![0; 4], vec![0; 4], vec![0.0; 3]).is_none());
        assert!(TerrainGrid::from_layers(2, vec![0; 4], vec![0; 4], vec![0.0; 4]).is_some());
    }

    #[test]
    fn test_from_layers_rejects_unnormalized_alpha() {
        assert!(TerrainGrid::from_layers(1, vec![0], vec![0], vec![2.0]).is_none());
    }

    #[test]
    fn test_terrain_cell_lookup() {
        let grid =
            TerrainGrid::from_layers(2, vec![1, 2, 3, 4], vec![9, 255, 9, 9], vec![0.0, 0.5, 1.0, 0.0])
                .unwrap();
        let cell = grid.cell(1, 0).unwrap();
        assert_eq!(cell.base, 2);
        assert!(!cell.has_overlay());
        assert!((cell.alpha - 0.5).abs() < f64::EPSILON);
        assert_eq!(grid.cell(0, 1).unwrap().base, 3);
        assert!(grid.cell(2, 0).is_none());
    }

    #[test]
    fn test_symmetry_bits() {
        let sym = Symmetry::from_bits(0xFD);
        assert_eq!(sym.bits(), 0b101);
        assert!(sym.flip_x());
        assert!(!sym.flip_y());
        assert!(sym.swap_axes());
    }

    #[test]
    fn test_symmetry_apply() {
        let (u, v) = Symmetry::from_bits(0).apply(0.25, 0.75);
        assert!((u - 0.25).abs() < 1e-12 && (v - 0.75).abs() < 1e-12);

        let (u, v) = Symmetry::from_bits(Symmetry::FLIP_X).apply(0.25, 0.75);
        assert!((u - 0.75).abs() < 1e-12 && (v - 0.75).abs() < 1e-12);

        let (u, v) = Symmetry::from_bits(Symmetry::FLIP_Y).apply(0.25, 0.75);
        assert!((u - 0.25).abs() < 1e-12 && (v - 0.25).abs() < 1e-12);

        // Swap: (u, v) -> (1 - v, u).
        let (u, v) = Symmetry::from_bits(Symmetry::SWAP_AXES).apply(0.25, 0.75);
        assert!((u - 0.25).abs() < 1e-12 && (v - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_attribute_cell_split() {
        let cell = AttributeCell::from_byte(0b1010_0110);
        assert_eq!(cell.symmetry.bits(), 0b110);
        assert_eq!(cell.collision, 0b1010_0000);
        assert_eq!(cell.raw(), 0b1010_0110);
    }

    #[test]
    fn test_empty_attribute_grid() {
        let grid = AttributeGrid::empty(3);
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.cells().len(), 9);
        assert_eq!(grid.cell(2, 2), Some(AttributeCell::default()));
        assert_eq!(grid.cell(3, 0), None);
    }
}
