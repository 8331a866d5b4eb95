//! Tile index naming.
//!
//! Indices 0-13 name the base tile set; every higher index is an
//! `ExtTileNN` texture numbered from 1.

/// Tile index of the animated water texture.
pub const WATER_TILE_INDEX: u8 = 5;

/// Names of the base tile set, by index.
const BASE_TILE_NAMES: [&str; 14] = [
    "TileGrass01",
    "TileGrass02",
    "TileGround01",
    "TileGround02",
    "TileGround03",
    "TileWater01",
    "TileWood01",
    "TileRock01",
    "TileRock02",
    "TileRock03",
    "TileRock04",
    "TileRock05",
    "TileRock06",
    "TileRock07",
];

/// Texture file stem for a tile index.
#[must_use]
pub fn tile_name(index: u8) -> String {
    match BASE_TILE_NAMES.get(usize::from(index)) {
        Some(name) => (*name).to_string(),
        None => format!("ExtTile{:02}", usize::from(index) - BASE_TILE_NAMES.len() + 1),
    }
}

/// Whether a tile receives the water scroll and wave animation.
///
/// Either the fixed water index, or any texture whose name mentions water.
#[must_use]
pub fn is_water(index: u8, name: &str) -> bool {
    index == WATER_TILE_INDEX || name.to_ascii_lowercase().contains("water")
}
