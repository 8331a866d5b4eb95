//! Locating and loading a world's terrain files.

use std::fmt;
use std::path::{Path, PathBuf};

use muterrain::{AttributeGrid, TerrainGrid};
use muterrain_decode::{DEFAULT_GRID_SIZE, DecodeError, load_attributes, load_terrain_map};

/// Errors raised while loading world files.
#[derive(Debug)]
pub enum WorldError {
    /// None of the candidate file names exist.
    NotFound { dir: PathBuf, candidates: Vec<String> },
    /// A file exists but could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// A file was read but failed to decode.
    Decode { path: PathBuf, source: DecodeError },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { dir, candidates } => write!(
                f,
                "none of {} found in {}",
                candidates.join(", "),
                dir.display()
            ),
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Decode { path, source } => {
                write!(f, "failed to decode {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// File names tried for a world's `extension` file, in order.
fn candidates(world: u32, extension: &str) -> Vec<String> {
    vec![
        format!("EncTerrain{world}.{extension}"),
        format!("Terrain{world}.{extension}"),
        format!("Terrain.{extension}"),
    ]
}

/// First existing candidate file in `dir`.
fn locate(dir: &Path, world: u32, extension: &str) -> Result<PathBuf, WorldError> {
    let names = candidates(world, extension);
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| WorldError::NotFound {
            dir: dir.to_path_buf(),
            candidates: names,
        })
}

fn read(path: &Path) -> Result<Vec<u8>, WorldError> {
    std::fs::read(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decoded terrain and attribute grids of one world.
#[derive(Debug)]
pub struct World {
    pub terrain: TerrainGrid,
    pub attributes: AttributeGrid,
}

impl World {
    /// Load and decode the map and attribute files of `world` from `dir`.
    pub fn load(dir: &Path, world: u32) -> Result<Self, WorldError> {
        let map_path = locate(dir, world, "map")?;
        let terrain = load_terrain_map(&read(&map_path)?, DEFAULT_GRID_SIZE).map_err(|source| {
            WorldError::Decode {
                path: map_path.clone(),
                source,
            }
        })?;
        let header = terrain.header();
        tracing::info!(
            path = %map_path.display(),
            version = ?header.version,
            map_number = ?header.map_number,
            "Loaded terrain map"
        );

        let att_path = locate(dir, world, "att")?;
        let attributes =
            load_attributes(&read(&att_path)?, DEFAULT_GRID_SIZE).map_err(|source| {
                WorldError::Decode {
                    path: att_path.clone(),
                    source,
                }
            })?;
        tracing::info!(
            path = %att_path.display(),
            layout = ?attributes.layout(),
            "Loaded attributes"
        );

        Ok(Self {
            terrain,
            attributes,
        })
    }
}
