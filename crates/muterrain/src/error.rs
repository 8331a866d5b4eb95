//! Error types for the muterrain crate.

use std::fmt;

/// Result type for muterrain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering terrain.
#[derive(Debug)]
pub enum Error {
    /// Map or attribute decoding failed.
    Decode(muterrain_decode::DecodeError),
    /// Terrain and attribute grids have different edge lengths.
    GridMismatch {
        /// Edge length of the terrain grid.
        terrain: usize,
        /// Edge length of the attribute grid.
        attributes: usize,
    },
    /// Render configuration is unusable.
    InvalidConfig {
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::GridMismatch {
                terrain,
                attributes,
            } => {
                write!(
                    f,
                    "grid size mismatch: terrain is {terrain}x{terrain}, attributes are {attributes}x{attributes}"
                )
            }
            Error::InvalidConfig { detail } => write!(f, "invalid render config: {detail}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<muterrain_decode::DecodeError> for Error {
    fn from(e: muterrain_decode::DecodeError) -> Self {
        Error::Decode(e)
    }
}
