//! Terrain map (layer and alpha grid) decoding.

use crate::error::{DecodeError, DecodeResult};
use crate::grid::{MapHeader, TerrainGrid};

/// Decode a decrypted map buffer into a terrain grid.
///
/// # Format
///
/// ```text
/// [header: 0..=2 bytes][base: N*N][overlay: N*N][alpha: N*N]
/// ```
///
/// Header length differs between map variants, so the payload is located
/// by taking the last `3 * N * N` bytes of the buffer. Alpha bytes are
/// divided by 255 at decode time.
///
/// # Arguments
///
/// * `data` - Decrypted map file contents
/// * `size` - Grid edge length `N`
///
/// # Errors
///
/// Returns [`DecodeError::TooSmall`] if the buffer is shorter than the payload.
pub fn decode_terrain_map(data: &[u8], size: usize) -> DecodeResult<TerrainGrid> {
    let cells = size * size;
    let payload_len = cells * 3;
    if data.len() < payload_len {
        return Err(DecodeError::TooSmall {
            expected: payload_len,
            actual: data.len(),
        });
    }

    let (header_bytes, payload) = data.split_at(data.len() - payload_len);
    let (base, rest) = payload.split_at(cells);
    let (overlay, alpha) = rest.split_at(cells);

    let alpha = alpha.iter().map(|&a| f64::from(a) / 255.0).collect();

    // Normalized alpha is always in [0, 1] and every layer has N*N entries.
    let grid = TerrainGrid::from_layers(size, base.to_vec(), overlay.to_vec(), alpha).ok_or(
        DecodeError::InvalidFormat {
            context: "map",
            detail: "layer lengths disagree".to_string(),
        },
    )?;

    Ok(grid.with_header(parse_header(header_bytes)))
}

fn parse_header(bytes: &[u8]) -> MapHeader {
    match bytes {
        [] => MapHeader::default(),
        [version] => MapHeader {
            version: Some(*version),
            map_number: None,
        },
        [.., version, map_number] => MapHeader {
            version: Some(*version),
            map_number: Some(*map_number),
        },
    }
}
