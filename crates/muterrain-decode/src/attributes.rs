//! Terrain attribute (symmetry and collision) decoding.

use crate::error::{DecodeError, DecodeResult};
use crate::grid::{AttributeGrid, AttributeLayout};

/// Header length of the word layout.
const WORD_HEADER_LEN: usize = 4;

/// Decode a decrypted and unmasked attribute buffer.
///
/// The layout is chosen from the total length:
/// - `4 + 2*N*N` bytes: word layout. The 4-byte header is skipped and the
///   low byte of each little-endian cell word is the attribute byte. The
///   high byte is reserved and discarded.
/// - at least `N*N` bytes: byte layout. The last `N*N` bytes are the
///   attribute bytes.
///
/// # Arguments
///
/// * `data` - Attribute file contents after decryption and mask removal
/// * `size` - Grid edge length `N`
///
/// # Errors
///
/// Returns [`DecodeError::UnsupportedAttributeLayout`] if the length
/// matches neither layout.
pub fn decode_attributes(data: &[u8], size: usize) -> DecodeResult<AttributeGrid> {
    let cells = size * size;

    if data.len() == WORD_HEADER_LEN + cells * 2 {
        let bytes: Vec<u8> = data[WORD_HEADER_LEN..]
            .chunks_exact(2)
            .map(|word| word[0])
            .collect();
        return Ok(AttributeGrid::from_bytes(size, AttributeLayout::Word, &bytes));
    }

    if data.len() >= cells {
        let bytes = &data[data.len() - cells..];
        return Ok(AttributeGrid::from_bytes(size, AttributeLayout::Byte, bytes));
    }

    Err(DecodeError::UnsupportedAttributeLayout {
        len: data.len(),
        grid_size: size,
    })
}
