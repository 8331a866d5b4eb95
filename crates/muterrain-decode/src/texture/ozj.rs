//! OZJ (prefixed JPEG) texture decoding.

use crate::error::{DecodeError, DecodeResult};
use crate::texture::DecodedTexture;

/// Bytes preceding the JPEG stream.
///
/// The prefix is skipped unconditionally, even when the file already starts
/// with a JPEG marker.
const OZJ_PREFIX_LEN: usize = 24;

/// Decode OZJ data to RGB pixels.
///
/// # Errors
///
/// Returns an error if the file is no longer than its prefix or the JPEG
/// stream fails to decode.
pub fn decode_ozj_to_rgb(data: &[u8]) -> DecodeResult<DecodedTexture> {
    if data.len() <= OZJ_PREFIX_LEN {
        return Err(DecodeError::TooSmall {
            expected: OZJ_PREFIX_LEN + 1,
            actual: data.len(),
        });
    }

    let image = image::load_from_memory_with_format(&data[OZJ_PREFIX_LEN..], image::ImageFormat::Jpeg)
        .map_err(|e| DecodeError::InvalidFormat {
            context: "ozj",
            detail: format!("failed to decode JPEG: {e}"),
        })?;

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(DecodedTexture::new(rgb.into_raw(), width, height))
}
