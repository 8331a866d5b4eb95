//! OZT (prefixed TGA) texture decoding.

use crate::error::{DecodeError, DecodeResult};
use crate::texture::DecodedTexture;

/// Bytes preceding the TGA stream.
const OZT_PREFIX_LEN: usize = 4;

/// Decode OZT data to RGB pixels.
///
/// The 4-byte prefix is skipped and the rest decoded as TGA, so both
/// uncompressed and RLE true-color images work in either row order.
/// Alpha is dropped.
///
/// # Errors
///
/// Returns an error if the file is no longer than its prefix or the TGA
/// stream fails to decode.
pub fn decode_ozt_to_rgb(data: &[u8]) -> DecodeResult<DecodedTexture> {
    if data.len() <= OZT_PREFIX_LEN {
        return Err(DecodeError::TooSmall {
            expected: OZT_PREFIX_LEN + 1,
            actual: data.len(),
        });
    }

    let image = image::load_from_memory_with_format(&data[OZT_PREFIX_LEN..], image::ImageFormat::Tga)
        .map_err(|e| DecodeError::InvalidFormat {
            context: "ozt",
            detail: format!("failed to decode TGA: {e}"),
        })?;

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(DecodedTexture::new(rgb.into_raw(), width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// TGA image type for uncompressed true-color data.
    const TGA_TRUE_COLOR: u8 = 2;
    /// TGA image type for run-length encoded true-color data.
    const TGA_TRUE_COLOR_RLE: u8 = 10;
    /// Descriptor bit set when rows are stored top to bottom.
    const TGA_TOP_DOWN: u8 = 0x20;

    fn ozt(image_type: u8, width: u16, height: u16, depth: u8, descriptor: u8, body: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; OZT_PREFIX_LEN];
        let mut header = [0u8; 18];
        header[2] = image_type;
        header[12..14].copy_from_slice(&width.to_le_bytes());
        header[14..16].copy_from_slice(&height.to_le_bytes());
        header[16] = depth;
        header[17] = descriptor;
        data.extend_from_slice(&header);
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn test_decode_ozt_32bit_top_down() {
        // 2x1 BGRA: blue, then red.
        let data = ozt(
            TGA_TRUE_COLOR,
            2,
            1,
            32,
            TGA_TOP_DOWN | 8,
            &[255, 0, 0, 255, 0, 0, 255, 255],
        );
        let texture = decode_ozt_to_rgb(&data).unwrap();
        assert!(texture.is_valid());
        assert_eq!(texture.data, vec![0, 0, 255, 255, 0, 0]);
    }

    #[test]
    fn test_decode_ozt_bottom_up_is_flipped() {
        // 1x2 BGR, stored bottom row first: green (bottom), then white (top).
        let data = ozt(TGA_TRUE_COLOR, 1, 2, 24, 0, &[0, 255, 0, 255, 255, 255]);
        let texture = decode_ozt_to_rgb(&data).unwrap();
        assert_eq!(texture.width, 1);
        assert_eq!(texture.height, 2);
        assert_eq!(texture.data, vec![255, 255, 255, 0, 255, 0]);
    }

    #[test]
    fn test_decode_ozt_skips_id_field() {
        let mut data = ozt(TGA_TRUE_COLOR, 1, 1, 24, TGA_TOP_DOWN, &[]);
        data[OZT_PREFIX_LEN] = 2;
        data.extend_from_slice(&[0xEE, 0xEE, 10, 20, 30]);
        let texture = decode_ozt_to_rgb(&data).unwrap();
        assert_eq!(texture.data, vec![30, 20, 10]);
    }

    #[test]
    fn test_decode_ozt_run_length_encoded() {
        // One run packet repeating a single BGR pixel three times.
        let data = ozt(TGA_TRUE_COLOR_RLE, 3, 1, 24, TGA_TOP_DOWN, &[0x82, 30, 20, 10]);
        let texture = decode_ozt_to_rgb(&data).unwrap();
        assert_eq!(texture.data, [10, 20, 30].repeat(3));
    }

    #[test]
    fn test_decode_ozt_truncated_pixels() {
        let data = ozt(TGA_TRUE_COLOR, 2, 2, 32, 8, &[0; 7]);
        assert!(matches!(
            decode_ozt_to_rgb(&data),
            Err(DecodeError::InvalidFormat { context: "ozt", .. })
        ));
    }

    #[test]
    fn test_decode_ozt_prefix_only() {
        assert!(matches!(
            decode_ozt_to_rgb(&[0; OZT_PREFIX_LEN]),
            Err(DecodeError::TooSmall { .. })
        ));
    }

    #[test]
    fn test_decode_ozt_garbage_header() {
        assert!(matches!(
            decode_ozt_to_rgb(&[0; 10]),
            Err(DecodeError::InvalidFormat { context: "ozt", .. })
        ));
    }
}
