//! Texture container decoding for terrain tiles.
//!
//! This module provides decoders for the two containers tile textures
//! ship in:
//! - OZJ: JPEG data behind a fixed 24-byte prefix
//! - OZT: TGA data behind a fixed 4-byte prefix
//!
//! Both produce tightly packed RGB pixel data, rows top to bottom.

mod ozj;
mod ozt;

pub use ozj::decode_ozj_to_rgb;
pub use ozt::decode_ozt_to_rgb;

use crate::error::DecodeResult;

/// Texture container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    /// Prefixed JPEG (`.ozj`, `.jpg`).
    Ozj,
    /// Prefixed TGA (`.ozt`, `.tga`).
    Ozt,
}

impl TextureFormat {
    /// Pick a format from a file extension, ignoring case and a leading dot.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        if ext.eq_ignore_ascii_case("ozj") || ext.eq_ignore_ascii_case("jpg") {
            Some(Self::Ozj)
        } else if ext.eq_ignore_ascii_case("ozt") || ext.eq_ignore_ascii_case("tga") {
            Some(Self::Ozt)
        } else {
            None
        }
    }
}

/// Decoded texture data.
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    /// RGB pixel data (3 bytes per pixel).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
}

impl DecodedTexture {
    /// Create a new decoded texture.
    #[must_use]
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Check if the texture data size is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }
}

/// Decode a texture file in the given container format.
pub fn decode_texture(data: &[u8], format: TextureFormat) -> DecodeResult<DecodedTexture> {
    match format {
        TextureFormat::Ozj => decode_ozj_to_rgb(data),
        TextureFormat::Ozt => decode_ozt_to_rgb(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TextureFormat::from_extension("OZJ"), Some(TextureFormat::Ozj));
        assert_eq!(TextureFormat::from_extension(".jpg"), Some(TextureFormat::Ozj));
        assert_eq!(TextureFormat::from_extension("ozt"), Some(TextureFormat::Ozt));
        assert_eq!(TextureFormat::from_extension("TGA"), Some(TextureFormat::Ozt));
        assert_eq!(TextureFormat::from_extension("png"), None);
    }

    #[test]
    fn test_decoded_texture_is_valid() {
        let texture = DecodedTexture::new(vec![0; 12], 2, 2);
        assert!(texture.is_valid());

        let invalid = DecodedTexture::new(vec![0; 11], 2, 2);
        assert!(!invalid.is_valid());

        let empty = DecodedTexture::new(Vec::new(), 0, 0);
        assert!(!empty.is_valid());
    }
}
