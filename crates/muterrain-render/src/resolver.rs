//! Tile textures loaded from the game data directories.

use std::path::{Path, PathBuf};

use muterrain::{AssetResolver, TileAsset, catalog};
use muterrain_decode::{TextureFormat, decode_texture};

/// Extensions tried for each tile name, in order.
const EXTENSIONS: [&str; 8] = [".OZJ", ".ozj", ".OZT", ".ozt", ".tga", ".TGA", ".jpg", ".JPG"];

/// Resolves tile indices to texture files on disk.
///
/// Each index is mapped to its catalog name, and the first existing
/// `<dir>/<name><ext>` across the search directories is decoded. Files
/// that exist but fail to read or decode count as misses.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    dirs: Vec<PathBuf>,
}

impl DirectoryResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// First existing texture file for `name`.
    fn find(&self, name: &str) -> Option<(PathBuf, TextureFormat)> {
        self.dirs.iter().find_map(|dir| find_in(dir, name))
    }
}

fn find_in(dir: &Path, name: &str) -> Option<(PathBuf, TextureFormat)> {
    EXTENSIONS.iter().find_map(|ext| {
        let path = dir.join(format!("{name}{ext}"));
        if !path.is_file() {
            return None;
        }
        TextureFormat::from_extension(ext).map(|format| (path, format))
    })
}

impl AssetResolver for DirectoryResolver {
    fn resolve(&self, index: u8) -> Option<TileAsset> {
        let name = catalog::tile_name(index);
        let (path, format) = self.find(&name)?;

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(index, path = %path.display(), "Failed to read texture: {e}");
                return None;
            }
        };

        let texture = match decode_texture(&data, format) {
            Ok(texture) => texture,
            Err(e) => {
                tracing::warn!(index, path = %path.display(), "Failed to decode texture: {e}");
                return None;
            }
        };

        tracing::debug!(
            index,
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            "Loaded texture"
        );
        TileAsset::from_decoded(name, texture)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// A 2x1 top-down 24-bit OZT file: red, then blue.
    fn ozt_bytes() -> Vec<u8> {
        let mut data = vec![0u8; 4];
        let mut header = [0u8; 18];
        header[2] = 2;
        header[12] = 2;
        header[14] = 1;
        header[16] = 24;
        header[17] = 0x20;
        data.extend_from_slice(&header);
        // BGR order.
        data.extend_from_slice(&[0, 0, 255, 255, 0, 0]);
        data
    }

    #[test]
    fn test_resolves_ozt_by_catalog_name() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("TileGrass02.OZT"), ozt_bytes()).unwrap();

        let resolver = DirectoryResolver::new(vec![dir.path().to_path_buf()]);
        let asset = resolver.resolve(1).unwrap();
        assert_eq!(asset.name(), "TileGrass02");
        assert_eq!((asset.width(), asset.height()), (2, 1));
        assert_eq!(asset.pixel_at(0, 0), [255, 0, 0]);
        assert_eq!(asset.pixel_at(1, 0), [0, 0, 255]);
    }

    #[test]
    fn test_searches_directories_in_order() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        std::fs::write(second.path().join("ExtTile01.tga"), ozt_bytes()).unwrap();

        let resolver =
            DirectoryResolver::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert!(resolver.resolve(14).is_some());
        assert!(resolver.resolve(15).is_none());
    }

    #[test]
    fn test_corrupt_file_is_a_miss() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("TileWater01.OZJ"), [0u8; 10]).unwrap();

        let resolver = DirectoryResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.resolve(5).is_none());
    }
}
