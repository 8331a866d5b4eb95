//! End-to-end tests: encrypted bytes to decoded grids to rendered pixels.

use std::cell::RefCell;

use glam::{DVec2, IVec2};
use muterrain::{
    AssetResolver, AttributeGrid, MemoryResolver, NO_OVERLAY, PLACEHOLDER_COLOR, RenderConfig,
    RenderRegion, RenderTarget, TerrainGrid, TextureCache, TextureSampler, TileAsset, blend,
    interpolate_alpha, render, select_layers,
};
use muterrain_decode::{apply_attribute_mask, encrypt, load_attributes, load_terrain_map};

const BASE: u8 = 0;
const OVERLAY: u8 = 9;

/// A 4x4 texture whose texel (x, y) has color (x * 60 + offset, y * 60, offset).
fn gradient(name: &str, offset: u8) -> TileAsset {
    let mut pixels = Vec::new();
    for y in 0..4u8 {
        for x in 0..4u8 {
            pixels.extend_from_slice(&[x * 60 + offset, y * 60, offset]);
        }
    }
    TileAsset::new(name, 4, 4, pixels).unwrap()
}

fn resolver() -> MemoryResolver {
    MemoryResolver::new()
        .with(BASE, gradient("TileGrass01", 0))
        .with(OVERLAY, gradient("TileRock03", 10))
}

fn uniform_grid(size: usize, base: u8, overlay: u8, alpha: f64) -> TerrainGrid {
    let cells = size * size;
    TerrainGrid::from_layers(size, vec![base; cells], vec![overlay; cells], vec![alpha; cells])
        .unwrap()
}

fn config(size: usize, resolution: u32) -> RenderConfig {
    // Four world units per repeat on a 4-texel texture: one full repeat per cell.
    RenderConfig::default()
        .with_grid_size(size)
        .with_tile_resolution(resolution)
        .with_world_units_per_repeat(4.0)
}

fn preloaded(resolver: &MemoryResolver) -> TextureCache {
    let mut cache = TextureCache::new();
    cache.preload(resolver, 0..=u8::MAX);
    cache
}

/// Colors a single layer would produce for `cell`, pixel by pixel.
fn pure_layer(cache: &TextureCache, index: u8, cell: IVec2, config: &RenderConfig) -> Vec<[u8; 3]> {
    let sampler = TextureSampler::new(cache, config.world_units_per_repeat);
    let r = config.tile_resolution as usize;
    let mut out = Vec::new();
    for py in 0..r {
        for px in 0..r {
            let uv = DVec2::new((px as f64 + 0.5) / r as f64, (py as f64 + 0.5) / r as f64);
            out.push(sampler.sample(index, uv, cell, config.time_ms));
        }
    }
    out
}

/// Colors of `cell` in a rendered region that starts at the grid origin.
fn rendered_cell(target: &RenderTarget, cell: IVec2, resolution: u32) -> Vec<[u8; 3]> {
    let r = resolution as usize;
    let mut out = Vec::new();
    for py in 0..r {
        for px in 0..r {
            out.push(target.pixel(cell.x as usize * r + px, cell.y as usize * r + py));
        }
    }
    out
}

#[test]
fn test_sentinel_overlay_renders_base_only() {
    // 2x2, base 0, no overlay, alpha 0: a constant block of texture 0.
    let terrain = uniform_grid(2, BASE, NO_OVERLAY, 0.0);
    let attributes = AttributeGrid::empty(2);
    let solid =
        MemoryResolver::new().with(BASE, TileAsset::solid("TileGrass01", 256, 256, [40, 120, 30]));

    for resolution in [1, 3, 8] {
        let target = render(
            &terrain,
            &attributes,
            &solid,
            &config(2, resolution),
            RenderRegion::full(2),
        )
        .unwrap();
        assert_eq!(target.width(), 2 * resolution as usize);
        assert!(target.as_raw().chunks_exact(3).all(|px| px == [40, 120, 30]));
    }
}

#[test]
fn test_sentinel_overlay_matches_point_sampling() {
    let terrain = uniform_grid(2, BASE, NO_OVERLAY, 0.0);
    let attributes = AttributeGrid::empty(2);
    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 5);

    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();
    for cell in RenderRegion::full(2).cells() {
        assert_eq!(
            rendered_cell(&target, cell, 5),
            pure_layer(&cache, BASE, cell, &config)
        );
    }
}

#[test]
fn test_saturated_cells_never_touch_base_layer() {
    let terrain = uniform_grid(2, BASE, OVERLAY, 1.0);
    let attributes = AttributeGrid::empty(2);
    let requested = RefCell::new(Vec::new());
    let inner = resolver();
    let tracking = |index: u8| {
        requested.borrow_mut().push(index);
        inner.resolve(index)
    };
    let config = config(2, 4);

    let target = render(&terrain, &attributes, &tracking, &config, RenderRegion::full(2)).unwrap();
    assert_eq!(*requested.borrow(), vec![OVERLAY]);

    let cache = preloaded(&inner);
    for cell in RenderRegion::full(2).cells() {
        assert_eq!(
            rendered_cell(&target, cell, 4),
            pure_layer(&cache, OVERLAY, cell, &config)
        );
    }
}

#[test]
fn test_zero_alpha_is_pure_base() {
    let terrain = uniform_grid(2, BASE, OVERLAY, 0.0);
    let attributes = AttributeGrid::empty(2);
    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 4);

    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();
    for cell in RenderRegion::full(2).cells() {
        assert_eq!(
            rendered_cell(&target, cell, 4),
            pure_layer(&cache, BASE, cell, &config)
        );
    }
}

#[test]
fn test_full_alpha_without_shortcut_is_pure_overlay() {
    let terrain = uniform_grid(2, BASE, OVERLAY, 1.0);
    let attributes = AttributeGrid::empty(2);
    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 4).with_saturated_layer_shortcut(false);

    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();
    for cell in RenderRegion::full(2).cells() {
        assert_eq!(
            rendered_cell(&target, cell, 4),
            pure_layer(&cache, OVERLAY, cell, &config)
        );
    }
}

#[test]
fn test_last_column_clamps_instead_of_wrapping() {
    // Column 0 fully overlaid, column 1 bare. If cell (1, y) wrapped its
    // right-hand corners to column 0 it would pick up overlay color.
    let alpha = vec![1.0, 0.0, 1.0, 0.0];
    let terrain = TerrainGrid::from_layers(2, vec![BASE; 4], vec![OVERLAY; 4], alpha).unwrap();
    let attributes = AttributeGrid::empty(2);
    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 4);

    let layers = select_layers(&terrain, IVec2::new(1, 0), true);
    assert_eq!(layers.corner_alpha, [0.0, 0.0, 0.0, 0.0]);

    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();
    for y in 0..2 {
        let cell = IVec2::new(1, y);
        assert_eq!(
            rendered_cell(&target, cell, 4),
            pure_layer(&cache, BASE, cell, &config)
        );
    }
}

#[test]
fn test_partial_alpha_blends_per_pixel() {
    let alpha = vec![0.0, 1.0, 0.0, 1.0];
    let terrain = TerrainGrid::from_layers(2, vec![BASE; 4], vec![OVERLAY; 4], alpha).unwrap();
    let attributes = AttributeGrid::empty(2);
    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 4);

    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();

    let cell = IVec2::ZERO;
    let base = pure_layer(&cache, BASE, cell, &config);
    let overlay = pure_layer(&cache, OVERLAY, cell, &config);
    let corners = select_layers(&terrain, cell, true).corner_alpha;
    let rendered = rendered_cell(&target, cell, 4);
    for (i, color) in rendered.iter().enumerate() {
        let uv = DVec2::new(((i % 4) as f64 + 0.5) / 4.0, ((i / 4) as f64 + 0.5) / 4.0);
        let a = interpolate_alpha(corners, uv);
        assert!((a - uv.x).abs() < 1e-12);
        assert_eq!(*color, blend(base[i], overlay[i], a));
    }
}

#[test]
fn test_render_is_deterministic() {
    let alpha: Vec<f64> = (0..16).map(|i| f64::from(i) / 15.0).collect();
    let overlay = (0..16).map(|i| if i % 3 == 0 { NO_OVERLAY } else { OVERLAY }).collect();
    let terrain = TerrainGrid::from_layers(4, vec![BASE; 16], overlay, alpha).unwrap();
    let attributes = AttributeGrid::empty(4);
    let resolver = resolver();
    let config = config(4, 6).with_time_ms(4_321);

    let a = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(4)).unwrap();
    let b = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(4)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_symmetry_flip_mirrors_cell() {
    let terrain = uniform_grid(1, BASE, NO_OVERLAY, 0.0);
    let mut plain = vec![0u8; 4];
    // Word layout, one cell, flip X.
    plain.extend([0x01, 0x00]);
    apply_attribute_mask(&mut plain);
    let attributes = load_attributes(&encrypt(&plain), 1).unwrap();
    assert!(attributes.cell(0, 0).unwrap().symmetry.flip_x());

    let resolver = resolver();
    let plain_config = config(1, 4);
    let mirrored_config = plain_config.clone().with_symmetry(true);

    let normal = render(&terrain, &attributes, &resolver, &plain_config, RenderRegion::full(1)).unwrap();
    let mirrored =
        render(&terrain, &attributes, &resolver, &mirrored_config, RenderRegion::full(1)).unwrap();

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(mirrored.pixel(x, y), normal.pixel(3 - x, y));
        }
    }
}

#[test]
fn test_encrypted_files_render_end_to_end() {
    // Map: 2-byte header, 2x2 grid.
    let mut map = vec![0u8, 1];
    map.extend([BASE; 4]);
    map.extend([OVERLAY, NO_OVERLAY, NO_OVERLAY, NO_OVERLAY]);
    map.extend([255u8, 255, 255, 255]);

    // Attributes: byte layout with a 4-byte header.
    let mut att = vec![0u8, 1, 2, 2, 0, 0, 0, 0];
    apply_attribute_mask(&mut att);

    let terrain = load_terrain_map(&encrypt(&map), 2).unwrap();
    let attributes = load_attributes(&encrypt(&att), 2).unwrap();
    assert_eq!(terrain.header().map_number, Some(1));

    let resolver = resolver();
    let cache = preloaded(&resolver);
    let config = config(2, 2);
    let target = render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();

    // Every corner is saturated, so each cell draws its c1 overlay alone:
    // cell (0, 0) shows the overlay texture, the rest show the placeholder.
    assert_eq!(
        rendered_cell(&target, IVec2::ZERO, 2),
        pure_layer(&cache, OVERLAY, IVec2::ZERO, &config)
    );
    assert_eq!(target.pixel(3, 0), PLACEHOLDER_COLOR);
    assert_eq!(target.pixel(0, 3), PLACEHOLDER_COLOR);
}

#[test]
fn test_decoded_alpha_blends_at_double_precision() {
    // Every partial alpha byte must blend exactly like `byte / 255.0` in f64,
    // truncated per channel.
    let base_color = [255u8, 85, 170];
    let resolver = MemoryResolver::new()
        .with(BASE, TileAsset::solid("TileGrass01", 256, 256, base_color))
        .with(OVERLAY, TileAsset::solid("TileRock03", 256, 256, [0, 0, 0]));
    let attributes = AttributeGrid::empty(1);
    let config = config(1, 1);

    for byte in 1..=254u8 {
        let terrain = load_terrain_map(&encrypt(&[BASE, OVERLAY, byte]), 1).unwrap();
        let target =
            render(&terrain, &attributes, &resolver, &config, RenderRegion::full(1)).unwrap();

        let a = f64::from(byte) / 255.0;
        let expected = base_color.map(|b| (f64::from(b) * (1.0 - a) + 0.0 * a) as u8);
        assert_eq!(target.pixel(0, 0), expected, "alpha byte {byte}");
    }
}

mod properties {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn sentinel_cells_ignore_alpha(
            alpha in proptest::collection::vec(0.0f64..=1.0, 9),
            time_ms in 0u64..2_000_000,
        ) {
            let terrain =
                TerrainGrid::from_layers(3, vec![BASE; 9], vec![NO_OVERLAY; 9], alpha).unwrap();
            let attributes = AttributeGrid::empty(3);
            let resolver = resolver();
            let cache = preloaded(&resolver);
            let config = config(3, 3).with_time_ms(time_ms).with_saturated_layer_shortcut(false);

            let target =
                render(&terrain, &attributes, &resolver, &config, RenderRegion::full(3)).unwrap();
            for cell in RenderRegion::full(3).cells() {
                prop_assert_eq!(
                    rendered_cell(&target, cell, 3),
                    pure_layer(&cache, BASE, cell, &config)
                );
            }
        }

        #[test]
        fn blended_channels_stay_between_layers(
            alpha in proptest::collection::vec(0.0f64..=1.0, 4),
        ) {
            let terrain =
                TerrainGrid::from_layers(2, vec![BASE; 4], vec![OVERLAY; 4], alpha).unwrap();
            let attributes = AttributeGrid::empty(2);
            let resolver = resolver();
            let cache = preloaded(&resolver);
            let config = config(2, 4).with_saturated_layer_shortcut(false);

            let target =
                render(&terrain, &attributes, &resolver, &config, RenderRegion::full(2)).unwrap();
            for cell in RenderRegion::full(2).cells() {
                let base = pure_layer(&cache, BASE, cell, &config);
                let overlay = pure_layer(&cache, OVERLAY, cell, &config);
                for (i, color) in rendered_cell(&target, cell, 4).iter().enumerate() {
                    for c in 0..3 {
                        let lo = base[i][c].min(overlay[i][c]);
                        let hi = base[i][c].max(overlay[i][c]);
                        // Truncation may land one below when both layers agree.
                        prop_assert!(color[c] >= lo.saturating_sub(1) && color[c] <= hi);
                    }
                }
            }
        }
    }
}
