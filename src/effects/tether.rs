//! Channeling tethers
//!
//! Both tethers are centered on their node's origin and run along the local x axis. `length` is
//! the span in canvas pixels.

use glam::DVec2;
use std::f64::consts::FRAC_PI_2;

use super::bake;
use crate::assets::{AssetLoader, AssetRef};
use crate::error::{OverlayResult, ensure_positive};
use crate::renderer::{Color, DropShadowFilter, Node, Renderer, Texture};

pub const DARK_TETHER_ASSET: AssetRef = AssetRef("texture/fire_tether.png");
pub const CHAIN_OUTER_ASSET: AssetRef = AssetRef("vfx/channeling/texture/chane08f.png");
pub const CHAIN_INNER_ASSET: AssetRef = AssetRef("vfx/channeling/texture/chane14f.png");
pub const ARROW_ASSET: AssetRef = AssetRef("vfx/channeling/texture/ch_arrow01f.png");

const DARK_TINT: Color = Color::hex(0xae01de);
const DARK_RATIO: f64 = 0.2;
const ARROW_RATIO: f64 = 0.12;

/// Layers of the arrow strip, bottom first: (asset, tint, copies)
const ARROW_LAYERS: [(AssetRef, Color, usize); 3] = [
    (CHAIN_OUTER_ASSET, Color::hex(0x07000a), 2),
    (CHAIN_INNER_ASSET, Color::hex(0x831843), 2),
    (ARROW_ASSET, Color::hex(0xfb7185), 1),
];

fn centered(label: &str, texture: Texture) -> Node {
    let mut sprite = Node::sprite(label, texture);
    sprite.set_anchor(DVec2::splat(0.5));
    sprite
}

fn strip(
    label: &str,
    texture: Texture,
    width: f64,
    height: f64,
    anchor: DVec2,
    ratio: f64,
) -> Node {
    let mut node = Node::tiling_sprite(label, texture, width, height);
    node.set_anchor(anchor);
    node.set_scale(ratio);
    node
}

/// Purple tether with a soft dark halo underneath
pub async fn create_dark_tether<R, L>(
    renderer: &mut R,
    loader: &L,
    length: f64,
) -> OverlayResult<Node>
where
    R: Renderer + ?Sized,
    L: AssetLoader + ?Sized,
{
    let length = ensure_positive("tether length", length)?;
    let texture = loader.load(&DARK_TETHER_ASSET).await?;
    let tile = bake(renderer, &centered("tether", texture.tinted(DARK_TINT)))?;

    let width = length / DARK_RATIO;
    let height = tile.height() as f64;
    let center = DVec2::splat(0.5);
    let shadow = strip("shadow", tile.clone(), width, height, center, DARK_RATIO).with_filter(
        DropShadowFilter {
            offset: [0.0, 0.0],
            alpha: 0.6,
            shadow_only: true,
            ..Default::default()
        },
    );

    let mut node = Node::container("chn_dark001f");
    node.add_child(shadow);
    node.add_child(strip("strip", tile, width, height, center, DARK_RATIO));
    log::debug!("built dark tether of length {length}");
    Ok(node)
}

/// Layered chain tether with arrows, mirrored out from the origin in both directions
pub async fn create_arrow_tether<R, L>(
    renderer: &mut R,
    loader: &L,
    length: f64,
) -> OverlayResult<Node>
where
    R: Renderer + ?Sized,
    L: AssetLoader + ?Sized,
{
    let length = ensure_positive("tether length", length)?;
    let mut stack = Node::container("tether");
    for (asset, tint, copies) in ARROW_LAYERS {
        let tinted = loader.load(&asset).await?.tinted(tint);
        for _ in 0..copies {
            stack.add_child(centered(asset.path(), tinted.clone()));
        }
    }
    let tile = bake(renderer, &stack)?;

    let width = tile.width() as f64;
    let height = length / ARROW_RATIO / 2.0;
    let anchor = DVec2::new(0.5, 1.0);
    let mut node = Node::container("chn_arrow01f");
    for (label, rotation) in [("forward", FRAC_PI_2), ("backward", -FRAC_PI_2)] {
        node.add_child(
            strip(label, tile.clone(), width, height, anchor, ARROW_RATIO).with_rotation(rotation),
        );
    }
    log::debug!("built arrow tether of length {length}");
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetLoader;
    use crate::error::OverlayError;
    use crate::renderer::{Bounds, Content, CpuRenderer, Filter, Rgba8};

    fn white(w: u32, h: u32) -> Texture {
        Texture::solid(w, h, Rgba8::new(255, 255, 255, 255)).unwrap()
    }

    fn loader() -> MemoryAssetLoader {
        MemoryAssetLoader::new()
            .with(DARK_TETHER_ASSET, white(20, 10))
            .with(CHAIN_OUTER_ASSET, white(12, 16))
            .with(CHAIN_INNER_ASSET, white(8, 16))
            .with(ARROW_ASSET, white(4, 4))
    }

    fn tiling(node: &Node) -> (&Texture, f64, f64) {
        match &node.content {
            Content::TilingSprite {
                texture,
                width,
                height,
            } => (texture, *width, *height),
            other => panic!("expected a tiling sprite, got {other:?}"),
        }
    }

    #[test]
    fn test_dark_tether_layout() {
        let mut renderer = CpuRenderer::new();
        let node =
            pollster::block_on(create_dark_tether(&mut renderer, &loader(), 100.0)).unwrap();
        assert_eq!(renderer.extract_count(), 1);
        let [shadow, strip] = node.children() else {
            panic!("expected shadow and strip");
        };
        assert_eq!(shadow.label, "shadow");
        assert!(matches!(
            shadow.filters.as_slice(),
            [Filter::DropShadow(DropShadowFilter { shadow_only: true, alpha, offset, .. })]
                if *alpha == 0.6 && *offset == [0.0, 0.0]
        ));
        assert!(strip.filters.is_empty());

        let (tile, width, height) = tiling(strip);
        assert_eq!((tile.width(), tile.height()), (20, 10));
        assert_eq!(tile.pixel(5, 5), Some(Rgba8::new(0xae, 0x01, 0xde, 255)));
        assert!((width - 500.0).abs() < 1e-9);
        assert_eq!(height, 10.0);
        assert_eq!(strip.scale, DVec2::splat(0.2));
        assert!(strip.pivot.abs_diff_eq(DVec2::new(250.0, 5.0), 1e-9));

        // Scaled back down the strip spans exactly `length`, centered on the origin
        let bounds = strip
            .local_bounds()
            .map(|b| b.transformed(&strip.local_transform()))
            .unwrap();
        assert!((bounds.min.x + 50.0).abs() < 1e-9 && (bounds.max.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_dark_tether_renders_shadow_under_strip() {
        let mut renderer = CpuRenderer::new();
        let node =
            pollster::block_on(create_dark_tether(&mut renderer, &loader(), 40.0)).unwrap();
        let frame = Bounds::new(DVec2::new(-25.0, -8.0), DVec2::new(25.0, 8.0));
        let tex = renderer.extract_texture(&node, frame).unwrap();
        // Opaque purple core, darkened halo just beyond the strip edge
        assert_eq!(tex.pixel(25, 8), Some(Rgba8::new(0xae, 0x01, 0xde, 255)));
        let halo = tex.pixel(25, 11).unwrap();
        assert!(halo.a > 0);
        assert_eq!((halo.r, halo.g, halo.b), (0, 0, 0));
    }

    #[test]
    fn test_arrow_tether_mirrors_two_strips() {
        let mut renderer = CpuRenderer::new();
        let node =
            pollster::block_on(create_arrow_tether(&mut renderer, &loader(), 60.0)).unwrap();
        assert_eq!(renderer.extract_count(), 1);
        let [forward, backward] = node.children() else {
            panic!("expected two strips");
        };
        assert_eq!(forward.rotation, FRAC_PI_2);
        assert_eq!(backward.rotation, -FRAC_PI_2);

        let (tile, width, height) = tiling(forward);
        // The bake covers the widest layer; the arrow sits on top in the middle
        assert_eq!((tile.width(), tile.height()), (12, 16));
        assert_eq!(width, 12.0);
        assert!((height - 250.0).abs() < 1e-9);
        assert_eq!(tile.pixel(6, 8), Some(Rgba8::new(0xfb, 0x71, 0x85, 255)));
        assert_eq!(tile.pixel(0, 8), Some(Rgba8::new(0x07, 0x00, 0x0a, 255)));
        assert!(forward.pivot.abs_diff_eq(DVec2::new(6.0, 250.0), 1e-9));

        let span = |n: &Node| n.local_bounds().map(|b| b.transformed(&n.local_transform()));
        let (f, b) = (span(forward).unwrap(), span(backward).unwrap());
        assert!((f.max.x - 30.0).abs() < 1e-9 && f.min.x.abs() < 1e-9);
        assert!((b.min.x + 30.0).abs() < 1e-9 && b.max.x.abs() < 1e-9);
    }

    #[test]
    fn test_tether_errors() {
        let mut renderer = CpuRenderer::new();
        let err = pollster::block_on(create_dark_tether(&mut renderer, &loader(), 0.0))
            .unwrap_err();
        assert!(matches!(err, OverlayError::Validation(_)));

        let partial = MemoryAssetLoader::new().with(CHAIN_OUTER_ASSET, white(4, 4));
        let err = pollster::block_on(create_arrow_tether(&mut renderer, &partial, 10.0))
            .unwrap_err();
        assert!(matches!(err, OverlayError::Resource(_)));
        let err = pollster::block_on(create_dark_tether(&mut renderer, &partial, 10.0))
            .unwrap_err();
        assert!(matches!(err, OverlayError::Resource(_)));
        assert_eq!(renderer.extract_count(), 0);
    }
}
