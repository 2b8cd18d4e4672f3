//! Encounter tables and scenario builders
//!
//! Static arena data and the overlay sets drawn for it. Every scenario goes through the
//! mask-split compositor so the part of the overlay under the hazard grid is faded.

use glam::DVec2;
use std::f64::consts::FRAC_PI_4;

use crate::aoe::{AoE, AoEOptions, MaskConfig, Palette, split_container, split_container_async};
use crate::assets::{AssetLoader, AssetRef};
use crate::consts::YM_TO_PX;
use crate::coords::{Coordinate, deg_to_rad};
use crate::error::{OverlayError, OverlayResult};
use crate::renderer::{Node, Renderer};
use crate::waymark::{WaymarkData, WaymarkLabel, WaymarkPosition};

pub const TARGET_RING_ASSET: AssetRef = AssetRef("target_ring/r5@3x.png");
/// The target ring art is drawn slightly below its texture center
const TARGET_RING_ANCHOR: DVec2 = DVec2::new(0.5, 0.54);

/// Eight-mark layout: letters on the cardinal axes, numbers on the diagonals
pub fn arena_waymarks() -> WaymarkData {
    WaymarkData::from([
        (WaymarkLabel::A, WaymarkPosition::at(0.0, -8.5)),
        (WaymarkLabel::B, WaymarkPosition::at(8.5, 0.0)),
        (WaymarkLabel::C, WaymarkPosition::at(0.0, 8.5)),
        (WaymarkLabel::D, WaymarkPosition::at(-8.5, 0.0)),
        (WaymarkLabel::One, WaymarkPosition::at(-6.0, -6.0)),
        (WaymarkLabel::Two, WaymarkPosition::at(6.0, -6.0)),
        (WaymarkLabel::Three, WaymarkPosition::at(6.0, 6.0)),
        (WaymarkLabel::Four, WaymarkPosition::at(-6.0, 6.0)),
    ])
}

/// Two-mark layout on the main diagonal
pub fn diagonal_waymarks() -> WaymarkData {
    WaymarkData::from([
        (WaymarkLabel::D, WaymarkPosition::at(3.4, 3.4)),
        (WaymarkLabel::B, WaymarkPosition::at(-3.4, -3.4)),
    ])
}

/// Orientation of the cross-fang rects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossRotation {
    #[default]
    Straight,
    /// Rotated by 45 degrees
    Diagonal,
    /// Both orientations at once
    Both,
}

fn with_palette(base: &AoEOptions, activate: bool, palette: Palette) -> AoEOptions {
    if activate {
        AoEOptions::default().with_palette(palette).merged_over(base)
    } else {
        *base
    }
}

fn cross_rects<R: Renderer + ?Sized>(
    renderer: &mut R,
    rotation: f64,
    options: &AoEOptions,
) -> OverlayResult<[Node; 2]> {
    let mut horizontal = AoE::rect(40.0, 6.0, options)?.to_sprite(renderer)?;
    let mut vertical = AoE::rect(6.0, 40.0, options)?.to_sprite(renderer)?;
    horizontal.rotation = rotation;
    vertical.rotation = rotation;
    Ok([horizontal, vertical])
}

/// Two crossing 40x6 rects plus a center `Circle(9)`, or `Ring(8, 15)` when `ring` is set.
///
/// `activate` switches to the highlighted palettes: sky for the rects, green for the ring and
/// orange for the circle.
pub fn cross_fang<R: Renderer + ?Sized>(
    renderer: &mut R,
    rotation: CrossRotation,
    ring: bool,
    activate: bool,
    base: &AoEOptions,
    mask: &MaskConfig,
) -> OverlayResult<Node> {
    let rect_options = with_palette(base, activate, Palette::Sky);
    let mut overlay = Node::container("cross_fang");

    let angles: &[f64] = match rotation {
        CrossRotation::Straight => &[0.0],
        CrossRotation::Diagonal => &[FRAC_PI_4],
        CrossRotation::Both => &[0.0, FRAC_PI_4],
    };
    for &angle in angles {
        for rect in cross_rects(renderer, angle, &rect_options)? {
            overlay.add_child(rect);
        }
    }

    let center = if ring {
        AoE::ring(8.0, 15.0, &with_palette(base, activate, Palette::Green))?
    } else {
        AoE::circle(9.0, &with_palette(base, activate, Palette::Orange))?
    };
    overlay.add_child(center.to_sprite(renderer)?);

    log::debug!(
        "cross fang {rotation:?} ring={ring} activate={activate}: {} sprites",
        overlay.children().len()
    );
    Ok(split_container(|| Ok(overlay.clone()), mask)?.into_node())
}

/// Circles of one radius placed at polar offsets `(r, degrees)` from the arena center
pub fn radial_circles<R: Renderer + ?Sized>(
    renderer: &mut R,
    radius: f64,
    offsets: &[(f64, f64)],
    options: &AoEOptions,
    mask: &MaskConfig,
) -> OverlayResult<Node> {
    let baked = AoE::circle(radius, options)?.to_sprite(renderer)?;
    let mut overlay = Node::container("radial_circles");
    for &(r, deg) in offsets {
        let world = Coordinate::polar_degrees(r, deg)?.to_point()?;
        overlay.add_child(baked.clone().with_position(world * YM_TO_PX));
    }
    Ok(split_container(|| Ok(overlay.clone()), mask)?.into_node())
}

/// Rects of one size through the arena center, one per angle in degrees
pub fn radial_rects<R: Renderer + ?Sized>(
    renderer: &mut R,
    width: f64,
    height: f64,
    angles: &[f64],
    options: &AoEOptions,
    mask: &MaskConfig,
) -> OverlayResult<Node> {
    let baked = AoE::rect(width, height, options)?.to_sprite(renderer)?;
    let mut overlay = Node::container("radial_rects");
    for &deg in angles {
        overlay.add_child(baked.clone().with_rotation(deg_to_rad(deg)));
    }
    Ok(split_container(|| Ok(overlay.clone()), mask)?.into_node())
}

/// Target ring sprite centered on its art
pub async fn create_target_ring<L: AssetLoader + ?Sized>(loader: &L) -> OverlayResult<Node> {
    let texture = loader.load(&TARGET_RING_ASSET).await?;
    let mut ring = Node::sprite("target_ring", texture);
    ring.set_anchor(TARGET_RING_ANCHOR);
    Ok(ring)
}

/// Target ring at polar offset (`r`, `angle_deg`) rotated by `rotation_deg`, faded under the grid
pub async fn masked_target_ring<L: AssetLoader + ?Sized>(
    loader: &L,
    r: f64,
    angle_deg: f64,
    rotation_deg: f64,
    mask: &MaskConfig,
) -> OverlayResult<Node> {
    let position = Coordinate::polar_degrees(r, angle_deg)?.to_point()? * YM_TO_PX;
    let rotation = deg_to_rad(rotation_deg);
    let split = split_container_async(
        move || async move {
            let mut ring = create_target_ring(loader).await?;
            ring.rotation = rotation;
            ring.position = position;
            let mut group = Node::container("target_ring_group");
            group.add_child(ring);
            Ok::<_, OverlayError>(group)
        },
        mask,
    )
    .await?;
    Ok(split.into_node())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aoe::mask::{COVERED_LABEL, SAFE_LABEL};
    use crate::aoe::visual::AOE_LABEL;
    use crate::assets::MemoryAssetLoader;
    use crate::renderer::{Content, CpuRenderer, Rgba8, Texture};
    use crate::waymark::set_waymark;
    use crate::waymark::tests::waymark_loader;
    use std::collections::HashSet;

    fn low_res() -> AoEOptions {
        AoEOptions::default().with_resolution(1.0)
    }

    fn base_fill(aoe: &AoE) -> crate::renderer::Fill {
        match aoe.layer(AOE_LABEL).map(|n| &n.content) {
            Some(Content::Graphics { fill, .. }) => *fill,
            other => panic!("unexpected base layer {other:?}"),
        }
    }

    #[test]
    fn test_activated_ring_changes_only_palette() {
        let idle = AoE::ring(8.0, 15.0, &with_palette(&low_res(), false, Palette::Green)).unwrap();
        let active = AoE::ring(8.0, 15.0, &with_palette(&low_res(), true, Palette::Green)).unwrap();
        assert_eq!(idle.local_bounds().unwrap(), active.local_bounds().unwrap());
        assert_ne!(base_fill(&idle).color, base_fill(&active).color);
        assert_eq!(base_fill(&active).color, Palette::Green.colors().aoe);
        let (idle_style, active_style) = (idle.style().unwrap(), active.style().unwrap());
        assert_ne!(idle_style.outer_glow.color, active_style.outer_glow.color);
        assert_eq!(idle_style.resolution, active_style.resolution);
    }

    #[test]
    fn test_cross_fang_bounds_do_not_depend_on_activation() {
        let mut renderer = CpuRenderer::new();
        let mask = MaskConfig::default();
        let idle = cross_fang(
            &mut renderer,
            CrossRotation::Straight,
            true,
            false,
            &low_res(),
            &mask,
        )
        .unwrap();
        let active = cross_fang(
            &mut renderer,
            CrossRotation::Straight,
            true,
            true,
            &low_res(),
            &mask,
        )
        .unwrap();
        assert_eq!(idle.local_bounds(), active.local_bounds());
        assert_eq!(idle.children()[0].label, COVERED_LABEL);
        assert_eq!(idle.children()[1].label, SAFE_LABEL);
        // Each scenario bakes two rects and one ring exactly once
        assert_eq!(renderer.extract_count(), 6);
    }

    #[test]
    fn test_cross_fang_both_orientations() {
        let mut renderer = CpuRenderer::new();
        let overlay = cross_fang(
            &mut renderer,
            CrossRotation::Both,
            false,
            false,
            &low_res(),
            &MaskConfig::default(),
        )
        .unwrap();
        let safe = &overlay.children()[1].children()[0];
        assert_eq!(safe.children().len(), 5);
        assert_eq!(safe.children()[2].rotation, FRAC_PI_4);
    }

    #[test]
    fn test_arena_waymarks_placed_at_scale() {
        let loader = waymark_loader();
        let data = arena_waymarks();
        let mut container = Node::container("waymarks");
        let placed =
            pollster::block_on(set_waymark(&mut container, &data, 1.0, 1.0, &loader)).unwrap();
        assert_eq!(placed.len(), 8);
        let mut assets = HashSet::new();
        for (label, position) in &data {
            let mark = &placed[label];
            assert_eq!(mark.position, DVec2::new(position.x * YM_TO_PX, position.z * YM_TO_PX));
            assert!(assets.insert(mark.foreground));
            assert!(assets.insert(mark.background));
        }
        assert_eq!(container.children().len(), 8);
    }

    #[test]
    fn test_diagonal_table() {
        let data = diagonal_waymarks();
        assert_eq!(data.len(), 2);
        assert_eq!(data[&WaymarkLabel::D], WaymarkPosition::at(3.4, 3.4));
    }

    #[test]
    fn test_radial_circles_positions() {
        let mut renderer = CpuRenderer::new();
        let overlay = radial_circles(
            &mut renderer,
            2.0,
            &[(10.0, 0.0), (10.0, 90.0)],
            &low_res(),
            &MaskConfig::default(),
        )
        .unwrap();
        let copy = &overlay.children()[0].children()[0];
        assert!((copy.children()[0].position - DVec2::new(100.0, 0.0)).length() < 1e-9);
        assert!((copy.children()[1].position - DVec2::new(0.0, 100.0)).length() < 1e-9);
        assert_eq!(renderer.extract_count(), 1);
    }

    #[test]
    fn test_masked_target_ring() {
        let loader = MemoryAssetLoader::new()
            .with(
                TARGET_RING_ASSET,
                Texture::solid(10, 10, Rgba8::new(255, 255, 255, 255)).unwrap(),
            );
        let overlay = pollster::block_on(masked_target_ring(
            &loader,
            5.0,
            180.0,
            90.0,
            &MaskConfig::default(),
        ))
        .unwrap();
        let covered = &overlay.children()[0];
        assert_eq!(covered.alpha, 0.2);
        let ring = &covered.children()[0].children()[0];
        assert!((ring.position - DVec2::new(-50.0, 0.0)).length() < 1e-9);
        assert!((ring.pivot - DVec2::new(5.0, 5.4)).length() < 1e-9);
    }

    #[test]
    fn test_masked_target_ring_missing_asset() {
        let result = pollster::block_on(masked_target_ring(
            &MemoryAssetLoader::new(),
            5.0,
            0.0,
            0.0,
            &MaskConfig::default(),
        ));
        assert!(result.is_err());
    }
}
