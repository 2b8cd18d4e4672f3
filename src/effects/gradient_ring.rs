//! Soft golden ring sprite, drawn as a radial gradient and baked at 4x

use glam::DVec2;

use super::bake;
use crate::consts::YM_TO_PX;
use crate::error::{OverlayError, OverlayResult, ensure_finite, ensure_positive};
use crate::renderer::{Color, GradientStop, Node, Renderer};
use crate::world_to_canvas;

/// Oversampling of the baked ring
pub const RING_SUPERSAMPLE: f64 = 4.0;

const DARK: Color = Color::rgb(231, 161, 93);
const BRIGHT: Color = Color::rgb(241, 212, 109);

/// Gradient stops for a ring between `inner` and `outer` world units.
///
/// The rim always carries a bright band; a nonzero `inner` adds a second band at the inner edge
/// with a transparent hole inside it. Offsets are clamped to `[0, 1]` and sorted, keeping equal
/// offsets in order so they form hard edges.
pub fn ring_stops(inner: f64, outer: f64) -> OverlayResult<Vec<GradientStop>> {
    let outer = ensure_positive("ring outer radius", outer)?;
    let inner = ensure_finite("ring inner radius", inner)?;
    if !(0.0..=outer).contains(&inner) {
        return Err(OverlayError::validation(format!(
            "ring inner radius {inner} must be within [0, {outer}]"
        )));
    }

    let oo = (0.3 / outer / RING_SUPERSAMPLE) as f32;
    let cc = (inner * (1.0 - 3.0 * oo as f64) / outer) as f32;
    let stop = GradientStop::new;

    let mut stops = if cc == 0.0 {
        vec![stop(0.0, DARK, 0.4)]
    } else {
        vec![
            stop(0.0, Color::BLACK, 0.0),
            stop(cc - oo * 3.0, DARK, 0.0),
            stop(cc - oo, DARK, 1.0),
            stop(cc, BRIGHT, 1.0),
            stop(cc + oo, BRIGHT, 1.0),
            stop(cc + oo, DARK, 1.0),
            stop(cc + oo * 3.0, DARK, 0.4),
        ]
    };
    stops.extend([
        stop(1.0 - oo * 6.0, DARK, 0.4),
        stop(1.0 - oo * 4.0, DARK, 1.0),
        stop(1.0 - oo * 4.0, BRIGHT, 1.0),
        stop(1.0 - oo * 3.0, BRIGHT, 1.0),
        stop(1.0 - oo, DARK, 1.0),
        stop(1.0, DARK, 0.0),
    ]);

    for s in &mut stops {
        s.offset = s.offset.clamp(0.0, 1.0);
    }
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
    Ok(stops)
}

/// Bake a ring around `center` (world units) and return it as a centered sprite.
///
/// The sprite is positioned in canvas pixels and scaled by `view_scale / 4`.
pub fn create_gradient_ring<R: Renderer + ?Sized>(
    renderer: &mut R,
    center: DVec2,
    inner: f64,
    outer: f64,
    view_scale: f64,
) -> OverlayResult<Node> {
    let view_scale = ensure_positive("view scale", view_scale)?;
    let stops = ring_stops(inner, outer)?;
    let radius = outer * YM_TO_PX * RING_SUPERSAMPLE;
    let texture = bake(renderer, &Node::radial_gradient("ring", radius, stops))?;

    let mut sprite = Node::sprite("gradient_ring", texture).with_position(world_to_canvas(center));
    sprite.set_anchor(DVec2::splat(0.5));
    sprite.set_scale(view_scale / RING_SUPERSAMPLE);
    log::debug!("baked gradient ring {inner}..{outer} at {center}");
    Ok(sprite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Content, CpuRenderer};

    #[test]
    fn test_filled_ring_stops() {
        let stops = ring_stops(0.0, 5.0).unwrap();
        assert_eq!(stops.len(), 7);
        assert_eq!(stops[0], GradientStop::new(0.0, DARK, 0.4));
        assert_eq!(stops.last(), Some(&GradientStop::new(1.0, DARK, 0.0)));
        // The hard edge into the bright band keeps its insertion order
        assert_eq!(stops[2].offset, stops[3].offset);
        assert_eq!((stops[2].color, stops[3].color), (DARK, BRIGHT));
        assert!(stops.windows(2).all(|w| w[0].offset <= w[1].offset));
    }

    #[test]
    fn test_hollow_ring_stops() {
        let stops = ring_stops(2.0, 5.0).unwrap();
        assert_eq!(stops.len(), 13);
        assert_eq!(stops[0].alpha, 0.0);
        let oo = 0.3 / 5.0 / 4.0;
        let cc = 2.0 * (1.0 - 3.0 * oo) / 5.0;
        let bright = stops.iter().find(|s| s.color == BRIGHT).unwrap();
        assert!((bright.offset as f64 - cc).abs() < 1e-6);
        assert!(stops.windows(2).all(|w| w[0].offset <= w[1].offset));
        assert!(stops.iter().all(|s| (0.0..=1.0).contains(&s.offset)));
    }

    #[test]
    fn test_tiny_inner_radius_clamps_offsets() {
        let stops = ring_stops(0.001, 1.0).unwrap();
        assert_eq!(stops[0].offset, 0.0);
        assert!(stops.iter().all(|s| (0.0..=1.0).contains(&s.offset)));
    }

    #[test]
    fn test_rejects_bad_radii() {
        for (inner, outer) in [(1.0, 0.0), (-1.0, 2.0), (3.0, 2.0), (f64::NAN, 2.0)] {
            assert!(
                matches!(ring_stops(inner, outer), Err(OverlayError::Validation(_))),
                "{inner}..{outer}"
            );
        }
    }

    #[test]
    fn test_ring_sprite() {
        let mut renderer = CpuRenderer::new();
        let sprite =
            create_gradient_ring(&mut renderer, DVec2::new(1.5, -2.0), 0.0, 2.0, 0.6).unwrap();
        assert_eq!(renderer.extract_count(), 1);
        assert_eq!(sprite.position, DVec2::new(15.0, -20.0));
        assert!(sprite.scale.abs_diff_eq(DVec2::splat(0.15), 1e-12));

        let Content::Sprite(texture) = &sprite.content else {
            panic!("expected a sprite");
        };
        // Diameter in canvas pixels times the supersample factor
        assert_eq!((texture.width(), texture.height()), (160, 160));
        assert_eq!(sprite.pivot, DVec2::splat(80.0));
        let center = texture.pixel(80, 80).unwrap();
        assert!((i32::from(center.a) - 102).abs() <= 4, "center {center:?}");
        let rim = texture.pixel(158, 80).unwrap();
        assert!(rim.a > center.a);
        assert_eq!(texture.pixel(2, 2).map(|p| p.a), Some(0));
    }
}
