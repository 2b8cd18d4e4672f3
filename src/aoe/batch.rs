//! Batch builders
//!
//! Each item is baked to its own sprite and placed at `position * YM_TO_PX`. Missing item
//! fields fall back to the batch defaults; item options merge over the default options.

use glam::DVec2;

use super::style::AoEOptions;
use super::visual::AoE;
use crate::coords::Coordinate;
use crate::error::OverlayResult;
use crate::renderer::{Node, Renderer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleParams {
    pub position: Option<Coordinate>,
    pub radius: Option<f64>,
    pub options: Option<AoEOptions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectParams {
    pub position: Option<Coordinate>,
    /// Radians
    pub rotation: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub options: Option<AoEOptions>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanParams {
    pub position: Option<Coordinate>,
    /// Radians
    pub rotation: Option<f64>,
    pub radius: Option<f64>,
    /// Degrees
    pub angle: Option<f64>,
    pub options: Option<AoEOptions>,
}

fn item_options(item: Option<&AoEOptions>, defaults: &AoEOptions) -> AoEOptions {
    item.map_or(*defaults, |o| o.merged_over(defaults))
}

fn place(
    mut sprite: Node,
    position: Option<&Coordinate>,
    rotation: Option<f64>,
) -> OverlayResult<Node> {
    let world = match position {
        Some(p) => p.to_point()?,
        None => DVec2::ZERO,
    };
    sprite.position = crate::world_to_canvas(world);
    sprite.rotation = rotation.unwrap_or(0.0);
    Ok(sprite)
}

pub fn create_circles<R: Renderer + ?Sized>(
    renderer: &mut R,
    params: &[CircleParams],
    default_radius: f64,
    default_options: &AoEOptions,
) -> OverlayResult<Node> {
    let mut container = Node::container("circles");
    for item in params {
        let options = item_options(item.options.as_ref(), default_options);
        let sprite =
            AoE::circle(item.radius.unwrap_or(default_radius), &options)?.to_sprite(renderer)?;
        container.add_child(place(sprite, item.position.as_ref(), None)?);
    }
    Ok(container)
}

pub fn create_rects<R: Renderer + ?Sized>(
    renderer: &mut R,
    params: &[RectParams],
    default_width: f64,
    default_height: f64,
    default_options: &AoEOptions,
) -> OverlayResult<Node> {
    let mut container = Node::container("rects");
    for item in params {
        let options = item_options(item.options.as_ref(), default_options);
        let sprite = AoE::rect(
            item.width.unwrap_or(default_width),
            item.height.unwrap_or(default_height),
            &options,
        )?
        .to_sprite(renderer)?;
        container.add_child(place(sprite, item.position.as_ref(), item.rotation)?);
    }
    Ok(container)
}

pub fn create_fans<R: Renderer + ?Sized>(
    renderer: &mut R,
    params: &[FanParams],
    default_radius: f64,
    default_angle: f64,
    default_options: &AoEOptions,
) -> OverlayResult<Node> {
    let mut container = Node::container("fans");
    for item in params {
        let options = item_options(item.options.as_ref(), default_options);
        let sprite = AoE::fan(
            item.radius.unwrap_or(default_radius),
            item.angle.unwrap_or(default_angle),
            &options,
        )?
        .to_sprite(renderer)?;
        container.add_child(place(sprite, item.position.as_ref(), item.rotation)?);
    }
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aoe::style::Palette;
    use crate::error::OverlayError;
    use crate::renderer::CpuRenderer;
    use std::f64::consts::FRAC_PI_2;

    fn low_res() -> AoEOptions {
        AoEOptions::default().with_resolution(1.0)
    }

    #[test]
    fn test_circles_positioned_in_pixels() {
        let mut renderer = CpuRenderer::new();
        let params = [
            CircleParams {
                position: Some(Coordinate::cartesian(3.0, -2.0).unwrap()),
                ..Default::default()
            },
            CircleParams {
                position: Some(Coordinate::polar_degrees(4.0, 90.0).unwrap()),
                radius: Some(2.0),
                ..Default::default()
            },
        ];
        let group = create_circles(&mut renderer, &params, 1.0, &low_res()).unwrap();
        let children = group.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].position, DVec2::new(30.0, -20.0));
        assert!((children[1].position - DVec2::new(0.0, 40.0)).length() < 1e-9);
        assert_eq!(renderer.extract_count(), 2);
    }

    #[test]
    fn test_rects_use_defaults_and_rotation() {
        let mut renderer = CpuRenderer::new();
        let params = [
            RectParams {
                rotation: Some(FRAC_PI_2),
                ..Default::default()
            },
            RectParams {
                width: Some(4.0),
                options: Some(AoEOptions::default().with_palette(Palette::Red)),
                ..Default::default()
            },
        ];
        let group = create_rects(&mut renderer, &params, 2.0, 1.0, &low_res()).unwrap();
        let first = &group.children()[0];
        assert_eq!(first.rotation, FRAC_PI_2);
        assert_eq!(first.position, DVec2::ZERO);
        // Item options keep the batch resolution, so the sprite is not rescaled
        assert_eq!(group.children()[1].scale, DVec2::ONE);
    }

    #[test]
    fn test_fans_pivot_on_apex() {
        let mut renderer = CpuRenderer::new();
        let group =
            create_fans(&mut renderer, &[FanParams::default()], 3.0, 90.0, &low_res()).unwrap();
        let fan = &group.children()[0];
        // One world unit of padding before the apex
        assert!((fan.pivot.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_item_fails_whole_batch() {
        let mut renderer = CpuRenderer::new();
        let err = create_circles(&mut renderer, &[CircleParams::default()], 0.0, &low_res())
            .unwrap_err();
        assert!(matches!(err, OverlayError::Validation(_)));
    }
}
