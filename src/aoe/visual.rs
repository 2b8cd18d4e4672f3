//! AoE compositor
//!
//! An AoE is a container of three layers sharing one path, bottom to top:
//! `inner_shadow` (white shape under a knockout glow), `outer_glow` (same, second glow) and
//! `aoe` (the translucent base fill). Before an AoE is placed under a masked ancestor it must be
//! flattened to a sprite: masking the live glow layers leaves filter residue at the mask edge.

use glam::DVec2;

use super::shape::{AoEShape, AoEShapeKind};
use super::style::{AoEOptions, AoEStyle};
use crate::consts::YM_TO_PX;
use crate::error::{OverlayError, OverlayResult, ensure_positive};
use crate::renderer::{Bounds, Fill, Node, RangeAreaPreset, Renderer, Texture};

pub const INNER_SHADOW_LABEL: &str = "inner_shadow";
pub const OUTER_GLOW_LABEL: &str = "outer_glow";
pub const AOE_LABEL: &str = "aoe";
pub const RANGE_AREA_LABEL: &str = "range_area";

#[derive(Debug, Clone, PartialEq)]
pub struct AoE {
    shape: AoEShape,
    resolution: f64,
    style: Option<AoEStyle>,
    node: Node,
}

impl AoE {
    /// Build the layered visual. Shape parameters are checked before anything is assembled.
    pub fn new(shape: AoEShape, options: &AoEOptions) -> OverlayResult<Self> {
        shape.validate()?;
        let style = AoEStyle::with_overrides(options)?;
        let path = shape.path(style.resolution);

        let mut inner_shadow =
            Node::container(INNER_SHADOW_LABEL).with_filter(style.inner_shadow_filter());
        inner_shadow.add_child(Node::graphics("shape", path.clone(), Fill::white()));

        let mut outer_glow =
            Node::container(OUTER_GLOW_LABEL).with_filter(style.outer_glow_filter());
        outer_glow.add_child(Node::graphics("shape", path.clone(), Fill::white()));

        let base = Node::graphics(
            AOE_LABEL,
            path,
            Fill::new(style.colors.aoe, style.aoe_alpha),
        );

        let mut node = Node::container(shape.kind().as_str());
        node.add_child(inner_shadow);
        node.add_child(outer_glow);
        node.add_child(base);

        Ok(Self {
            shape,
            resolution: style.resolution,
            style: Some(style),
            node,
        })
    }

    pub fn rect(width: f64, height: f64, options: &AoEOptions) -> OverlayResult<Self> {
        Self::new(AoEShape::Rect { width, height }, options)
    }

    pub fn ray(width: f64, length: f64, options: &AoEOptions) -> OverlayResult<Self> {
        Self::new(AoEShape::Ray { width, length }, options)
    }

    pub fn circle(radius: f64, options: &AoEOptions) -> OverlayResult<Self> {
        Self::new(AoEShape::Circle { radius }, options)
    }

    pub fn ring(inner_radius: f64, outer_radius: f64, options: &AoEOptions) -> OverlayResult<Self> {
        Self::new(
            AoEShape::Ring {
                inner_radius,
                outer_radius,
            },
            options,
        )
    }

    /// `angle` in degrees
    pub fn fan(radius: f64, angle: f64, options: &AoEOptions) -> OverlayResult<Self> {
        Self::new(AoEShape::Fan { radius, angle }, options)
    }

    /// Single-layer variant drawn by the range-area filter instead of glows
    pub fn range_area(
        shape: AoEShape,
        preset: RangeAreaPreset,
        resolution: f64,
    ) -> OverlayResult<Self> {
        shape.validate()?;
        let resolution = ensure_positive("resolution", resolution)?;
        let mut node = Node::container(shape.kind().as_str());
        node.add_child(
            Node::graphics(RANGE_AREA_LABEL, shape.path(resolution), Fill::white())
                .with_filter(preset.filter().scaled(resolution as f32)),
        );
        Ok(Self {
            shape,
            resolution,
            style: None,
            node,
        })
    }

    pub fn shape(&self) -> &AoEShape {
        &self.shape
    }

    pub fn kind(&self) -> AoEShapeKind {
        self.shape.kind()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Resolved style; `None` for range-area visuals
    pub fn style(&self) -> Option<&AoEStyle> {
        self.style.as_ref()
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    pub fn layer(&self, label: &str) -> Option<&Node> {
        self.node.child(label)
    }

    pub fn local_bounds(&self) -> OverlayResult<Bounds> {
        self.node
            .local_bounds()
            .ok_or_else(|| {
                OverlayError::validation(format!("{} has no geometry", self.kind().as_str()))
            })
    }

    /// Capture rectangle: the local bounds padded by one world unit on every side
    pub fn bake_frame(&self) -> OverlayResult<Bounds> {
        Ok(self.local_bounds()?.expand(YM_TO_PX * self.resolution))
    }

    /// Flatten the layers into one texture
    pub fn to_texture<R: Renderer + ?Sized>(&self, renderer: &mut R) -> OverlayResult<AoETexture> {
        let frame = self.bake_frame()?;
        let texture = renderer.extract_texture(&self.node, frame)?;
        log::debug!(
            "baked {} aoe at {}x: {}x{}",
            self.kind().as_str(),
            self.resolution,
            texture.width(),
            texture.height()
        );
        Ok(AoETexture {
            texture,
            kind: self.kind(),
            resolution: self.resolution,
            origin: -frame.min,
        })
    }

    /// Baked sprite pivoted on its anchor and scaled back down by the resolution
    pub fn to_sprite<R: Renderer + ?Sized>(&self, renderer: &mut R) -> OverlayResult<Node> {
        Ok(self.to_texture(renderer)?.into_sprite())
    }
}

/// A baked AoE texture that remembers what it was baked from
#[derive(Debug, Clone, PartialEq)]
pub struct AoETexture {
    pub texture: Texture,
    pub kind: AoEShapeKind,
    pub resolution: f64,
    /// Texel position of the shape's local origin
    pub origin: DVec2,
}

impl AoETexture {
    /// Ray and fan pivot on their origin, everything else on the texture center
    pub fn center_pivot(&self) -> DVec2 {
        if self.kind.is_directional() {
            self.origin
        } else {
            DVec2::new(
                self.texture.width() as f64 / 2.0,
                self.texture.height() as f64 / 2.0,
            )
        }
    }

    pub fn into_sprite(self) -> Node {
        let pivot = self.center_pivot();
        let mut sprite = Node::sprite(format!("{}_sprite", self.kind.as_str()), self.texture);
        sprite.pivot = pivot;
        sprite.set_scale(1.0 / self.resolution);
        sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aoe::style::Palette;
    use crate::renderer::{Content, CpuRenderer, Filter};

    fn low_res() -> AoEOptions {
        AoEOptions::default().with_resolution(1.0)
    }

    #[test]
    fn test_layers_in_stacking_order() {
        let aoe = AoE::circle(5.0, &AoEOptions::default()).unwrap();
        let labels: Vec<&str> = aoe.node().children().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, [INNER_SHADOW_LABEL, OUTER_GLOW_LABEL, AOE_LABEL]);
        match &aoe.layer(AOE_LABEL).unwrap().content {
            Content::Graphics { fill, .. } => {
                assert_eq!(fill.alpha, 0.25);
                assert_eq!(fill.color, Palette::Default.colors().aoe);
            }
            other => panic!("unexpected base content {other:?}"),
        }
        match aoe.layer(INNER_SHADOW_LABEL).unwrap().filters.as_slice() {
            [Filter::Glow(glow)] => assert_eq!(glow.distance, 72.0),
            other => panic!("unexpected filters {other:?}"),
        }
    }

    #[test]
    fn test_ring_fails_before_build() {
        let err = AoE::ring(15.0, 8.0, &AoEOptions::default()).unwrap_err();
        assert!(matches!(err, OverlayError::Validation(_)));
    }

    #[test]
    fn test_bake_frame_pads_one_world_unit() {
        let aoe = AoE::circle(5.0, &low_res()).unwrap();
        let frame = aoe.bake_frame().unwrap();
        // Flattened circles sit just inside the true radius
        assert!((frame.min.x + 60.0).abs() < 0.1);
        assert!((frame.width() - 120.0).abs() < 0.1);
    }

    #[test]
    fn test_sprite_pivot_and_scale() {
        let mut renderer = CpuRenderer::new();
        let circle = AoE::circle(2.0, &AoEOptions::default()).unwrap();
        let tex = circle.to_texture(&mut renderer).unwrap();
        assert_eq!((tex.texture.width(), tex.texture.height()), (120, 120));
        assert_eq!(tex.center_pivot(), DVec2::new(60.0, 60.0));
        let sprite = tex.into_sprite();
        assert_eq!(sprite.scale, DVec2::splat(0.5));

        let ray = AoE::ray(2.0, 6.0, &AoEOptions::default()).unwrap();
        let tex = ray.to_texture(&mut renderer).unwrap();
        // Origin sits one world unit in from the left edge, vertically centered
        assert_eq!(tex.center_pivot(), DVec2::new(20.0, 40.0));
        assert_eq!(renderer.extract_count(), 2);
    }

    #[test]
    fn test_baked_circle_is_visible_and_transparent_outside() {
        let mut renderer = CpuRenderer::new();
        let tex = AoE::circle(3.0, &low_res())
            .unwrap()
            .to_texture(&mut renderer)
            .unwrap()
            .texture;
        let center = tex.pixel(40, 40).unwrap();
        assert!(center.a > 0);
        assert_eq!(tex.pixel(0, 0).unwrap().a, 0);
        assert!(tex.covered_texels() > 0);
    }

    #[test]
    fn test_range_area_single_layer() {
        let aoe =
            AoE::range_area(AoEShape::Circle { radius: 4.0 }, RangeAreaPreset::Blue, 1.0).unwrap();
        assert_eq!(aoe.node().children().len(), 1);
        assert!(aoe.style().is_none());
        let layer = aoe.layer(RANGE_AREA_LABEL).unwrap();
        assert!(matches!(layer.filters.as_slice(), [Filter::RangeArea(_)]));
        let tex = aoe.to_texture(&mut CpuRenderer::new()).unwrap().texture;
        assert!(tex.covered_texels() > 0);
    }
}
