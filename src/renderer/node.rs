//! Scene graph nodes
//!
//! A node owns its children outright; there is no sharing between subtrees. Transforms follow
//! the usual 2D display-list convention: a node is placed by
//! `translate(position) · rotate(rotation) · scale(scale) · translate(-pivot)`.

use glam::{DAffine2, DVec2};

use super::color::Color;
use super::filter::Filter;
use super::shapes::{Bounds, ShapePath};
use super::texture::Texture;

/// Solid fill for a graphics node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub alpha: f32,
}

impl Fill {
    pub const fn new(color: Color, alpha: f32) -> Self {
        Self { color, alpha }
    }

    /// Opaque white, used for glow sources and masks
    pub const fn white() -> Self {
        Self::new(Color::WHITE, 1.0)
    }
}

/// Color stop of a radial gradient; `offset` runs from the center (0) to the rim (1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
    pub alpha: f32,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Color, alpha: f32) -> Self {
        Self {
            offset,
            color,
            alpha,
        }
    }
}

/// What a node draws itself, before its children
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Graphics { path: ShapePath, fill: Fill },
    /// Occupies `[0, width] x [0, height]` in local space
    Sprite(Texture),
    /// Texture repeated over `[0, width] x [0, height]`
    TilingSprite {
        texture: Texture,
        width: f64,
        height: f64,
    },
    /// Disc of `radius` around the local origin filled with a radial gradient
    RadialGradient {
        radius: f64,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub position: DVec2,
    /// Radians
    pub rotation: f64,
    pub scale: DVec2,
    pub pivot: DVec2,
    pub alpha: f32,
    pub content: Content,
    pub filters: Vec<Filter>,
    /// Alpha mask, expressed in this node's local frame
    pub mask: Option<Box<Node>>,
    children: Vec<Node>,
}

impl Node {
    fn with_content(label: impl Into<String>, content: Content) -> Self {
        Self {
            label: label.into(),
            position: DVec2::ZERO,
            rotation: 0.0,
            scale: DVec2::ONE,
            pivot: DVec2::ZERO,
            alpha: 1.0,
            content,
            filters: Vec::new(),
            mask: None,
            children: Vec::new(),
        }
    }

    pub fn container(label: impl Into<String>) -> Self {
        Self::with_content(label, Content::Empty)
    }

    pub fn graphics(label: impl Into<String>, path: ShapePath, fill: Fill) -> Self {
        Self::with_content(label, Content::Graphics { path, fill })
    }

    pub fn sprite(label: impl Into<String>, texture: Texture) -> Self {
        Self::with_content(label, Content::Sprite(texture))
    }

    pub fn tiling_sprite(
        label: impl Into<String>,
        texture: Texture,
        width: f64,
        height: f64,
    ) -> Self {
        Self::with_content(
            label,
            Content::TilingSprite {
                texture,
                width,
                height,
            },
        )
    }

    pub fn radial_gradient(
        label: impl Into<String>,
        radius: f64,
        stops: Vec<GradientStop>,
    ) -> Self {
        Self::with_content(label, Content::RadialGradient { radius, stops })
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = DVec2::splat(scale);
    }

    /// Place the pivot at a fraction of the sprite size (0.5, 0.5 centers it)
    pub fn set_anchor(&mut self, anchor: DVec2) {
        match &self.content {
            Content::Sprite(texture) => {
                self.pivot = DVec2::new(texture.width() as f64, texture.height() as f64) * anchor;
            }
            Content::TilingSprite { width, height, .. } => {
                self.pivot = DVec2::new(*width, *height) * anchor;
            }
            _ => {}
        }
    }

    pub fn set_mask(&mut self, mask: Node) {
        self.mask = Some(Box::new(mask));
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    pub fn child(&self, label: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.label == label)
    }

    pub fn child_mut(&mut self, label: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.label == label)
    }

    /// Detach the first child with the given label
    pub fn remove_child(&mut self, label: &str) -> Option<Node> {
        let idx = self.children.iter().position(|c| c.label == label)?;
        Some(self.children.remove(idx))
    }

    /// Depth-first search through descendants (including self)
    pub fn find(&self, label: &str) -> Option<&Node> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(label))
    }

    /// Transform from this node's local frame into its parent's frame
    pub fn local_transform(&self) -> DAffine2 {
        DAffine2::from_scale_angle_translation(self.scale, self.rotation, self.position)
            * DAffine2::from_translation(-self.pivot)
    }

    /// Bounds of what this node itself draws, in its local frame
    pub fn content_bounds(&self) -> Option<Bounds> {
        match &self.content {
            Content::Empty => None,
            Content::Graphics { path, .. } => path.bounds(),
            Content::Sprite(texture) => Some(Bounds::from_rect(
                0.0,
                0.0,
                texture.width() as f64,
                texture.height() as f64,
            )),
            Content::TilingSprite { width, height, .. } => {
                Some(Bounds::from_rect(0.0, 0.0, *width, *height))
            }
            Content::RadialGradient { radius, .. } => {
                Some(Bounds::new(DVec2::splat(-*radius), DVec2::splat(*radius)))
            }
        }
    }

    /// Bounds of the whole subtree in this node's local frame.
    ///
    /// Filters and masks do not enlarge the result.
    pub fn local_bounds(&self) -> Option<Bounds> {
        self.children
            .iter()
            .filter_map(|child| {
                child
                    .local_bounds()
                    .map(|b| b.transformed(&child.local_transform()))
            })
            .chain(self.content_bounds())
            .reduce(|a, b| a.union(&b))
    }

    /// Number of nodes in the subtree, masks excluded
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Rgba8;
    use std::f64::consts::FRAC_PI_2;

    fn square(label: &str, size: f64) -> Node {
        Node::graphics(label, ShapePath::rect(0.0, 0.0, size, size), Fill::white())
    }

    #[test]
    fn test_children_by_label() {
        let mut root = Node::container("root");
        root.add_child(square("a", 1.0));
        root.add_child(square("b", 2.0));
        assert_eq!(root.child("b").map(|n| n.label.as_str()), Some("b"));
        assert!(root.remove_child("a").is_some());
        assert!(root.child("a").is_none());
        assert_eq!(root.node_count(), 2);
    }

    #[test]
    fn test_local_bounds_includes_child_transforms() {
        let mut root = Node::container("root");
        root.add_child(square("a", 10.0).with_position(DVec2::new(100.0, 0.0)));
        root.add_child(square("b", 10.0).with_rotation(FRAC_PI_2));
        let b = root.local_bounds().unwrap();
        assert!((b.min.x + 10.0).abs() < 1e-9);
        assert!((b.max.x - 110.0).abs() < 1e-9);
        assert!((b.max.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_and_scale() {
        let tex = Texture::solid(20, 10, super::super::texture::Rgba8::new(1, 1, 1, 1)).unwrap();
        let mut sprite = Node::sprite("s", tex);
        sprite.set_anchor(DVec2::splat(0.5));
        sprite.set_scale(0.5);
        assert_eq!(sprite.pivot, DVec2::new(10.0, 5.0));
        let p = sprite.local_transform().transform_point2(DVec2::new(10.0, 5.0));
        assert!(p.length() < 1e-12);
        let corner = sprite.local_transform().transform_point2(DVec2::new(20.0, 10.0));
        assert!((corner - DVec2::new(5.0, 2.5)).length() < 1e-12);
    }

    #[test]
    fn test_tiling_anchor_and_gradient_bounds() {
        let tex = Texture::solid(2, 2, Rgba8::new(1, 1, 1, 1)).unwrap();
        let mut strip = Node::tiling_sprite("strip", tex, 30.0, 4.0);
        strip.set_anchor(DVec2::new(0.5, 1.0));
        assert_eq!(strip.pivot, DVec2::new(15.0, 4.0));
        assert_eq!(strip.content_bounds().unwrap().max, DVec2::new(30.0, 4.0));

        let disc = Node::radial_gradient("glow", 5.0, Vec::new());
        let b = disc.local_bounds().unwrap();
        assert_eq!((b.min, b.max), (DVec2::splat(-5.0), DVec2::splat(5.0)));
    }

    #[test]
    fn test_empty_container_has_no_bounds() {
        assert!(Node::container("empty").local_bounds().is_none());
    }
}
