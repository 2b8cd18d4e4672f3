//! Rendering collaborator
//!
//! A small retained scene graph plus the one capability the overlay core needs from a renderer:
//! flattening a subtree into a texture. `CpuRenderer` is the reference implementation.

pub mod color;
pub mod cpu;
pub mod filter;
pub mod node;
pub mod shapes;
pub mod texture;

pub use color::Color;
pub use cpu::CpuRenderer;
pub use filter::{DropShadowFilter, Filter, GlowFilter, RangeAreaFilter, RangeAreaPreset};
pub use node::{Content, Fill, GradientStop, Node};
pub use shapes::{Bounds, ShapePath};
pub use texture::{Rgba8, Texture};

use crate::error::OverlayResult;

pub trait Renderer {
    /// Render `target` in its own local frame (its placement is ignored), clipped to `frame`.
    ///
    /// Filters, masks and alpha on the target itself are honored.
    fn extract_texture(&mut self, target: &Node, frame: Bounds) -> OverlayResult<Texture>;
}
