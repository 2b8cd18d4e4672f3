//! Decorative effects outside the AoE family
//!
//! - `tether`: channeling tethers built from tinted, baked and tiled strips
//! - `gradient_ring`: the radial-gradient ring sprite drawn under ground markers

pub mod gradient_ring;
pub mod tether;

pub use gradient_ring::{create_gradient_ring, ring_stops};
pub use tether::{create_arrow_tether, create_dark_tether};

use crate::error::{OverlayError, OverlayResult};
use crate::renderer::{Node, Renderer, Texture};

/// Flatten `node` over its own local bounds
fn bake<R: Renderer + ?Sized>(renderer: &mut R, node: &Node) -> OverlayResult<Texture> {
    let frame = node
        .local_bounds()
        .ok_or_else(|| OverlayError::resource(format!("nothing to bake in '{}'", node.label)))?;
    renderer.extract_texture(node, frame)
}
