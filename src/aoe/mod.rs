//! AoE overlays
//!
//! Shape generation, the layered glow compositor, batch builders and the mask-split
//! compositor. Everything is built in canvas pixels; world units are converted with
//! [`crate::consts::YM_TO_PX`] times the oversampling resolution.

pub mod batch;
pub mod mask;
pub mod shape;
pub mod style;
pub mod visual;

pub use batch::{CircleParams, FanParams, RectParams, create_circles, create_fans, create_rects};
pub use mask::{MaskConfig, MaskSplit, create_mask, split_container, split_container_async};
pub use shape::{AoEShape, AoEShapeKind};
pub use style::{AoEColors, AoEOptions, AoEStyle, ColorOverrides, GlowOverrides, Palette};
pub use visual::{AoE, AoETexture};
