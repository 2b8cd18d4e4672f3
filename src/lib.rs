//! AoE Overlay - stylized area-of-effect overlays for raid-mechanics diagrams
//!
//! Core modules:
//! - `coords`: Cartesian/polar coordinate math (conversion, rotation, intersections)
//! - `aoe`: Shape generation, glow compositing, baking and the hazard-grid mask split
//! - `renderer`: Scene graph, filters and the CPU reference renderer
//! - `waymark` / `role`: Marker and icon placement from async-loaded sprites
//! - `encounter`: Static arena tables and scenario builders
//! - `effects`: Channeling tethers and the gradient ring sprite

pub mod aoe;
pub mod assets;
pub mod coords;
pub mod effects;
pub mod encounter;
pub mod error;
pub mod renderer;
pub mod role;
pub mod settings;
pub mod waymark;

pub use aoe::{AoE, AoEOptions, AoEShape, AoEShapeKind, MaskConfig, Palette};
pub use coords::Coordinate;
pub use error::{OverlayError, OverlayResult};
pub use renderer::{CpuRenderer, Node, Renderer, Texture};
pub use settings::{OverlaySettings, QualityPreset};

/// Scale and arena constants
pub mod consts {
    /// Canvas pixels per world unit, before oversampling
    pub const YM_TO_PX: f64 = 10.0;
    /// Default oversampling resolution for AoE bakes
    pub const DEFAULT_RESOLUTION: f64 = 2.0;
    /// Resolutions sprite assets are authored at (`@1x`..`@3x`)
    pub const SPRITE_RESOLUTIONS: [f64; 3] = [1.0, 2.0, 3.0];

    /// Base fill alpha of an AoE
    pub const DEFAULT_AOE_ALPHA: f32 = 0.25;

    /// Safe disc radius in world units
    pub const SAFE_RADIUS: f64 = 12.0;
    /// Outer edge of the hazard grid in world units
    pub const HAZARD_RADIUS: f64 = 15.0;
    /// Alpha of overlay parts under the hazard grid
    pub const DEFAULT_FADE_ALPHA: f32 = 0.2;

    /// Camera distance at which icon scale was measured
    pub const CALIBRATION_DISTANCE: f64 = 36.5;
    /// Measured pixels per world unit at the calibration distance on a 2160px screen
    pub const CALIBRATION_PX_PER_YM: f64 = 54.0;
    pub const REFERENCE_SCREEN_HEIGHT: f64 = 2160.0;
}

/// Sprite scale that makes icon assets match the in-game view.
///
/// Apparent size grows with `distance * tan(fov / 2)`, normalized to the calibration camera.
#[inline]
pub fn view_scale(distance: f64, fov: f64, screen_height: f64) -> f64 {
    use consts::*;
    let max_resolution = SPRITE_RESOLUTIONS.iter().copied().fold(1.0, f64::max);
    (distance * (fov * 0.5).tan()) / (CALIBRATION_DISTANCE * 0.5f64.tan())
        * (REFERENCE_SCREEN_HEIGHT / screen_height)
        * (YM_TO_PX / CALIBRATION_PX_PER_YM)
        * max_resolution
}

/// Convert world units to canvas pixels
#[inline]
pub fn world_to_canvas(world: glam::DVec2) -> glam::DVec2 {
    world * consts::YM_TO_PX
}
