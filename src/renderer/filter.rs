//! Pixel-filter parameters
//!
//! The core only describes filters; executing them is the renderer's business.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Multi-directional glow sampled around each pixel.
///
/// `inner_strength` darkens toward the glow color inside the shape near its edge,
/// `outer_strength` spills the color outside. With `knockout` only the glow is kept and the
/// source pixels are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowFilter {
    pub color: Color,
    pub alpha: f32,
    /// Reach of the glow in pixels
    pub distance: f32,
    pub inner_strength: f32,
    pub outer_strength: f32,
    /// Sampling density in `(0, 1]`
    pub quality: f32,
    pub knockout: bool,
}

impl Default for GlowFilter {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            alpha: 1.0,
            distance: 10.0,
            inner_strength: 0.0,
            outer_strength: 4.0,
            quality: 0.1,
            knockout: false,
        }
    }
}

/// Shader-style range area: translucent base with two inner-shadow bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeAreaFilter {
    /// Straight RGBA
    pub base_color: [f32; 4],
    pub inner_shadow1_color: [f32; 4],
    /// Band width in pixels
    pub inner_shadow1_size: f32,
    pub inner_shadow2_color: [f32; 4],
    pub inner_shadow2_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeAreaPreset {
    #[default]
    Default,
    Blue,
    Purple,
}

impl RangeAreaPreset {
    pub fn filter(self) -> RangeAreaFilter {
        match self {
            RangeAreaPreset::Default => RangeAreaFilter {
                base_color: [1.0, 0.635, 0.25, 0.3],
                inner_shadow1_color: [0.984, 0.82, 0.45, 1.0],
                inner_shadow1_size: 4.0,
                inner_shadow2_color: [1.0, 0.59, 0.207, 1.0],
                inner_shadow2_size: 16.0,
            },
            RangeAreaPreset::Blue => RangeAreaFilter {
                base_color: [0.5, 0.8, 1.0, 0.3],
                inner_shadow1_color: [0.184, 0.725, 1.0, 1.0],
                inner_shadow1_size: 4.0,
                inner_shadow2_color: [0.184, 0.725, 1.0, 1.0],
                inner_shadow2_size: 16.0,
            },
            RangeAreaPreset::Purple => RangeAreaFilter {
                base_color: [1.0, 0.482, 0.788, 0.3],
                inner_shadow1_color: [1.0, 0.5, 0.807, 1.0],
                inner_shadow1_size: 4.0,
                inner_shadow2_color: [1.0, 0.5, 0.807, 1.0],
                inner_shadow2_size: 16.0,
            },
        }
    }
}

impl RangeAreaFilter {
    /// Band widths multiplied by an oversampling factor
    pub fn scaled(mut self, resolution: f32) -> Self {
        self.inner_shadow1_size *= resolution;
        self.inner_shadow2_size *= resolution;
        self
    }
}

/// Gaussian-blurred silhouette of the source in a flat color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropShadowFilter {
    pub color: Color,
    pub alpha: f32,
    /// Shadow displacement in pixels
    pub offset: [f32; 2],
    /// Blur kernel radius in pixels; 0 disables blurring
    pub blur_radius: u32,
    /// Drop the source and keep only the shadow
    pub shadow_only: bool,
}

impl Default for DropShadowFilter {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            alpha: 0.5,
            offset: [4.0, 4.0],
            blur_radius: 6,
            shadow_only: false,
        }
    }
}

impl DropShadowFilter {
    pub fn sigma(&self) -> f32 {
        (self.blur_radius as f32 / 3.0).max(0.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Glow(GlowFilter),
    RangeArea(RangeAreaFilter),
    DropShadow(DropShadowFilter),
}

impl From<GlowFilter> for Filter {
    fn from(glow: GlowFilter) -> Self {
        Filter::Glow(glow)
    }
}

impl From<RangeAreaFilter> for Filter {
    fn from(area: RangeAreaFilter) -> Self {
        Filter::RangeArea(area)
    }
}

impl From<DropShadowFilter> for Filter {
    fn from(shadow: DropShadowFilter) -> Self {
        Filter::DropShadow(shadow)
    }
}
