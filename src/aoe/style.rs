//! AoE styling: palettes, glow defaults and partial overrides
//!
//! `AoEOptions` is the partial form callers pass around; `AoEStyle` is the fully resolved form
//! with every field filled from the defaults.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::consts::{DEFAULT_AOE_ALPHA, DEFAULT_RESOLUTION};
use crate::error::{OverlayError, OverlayResult, ensure_positive, ensure_unit_alpha};
use crate::renderer::{Color, GlowFilter};

/// Colors of the three layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AoEColors {
    pub aoe: Color,
    pub inner_shadow: Color,
    pub outer_glow: Color,
}

impl Default for AoEColors {
    fn default() -> Self {
        Palette::Default.colors()
    }
}

/// Named color sets; the tailwind-like ones use the 400/500/200 shades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Default,
    Sky,
    Green,
    Orange,
    Purple,
    Red,
}

impl Palette {
    pub const ALL: [Palette; 6] = [
        Palette::Default,
        Palette::Sky,
        Palette::Green,
        Palette::Orange,
        Palette::Purple,
        Palette::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Default => "default",
            Palette::Sky => "sky",
            Palette::Green => "green",
            Palette::Orange => "orange",
            Palette::Purple => "purple",
            Palette::Red => "red",
        }
    }

    pub fn colors(&self) -> AoEColors {
        let (aoe, inner_shadow, outer_glow) = match self {
            Palette::Default => (0xe7a15d, 0xff751f, 0xfffc79),
            Palette::Sky => (0x38bdf8, 0x0ea5e9, 0xbae6fd),
            Palette::Green => (0x4ade80, 0x22c55e, 0xbbf7d0),
            Palette::Orange => (0xfb923c, 0xf97316, 0xfed7aa),
            Palette::Purple => (0xc084fc, 0xa855f7, 0xe9d5ff),
            Palette::Red => (0xf87171, 0xef4444, 0xfecaca),
        };
        AoEColors {
            aoe: Color::hex(aoe),
            inner_shadow: Color::hex(inner_shadow),
            outer_glow: Color::hex(outer_glow),
        }
    }
}

impl FromStr for Palette {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| OverlayError::validation(format!("unknown palette '{s}'")))
    }
}

/// Partial color override; unset fields fall through to the base
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorOverrides {
    pub aoe: Option<Color>,
    pub inner_shadow: Option<Color>,
    pub outer_glow: Option<Color>,
}

impl ColorOverrides {
    pub fn apply(&self, base: AoEColors) -> AoEColors {
        AoEColors {
            aoe: self.aoe.unwrap_or(base.aoe),
            inner_shadow: self.inner_shadow.unwrap_or(base.inner_shadow),
            outer_glow: self.outer_glow.unwrap_or(base.outer_glow),
        }
    }

    pub fn merged_over(&self, base: &ColorOverrides) -> ColorOverrides {
        ColorOverrides {
            aoe: self.aoe.or(base.aoe),
            inner_shadow: self.inner_shadow.or(base.inner_shadow),
            outer_glow: self.outer_glow.or(base.outer_glow),
        }
    }
}

impl From<AoEColors> for ColorOverrides {
    fn from(colors: AoEColors) -> Self {
        Self {
            aoe: Some(colors.aoe),
            inner_shadow: Some(colors.inner_shadow),
            outer_glow: Some(colors.outer_glow),
        }
    }
}

impl From<Palette> for ColorOverrides {
    fn from(palette: Palette) -> Self {
        palette.colors().into()
    }
}

/// Partial glow parameters. `distance` is in unscaled pixels; the resolution is applied later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlowOverrides {
    pub color: Option<Color>,
    pub alpha: Option<f32>,
    pub distance: Option<f32>,
    pub inner_strength: Option<f32>,
    pub outer_strength: Option<f32>,
    pub quality: Option<f32>,
    pub knockout: Option<bool>,
}

impl GlowOverrides {
    pub fn apply(&self, base: GlowFilter) -> GlowFilter {
        GlowFilter {
            color: self.color.unwrap_or(base.color),
            alpha: self.alpha.unwrap_or(base.alpha),
            distance: self.distance.unwrap_or(base.distance),
            inner_strength: self.inner_strength.unwrap_or(base.inner_strength),
            outer_strength: self.outer_strength.unwrap_or(base.outer_strength),
            quality: self.quality.unwrap_or(base.quality),
            knockout: self.knockout.unwrap_or(base.knockout),
        }
    }

    pub fn merged_over(&self, base: &GlowOverrides) -> GlowOverrides {
        GlowOverrides {
            color: self.color.or(base.color),
            alpha: self.alpha.or(base.alpha),
            distance: self.distance.or(base.distance),
            inner_strength: self.inner_strength.or(base.inner_strength),
            outer_strength: self.outer_strength.or(base.outer_strength),
            quality: self.quality.or(base.quality),
            knockout: self.knockout.or(base.knockout),
        }
    }
}

/// Caller-facing partial options for building an AoE
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AoEOptions {
    pub colors: ColorOverrides,
    pub aoe_alpha: Option<f32>,
    pub inner_shadow: GlowOverrides,
    pub outer_glow: GlowOverrides,
    pub resolution: Option<f64>,
}

impl AoEOptions {
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.colors = palette.into();
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = Some(resolution);
        self
    }

    /// Field-by-field merge: values set on `self` win, the rest come from `base`
    pub fn merged_over(&self, base: &AoEOptions) -> AoEOptions {
        AoEOptions {
            colors: self.colors.merged_over(&base.colors),
            aoe_alpha: self.aoe_alpha.or(base.aoe_alpha),
            inner_shadow: self.inner_shadow.merged_over(&base.inner_shadow),
            outer_glow: self.outer_glow.merged_over(&base.outer_glow),
            resolution: self.resolution.or(base.resolution),
        }
    }
}

/// Fully resolved style of one AoE
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AoEStyle {
    pub colors: AoEColors,
    pub aoe_alpha: f32,
    /// Glow distances here are unscaled; see [`AoEStyle::inner_shadow_filter`]
    pub inner_shadow: GlowFilter,
    pub outer_glow: GlowFilter,
    pub resolution: f64,
}

impl Default for AoEStyle {
    fn default() -> Self {
        let colors = AoEColors::default();
        Self {
            colors,
            aoe_alpha: DEFAULT_AOE_ALPHA,
            inner_shadow: GlowFilter {
                color: colors.inner_shadow,
                alpha: 0.6,
                distance: 36.0,
                inner_strength: 4.0,
                outer_strength: 0.0,
                quality: 0.5,
                knockout: true,
            },
            outer_glow: GlowFilter {
                color: colors.outer_glow,
                alpha: 0.6,
                distance: 8.0,
                inner_strength: 5.0,
                outer_strength: 0.0,
                quality: 0.5,
                knockout: true,
            },
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl AoEStyle {
    /// Resolve partial options over the defaults.
    ///
    /// A glow color set on the layer beats the palette color for that layer.
    pub fn with_overrides(options: &AoEOptions) -> OverlayResult<Self> {
        let defaults = Self::default();
        let colors = options.colors.apply(defaults.colors);
        let inner_shadow = options.inner_shadow.apply(GlowFilter {
            color: colors.inner_shadow,
            ..defaults.inner_shadow
        });
        let outer_glow = options.outer_glow.apply(GlowFilter {
            color: colors.outer_glow,
            ..defaults.outer_glow
        });
        let resolution = ensure_positive(
            "resolution",
            options.resolution.unwrap_or(defaults.resolution),
        )?;
        let aoe_alpha =
            ensure_unit_alpha("aoe alpha", options.aoe_alpha.unwrap_or(defaults.aoe_alpha))?;

        for (name, glow) in [("inner shadow", &inner_shadow), ("outer glow", &outer_glow)] {
            if !(glow.distance.is_finite() && glow.distance >= 0.0) {
                return Err(OverlayError::validation(format!(
                    "{name} distance must be a non-negative number, got {}",
                    glow.distance
                )));
            }
        }

        Ok(Self {
            colors,
            aoe_alpha,
            inner_shadow,
            outer_glow,
            resolution,
        })
    }

    /// Inner shadow filter with its distance scaled by the resolution
    pub fn inner_shadow_filter(&self) -> GlowFilter {
        scale_glow(self.inner_shadow, self.resolution)
    }

    pub fn outer_glow_filter(&self) -> GlowFilter {
        scale_glow(self.outer_glow, self.resolution)
    }
}

fn scale_glow(glow: GlowFilter, resolution: f64) -> GlowFilter {
    GlowFilter {
        distance: glow.distance * resolution as f32,
        ..glow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let style = AoEStyle::default();
        assert_eq!(style.colors.aoe, Color::hex(0xe7a15d));
        assert_eq!(style.inner_shadow.color, Color::hex(0xff751f));
        assert_eq!(style.outer_glow.color, Color::hex(0xfffc79));
        assert_eq!(style.aoe_alpha, 0.25);
        assert_eq!(style.inner_shadow_filter().distance, 72.0);
        assert_eq!(style.outer_glow_filter().distance, 16.0);
        assert!(style.inner_shadow.knockout && style.outer_glow.knockout);
    }

    #[test]
    fn test_partial_override_merges() {
        let options = AoEOptions {
            colors: ColorOverrides {
                aoe: Some(Color::hex(0x123456)),
                ..Default::default()
            },
            outer_glow: GlowOverrides {
                distance: Some(4.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let style = AoEStyle::with_overrides(&options).unwrap();
        assert_eq!(style.colors.aoe, Color::hex(0x123456));
        assert_eq!(style.colors.inner_shadow, Color::hex(0xff751f));
        assert_eq!(style.outer_glow.distance, 4.0);
        assert_eq!(style.outer_glow.inner_strength, 5.0);
        assert_eq!(style.inner_shadow.distance, 36.0);
    }

    #[test]
    fn test_layer_color_beats_palette() {
        let mut options = AoEOptions::default().with_palette(Palette::Sky);
        options.inner_shadow.color = Some(Color::BLACK);
        let style = AoEStyle::with_overrides(&options).unwrap();
        assert_eq!(style.inner_shadow.color, Color::BLACK);
        assert_eq!(style.outer_glow.color, Palette::Sky.colors().outer_glow);
        assert_eq!(style.colors.aoe, Color::hex(0x38bdf8));
    }

    #[test]
    fn test_options_merge_prefers_self() {
        let base = AoEOptions {
            aoe_alpha: Some(0.5),
            resolution: Some(3.0),
            ..Default::default()
        };
        let item = AoEOptions {
            aoe_alpha: Some(0.1),
            ..Default::default()
        };
        let merged = item.merged_over(&base);
        assert_eq!(merged.aoe_alpha, Some(0.1));
        assert_eq!(merged.resolution, Some(3.0));
    }

    #[test]
    fn test_rejects_bad_resolution() {
        let options = AoEOptions::default().with_resolution(0.0);
        assert!(AoEStyle::with_overrides(&options).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_alpha() {
        for alpha in [7.0, -0.5, f32::NAN] {
            let options = AoEOptions {
                aoe_alpha: Some(alpha),
                ..Default::default()
            };
            let err = AoEStyle::with_overrides(&options).unwrap_err();
            assert!(matches!(err, OverlayError::Validation(_)), "{alpha}: {err:?}");
        }
        let edge = AoEOptions {
            aoe_alpha: Some(1.0),
            ..Default::default()
        };
        assert_eq!(AoEStyle::with_overrides(&edge).unwrap().aoe_alpha, 1.0);
    }

    #[test]
    fn test_palette_names() {
        for palette in Palette::ALL {
            assert_eq!(palette.as_str().parse::<Palette>().unwrap(), palette);
        }
        assert!("teal".parse::<Palette>().is_err());
        let json = serde_json::to_string(&Palette::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
    }

    #[test]
    fn test_options_deserialize_partially() {
        let options: AoEOptions =
            serde_json::from_str(r##"{"colors":{"aoe":"#ffffff"},"aoe_alpha":0.4}"##).unwrap();
        assert_eq!(options.colors.aoe, Some(Color::WHITE));
        assert_eq!(options.colors.outer_glow, None);
        assert_eq!(options.aoe_alpha, Some(0.4));
    }
}
