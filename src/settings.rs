//! Overlay settings
//!
//! Persisted as a JSON file next to the scene output. A missing file means defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aoe::{AoEOptions, AoEStyle, GlowOverrides, MaskConfig, Palette};
use crate::error::{OverlayError, OverlayResult, ensure_positive};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Oversampling resolution used when baking AoEs
    pub fn resolution(&self) -> f64 {
        match self {
            QualityPreset::Low => 1.0,
            QualityPreset::Medium => 2.0,
            QualityPreset::High => 3.0,
        }
    }

    /// Glow sampling density
    pub fn glow_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.5,
            QualityPreset::High => 1.0,
        }
    }
}

/// In-game camera used to size icon sprites
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Camera distance from the arena
    pub distance: f64,
    /// Vertical field of view in radians
    pub fov: f64,
    /// Game window height in pixels
    pub screen_height: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance: 50.0,
            fov: 1.0,
            screen_height: 2160.0,
        }
    }
}

impl CameraSettings {
    pub fn view_scale(&self) -> OverlayResult<f64> {
        ensure_positive("camera distance", self.distance)?;
        ensure_positive("camera fov", self.fov)?;
        ensure_positive("screen height", self.screen_height)?;
        Ok(crate::view_scale(self.distance, self.fov, self.screen_height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    pub quality: QualityPreset,
    pub palette: Palette,
    /// Base fill alpha; `None` keeps the style default
    pub aoe_alpha: Option<f32>,
    pub mask: MaskConfig,
    pub camera: CameraSettings,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            palette: Palette::Default,
            aoe_alpha: None,
            mask: MaskConfig::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl OverlaySettings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// AoE overrides implied by these settings
    pub fn aoe_options(&self) -> AoEOptions {
        let glow = GlowOverrides {
            quality: Some(self.quality.glow_quality()),
            ..Default::default()
        };
        AoEOptions {
            colors: self.palette.into(),
            aoe_alpha: self.aoe_alpha,
            inner_shadow: glow,
            outer_glow: glow,
            resolution: Some(self.quality.resolution()),
        }
    }

    pub fn validate(&self) -> OverlayResult<()> {
        AoEStyle::with_overrides(&self.aoe_options())?;
        self.mask.validate()?;
        self.camera.view_scale()?;
        Ok(())
    }

    /// Load from a JSON file; a missing file yields defaults
    pub fn load(path: &Path) -> OverlayResult<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            OverlayError::resource(format!("read settings '{}': {e}", path.display()))
        })?;
        let settings: Self = serde_json::from_str(&json).map_err(|e| {
            OverlayError::validation(format!("malformed settings '{}': {e}", path.display()))
        })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> OverlayResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| OverlayError::resource(format!("encode settings: {e}")))?;
        std::fs::write(path, json).map_err(|e| {
            OverlayError::resource(format!("write settings '{}': {e}", path.display()))
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
