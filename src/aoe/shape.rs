//! Shape generator
//!
//! Dimensions are world units. `path` maps them to pixels with `YM_TO_PX * resolution` in the
//! canonical local frame: rect, circle and ring are centered on the origin; ray and fan start
//! at the origin and extend along +x.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::YM_TO_PX;
use crate::error::{OverlayError, OverlayResult, ensure_finite, ensure_positive};
use crate::renderer::ShapePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AoEShapeKind {
    Rect,
    Ray,
    Circle,
    Ring,
    Fan,
}

impl AoEShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AoEShapeKind::Rect => "rect",
            AoEShapeKind::Ray => "ray",
            AoEShapeKind::Circle => "circle",
            AoEShapeKind::Ring => "ring",
            AoEShapeKind::Fan => "fan",
        }
    }

    /// Whether the shape's anchor is its origin rather than its center
    pub fn is_directional(&self) -> bool {
        matches!(self, AoEShapeKind::Ray | AoEShapeKind::Fan)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AoEShape {
    Rect { width: f64, height: f64 },
    /// `width` across, `length` along +x from the origin
    Ray { width: f64, length: f64 },
    Circle { radius: f64 },
    Ring { inner_radius: f64, outer_radius: f64 },
    /// `angle` in degrees, swept symmetrically about +x
    Fan { radius: f64, angle: f64 },
}

impl AoEShape {
    pub fn kind(&self) -> AoEShapeKind {
        match self {
            AoEShape::Rect { .. } => AoEShapeKind::Rect,
            AoEShape::Ray { .. } => AoEShapeKind::Ray,
            AoEShape::Circle { .. } => AoEShapeKind::Circle,
            AoEShape::Ring { .. } => AoEShapeKind::Ring,
            AoEShape::Fan { .. } => AoEShapeKind::Fan,
        }
    }

    pub fn validate(&self) -> OverlayResult<()> {
        match *self {
            AoEShape::Rect { width, height } => {
                ensure_positive("rect width", width)?;
                ensure_positive("rect height", height)?;
            }
            AoEShape::Ray { width, length } => {
                ensure_positive("ray width", width)?;
                ensure_positive("ray length", length)?;
            }
            AoEShape::Circle { radius } => {
                ensure_positive("circle radius", radius)?;
            }
            AoEShape::Ring {
                inner_radius,
                outer_radius,
            } => {
                ensure_finite("ring inner radius", inner_radius)?;
                ensure_positive("ring outer radius", outer_radius)?;
                if inner_radius < 0.0 {
                    return Err(OverlayError::validation(format!(
                        "ring inner radius must not be negative, got {inner_radius}"
                    )));
                }
                if inner_radius >= outer_radius {
                    return Err(OverlayError::validation(format!(
                        "ring inner radius {inner_radius} must be less than outer radius {outer_radius}"
                    )));
                }
            }
            AoEShape::Fan { radius, angle } => {
                ensure_positive("fan radius", radius)?;
                ensure_positive("fan angle", angle)?;
                if angle > 360.0 {
                    return Err(OverlayError::validation(format!(
                        "fan angle must be at most 360 degrees, got {angle}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Filled path in pixels at the given oversampling resolution
    pub fn path(&self, resolution: f64) -> ShapePath {
        let s = YM_TO_PX * resolution;
        match *self {
            AoEShape::Rect { width, height } => {
                let (w, h) = (width * s, height * s);
                ShapePath::rect(-w / 2.0, -h / 2.0, w, h)
            }
            AoEShape::Ray { width, length } => {
                let w = width * s;
                ShapePath::rect(0.0, -w / 2.0, length * s, w)
            }
            AoEShape::Circle { radius } => ShapePath::circle(DVec2::ZERO, radius * s),
            AoEShape::Ring {
                inner_radius,
                outer_radius,
            } => ShapePath::ring(DVec2::ZERO, inner_radius * s, outer_radius * s),
            AoEShape::Fan { radius, angle } => {
                let half = angle.to_radians() / 2.0;
                ShapePath::pie(DVec2::ZERO, radius * s, -half, half)
            }
        }
    }
}
