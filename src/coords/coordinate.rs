//! Coordinate representations and conversions
//!
//! A coordinate is one of three shapes, distinguished by its fields exactly as they appear in
//! encounter data:
//! - `{x, y}`: Cartesian
//! - `{r, deg}`: polar, angle in degrees
//! - `{r, rad}`: polar, angle in radians
//!
//! Radii are never negative. Angles are unbounded; the `normalize_*` helpers fold them into a
//! canonical range when needed.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, OverlayResult, ensure_finite};

/// A point in the battlefield plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Cartesian { x: f64, y: f64 },
    PolarDegrees { r: f64, deg: f64 },
    PolarRadians { r: f64, rad: f64 },
}

/// Representation tag used when requesting a conversion by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateKind {
    Cartesian,
    PolarDegrees,
    PolarRadians,
}

impl CoordinateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinateKind::Cartesian => "cartesian",
            CoordinateKind::PolarDegrees => "polar-angle",
            CoordinateKind::PolarRadians => "polar-radian",
        }
    }
}

impl FromStr for CoordinateKind {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cartesian" => Ok(CoordinateKind::Cartesian),
            "polar-angle" | "polar-degrees" => Ok(CoordinateKind::PolarDegrees),
            "polar-radian" | "polar-radians" => Ok(CoordinateKind::PolarRadians),
            other => Err(OverlayError::unsupported_conversion(format!(
                "unknown coordinate representation '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CoordinateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Coordinate {
    pub const ORIGIN: Coordinate = Coordinate::Cartesian { x: 0.0, y: 0.0 };

    /// Validated Cartesian constructor
    pub fn cartesian(x: f64, y: f64) -> OverlayResult<Self> {
        Coordinate::Cartesian { x, y }.validated()
    }

    /// Validated polar constructor (degrees)
    pub fn polar_degrees(r: f64, deg: f64) -> OverlayResult<Self> {
        Coordinate::PolarDegrees { r, deg }.validated()
    }

    /// Validated polar constructor (radians)
    pub fn polar_radians(r: f64, rad: f64) -> OverlayResult<Self> {
        Coordinate::PolarRadians { r, rad }.validated()
    }

    pub fn from_point(p: DVec2) -> OverlayResult<Self> {
        Self::cartesian(p.x, p.y)
    }

    /// Parse a coordinate from its JSON literal form.
    ///
    /// Objects that match none of the three shapes are an unsupported representation rather
    /// than a validation failure.
    pub fn from_json(value: &serde_json::Value) -> OverlayResult<Self> {
        let coord: Coordinate = serde_json::from_value(value.clone()).map_err(|_| {
            OverlayError::unsupported_conversion(format!("unrecognized coordinate shape: {value}"))
        })?;
        coord.validated()
    }

    pub fn kind(&self) -> CoordinateKind {
        match self {
            Coordinate::Cartesian { .. } => CoordinateKind::Cartesian,
            Coordinate::PolarDegrees { .. } => CoordinateKind::PolarDegrees,
            Coordinate::PolarRadians { .. } => CoordinateKind::PolarRadians,
        }
    }

    /// Check the representation invariants, returning the value unchanged when they hold
    pub fn validated(self) -> OverlayResult<Self> {
        match self {
            Coordinate::Cartesian { x, y } => {
                ensure_finite("x", x)?;
                ensure_finite("y", y)?;
            }
            Coordinate::PolarDegrees { r, deg } => {
                ensure_radius(r)?;
                ensure_finite("deg", deg)?;
            }
            Coordinate::PolarRadians { r, rad } => {
                ensure_radius(r)?;
                ensure_finite("rad", rad)?;
            }
        }
        Ok(self)
    }

    pub fn to_cartesian(&self) -> OverlayResult<Coordinate> {
        let p = self.to_point()?;
        Coordinate::cartesian(p.x, p.y)
    }

    pub fn to_polar_degrees(&self) -> OverlayResult<Coordinate> {
        match self.validated()? {
            c @ Coordinate::PolarDegrees { .. } => Ok(c),
            Coordinate::PolarRadians { r, rad } => Coordinate::polar_degrees(r, rad_to_deg(rad)),
            Coordinate::Cartesian { x, y } => {
                Coordinate::polar_degrees(x.hypot(y), rad_to_deg(y.atan2(x)))
            }
        }
    }

    pub fn to_polar_radians(&self) -> OverlayResult<Coordinate> {
        match self.validated()? {
            c @ Coordinate::PolarRadians { .. } => Ok(c),
            Coordinate::PolarDegrees { r, deg } => Coordinate::polar_radians(r, deg_to_rad(deg)),
            Coordinate::Cartesian { x, y } => Coordinate::polar_radians(x.hypot(y), y.atan2(x)),
        }
    }

    /// Convert to the given representation (identity if already there)
    pub fn convert(&self, kind: CoordinateKind) -> OverlayResult<Coordinate> {
        match kind {
            CoordinateKind::Cartesian => self.to_cartesian(),
            CoordinateKind::PolarDegrees => self.to_polar_degrees(),
            CoordinateKind::PolarRadians => self.to_polar_radians(),
        }
    }

    /// Convert to a representation named by string, e.g. `"polar-angle"`
    pub fn convert_to(&self, kind: &str) -> OverlayResult<Coordinate> {
        self.convert(kind.parse()?)
    }

    /// Cartesian position as a vector
    pub fn to_point(&self) -> OverlayResult<DVec2> {
        let p = match self.validated()? {
            Coordinate::Cartesian { x, y } => DVec2::new(x, y),
            Coordinate::PolarDegrees { r, deg } => DVec2::from_angle(deg_to_rad(deg)) * r,
            Coordinate::PolarRadians { r, rad } => DVec2::from_angle(rad) * r,
        };
        if p.is_finite() {
            Ok(p)
        } else {
            Err(OverlayError::validation(format!(
                "coordinate {self:?} does not map to a finite point"
            )))
        }
    }

    /// Radius from the origin, whatever the representation
    pub fn radius(&self) -> OverlayResult<f64> {
        match self.validated()? {
            Coordinate::Cartesian { x, y } => Ok(x.hypot(y)),
            Coordinate::PolarDegrees { r, .. } | Coordinate::PolarRadians { r, .. } => Ok(r),
        }
    }
}

fn ensure_radius(r: f64) -> OverlayResult<f64> {
    let r = ensure_finite("r", r)?;
    if r < 0.0 {
        return Err(OverlayError::validation(format!(
            "radius must be non-negative, got {r}"
        )));
    }
    Ok(r)
}

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Wrap into `[0, 360)`
pub fn normalize_angle_deg(degrees: f64) -> OverlayResult<f64> {
    wrap_positive(ensure_finite("degrees", degrees)?, 360.0)
}

/// Wrap into `[0, 2π)`
pub fn normalize_angle_rad(radians: f64) -> OverlayResult<f64> {
    wrap_positive(ensure_finite("radians", radians)?, TAU)
}

/// Wrap into `[-180, 180]`
pub fn normalize_angle_signed_deg(degrees: f64) -> OverlayResult<f64> {
    Ok(wrap_signed(ensure_finite("degrees", degrees)?, 360.0))
}

/// Wrap into `[-π, π]`
pub fn normalize_angle_signed_rad(radians: f64) -> OverlayResult<f64> {
    Ok(wrap_signed(ensure_finite("radians", radians)?, TAU))
}

fn wrap_positive(value: f64, period: f64) -> OverlayResult<f64> {
    let wrapped = value.rem_euclid(period);
    // rem_euclid rounds tiny negatives up to exactly `period`
    Ok(if wrapped >= period { 0.0 } else { wrapped })
}

fn wrap_signed(value: f64, period: f64) -> f64 {
    let half = period / 2.0;
    let mut wrapped = value % period;
    if wrapped > half {
        wrapped -= period;
    }
    if wrapped < -half {
        wrapped += period;
    }
    wrapped
}
