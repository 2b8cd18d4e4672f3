//! Distance, bearing and rigid transforms over coordinates
//!
//! Every function accepts any representation, validates it, and returns Cartesian results
//! unless the operation is representation-preserving (`scale_coordinates`,
//! `extend_coordinates`).

use glam::{DMat2, DVec2};

use super::coordinate::Coordinate;
use crate::error::{OverlayError, OverlayResult, ensure_finite};

/// Euclidean distance between two points
pub fn distance(a: &Coordinate, b: &Coordinate) -> OverlayResult<f64> {
    Ok(a.to_point()?.distance(b.to_point()?))
}

/// Bearing from `from` to `to` in radians, `atan2` convention
pub fn angle_between(from: &Coordinate, to: &Coordinate) -> OverlayResult<f64> {
    let d = to.to_point()? - from.to_point()?;
    Ok(d.y.atan2(d.x))
}

/// Translate `point` by `distance` along the ray at `angle` radians
pub fn move_point(point: &Coordinate, distance: f64, angle: f64) -> OverlayResult<Coordinate> {
    let distance = ensure_finite("distance", distance)?;
    let angle = ensure_finite("angle", angle)?;
    Coordinate::from_point(point.to_point()? + DVec2::from_angle(angle) * distance)
}

/// Rotate `point` about `center` by `angle` radians (counter-clockwise in a y-up frame)
pub fn rotate_point(
    point: &Coordinate,
    center: &Coordinate,
    angle: f64,
) -> OverlayResult<Coordinate> {
    let angle = ensure_finite("angle", angle)?;
    let p = point.to_point()?;
    let c = center.to_point()?;
    let rotated = DMat2::from_angle(angle) * (p - c);
    Coordinate::from_point(c + rotated)
}

/// Scale away from the origin.
///
/// Cartesian points scale both axes; polar coordinates scale only the radius, so the angle is
/// preserved exactly. A negative factor on a polar coordinate would produce a negative radius
/// and is rejected.
pub fn scale_coordinates(coord: &Coordinate, factor: f64) -> OverlayResult<Coordinate> {
    let factor = ensure_finite("factor", factor)?;
    match coord.validated()? {
        Coordinate::Cartesian { x, y } => Coordinate::cartesian(x * factor, y * factor),
        Coordinate::PolarDegrees { r, deg } => {
            ensure_polar_factor(factor)?;
            Coordinate::polar_degrees(r * factor, deg)
        }
        Coordinate::PolarRadians { r, rad } => {
            ensure_polar_factor(factor)?;
            Coordinate::polar_radians(r * factor, rad)
        }
    }
}

fn ensure_polar_factor(factor: f64) -> OverlayResult<()> {
    if factor < 0.0 {
        return Err(OverlayError::validation(format!(
            "cannot scale a polar radius by negative factor {factor}"
        )));
    }
    Ok(())
}

/// Lengthen (or shorten) the distance from the origin by `delta`, keeping direction.
///
/// A resulting radius at or below zero collapses to the origin. Extending the Cartesian
/// origin by a nonzero amount has no direction and fails.
pub fn extend_coordinates(coord: &Coordinate, delta: f64) -> OverlayResult<Coordinate> {
    let delta = ensure_finite("delta", delta)?;
    match coord.validated()? {
        Coordinate::Cartesian { x, y } => {
            let r = x.hypot(y);
            if r == 0.0 {
                if delta == 0.0 {
                    return Ok(Coordinate::ORIGIN);
                }
                return Err(OverlayError::ambiguous(format!(
                    "cannot extend the origin by {delta}: direction is undefined"
                )));
            }
            let extended = r + delta;
            if extended <= 0.0 {
                return Ok(Coordinate::ORIGIN);
            }
            let k = extended / r;
            Coordinate::cartesian(x * k, y * k)
        }
        Coordinate::PolarDegrees { r, deg } => Coordinate::polar_degrees((r + delta).max(0.0), deg),
        Coordinate::PolarRadians { r, rad } => Coordinate::polar_radians((r + delta).max(0.0), rad),
    }
}

/// Express `point` in a frame whose origin sits at `new_origin`
pub fn get_relative_coordinates(
    point: &Coordinate,
    new_origin: &Coordinate,
) -> OverlayResult<Coordinate> {
    Coordinate::from_point(point.to_point()? - new_origin.to_point()?)
}

/// Inverse of [`get_relative_coordinates`]
pub fn get_absolute_coordinates(
    relative: &Coordinate,
    origin: &Coordinate,
) -> OverlayResult<Coordinate> {
    Coordinate::from_point(relative.to_point()? + origin.to_point()?)
}
