//! Circle-circle intersection

use glam::DVec2;

use super::coordinate::Coordinate;
use crate::error::{OverlayResult, ensure_positive};

/// Relative tolerance for tangency / coincidence tests
const TOLERANCE: f64 = 1e-9;

/// Outcome of intersecting two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircleIntersection {
    /// Separated or strictly nested circles
    None,
    /// Internally or externally tangent
    One(Coordinate),
    /// Proper crossing; the first point lies to the left of the center-to-center direction
    Two(Coordinate, Coordinate),
    /// Same center, same radius
    Infinite,
}

impl CircleIntersection {
    /// Finite intersection points (empty for `None` and `Infinite`)
    pub fn points(&self) -> Vec<Coordinate> {
        match *self {
            CircleIntersection::None | CircleIntersection::Infinite => Vec::new(),
            CircleIntersection::One(p) => vec![p],
            CircleIntersection::Two(a, b) => vec![a, b],
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, CircleIntersection::Infinite)
    }
}

/// Intersect circle (`center1`, `r1`) with circle (`center2`, `r2`).
///
/// With `d` the center distance, `a = (r1² − r2² + d²) / 2d` is the distance from `center1` to
/// the chord midpoint and `h = √(r1² − a²)` the half chord length.
pub fn find_circle_intersections(
    center1: &Coordinate,
    r1: f64,
    center2: &Coordinate,
    r2: f64,
) -> OverlayResult<CircleIntersection> {
    let r1 = ensure_positive("r1", r1)?;
    let r2 = ensure_positive("r2", r2)?;
    let c1 = center1.to_point()?;
    let c2 = center2.to_point()?;

    let delta = c2 - c1;
    let d = delta.length();
    let eps = TOLERANCE * r1.max(r2).max(d).max(1.0);

    if d <= eps {
        return Ok(if (r1 - r2).abs() <= eps {
            CircleIntersection::Infinite
        } else {
            CircleIntersection::None
        });
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if d > sum + eps || d < diff - eps {
        return Ok(CircleIntersection::None);
    }

    let dir = delta / d;
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let mid = c1 + dir * a;

    if (d - sum).abs() <= eps || (d - diff).abs() <= eps {
        return Ok(CircleIntersection::One(Coordinate::from_point(mid)?));
    }

    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let offset = DVec2::new(-dir.y, dir.x) * h;
    Ok(CircleIntersection::Two(
        Coordinate::from_point(mid + offset)?,
        Coordinate::from_point(mid - offset)?,
    ))
}
