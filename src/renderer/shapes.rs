//! Fill paths for 2D primitives
//!
//! Paths are `kurbo` Bézier paths filled with the even-odd rule, so a ring is simply its outer
//! circle plus its inner circle. Bounds are kept analytically next to the path so baked frame
//! sizes never depend on curve approximation error.

use glam::{DAffine2, DVec2};
use kurbo::{BezPath, Shape};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Flattening tolerance in pixels for curve-to-path conversion
pub const PATH_TOLERANCE: f64 = 0.1;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(DVec2::new(x, y), DVec2::new(x + width, y + height))
    }

    /// Smallest box containing every point (None for an empty iterator)
    pub fn from_points(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow by `margin` on every side
    pub fn expand(&self, margin: f64) -> Bounds {
        Bounds {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }

    pub fn corners(&self) -> [DVec2; 4] {
        [
            self.min,
            DVec2::new(self.max.x, self.min.y),
            self.max,
            DVec2::new(self.min.x, self.max.y),
        ]
    }

    /// Bounding box of this box after an affine transform
    pub fn transformed(&self, transform: &DAffine2) -> Bounds {
        let corners = self.corners().map(|c| transform.transform_point2(c));
        let min = corners.iter().fold(corners[0], |acc, c| acc.min(*c));
        let max = corners.iter().fold(corners[0], |acc, c| acc.max(*c));
        Bounds { min, max }
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

#[inline]
fn to_point(p: DVec2) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

/// A filled path (even-odd rule) with its exact bounds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapePath {
    path: BezPath,
    bounds: Option<Bounds>,
}

impl ShapePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bezpath(&self) -> &BezPath {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Axis-aligned rectangle with its top-left corner at (`x`, `y`)
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        let rect = kurbo::Rect::new(x, y, x + width, y + height);
        Self {
            path: rect.to_path(PATH_TOLERANCE),
            bounds: Some(Bounds::from_rect(x, y, width, height)),
        }
    }

    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self {
            path: kurbo::Circle::new(to_point(center), radius).to_path(PATH_TOLERANCE),
            bounds: Some(Bounds::new(center - radius, center + radius)),
        }
    }

    /// Annulus between two radii; the inner disc is cut out by the even-odd rule
    pub fn ring(center: DVec2, inner_radius: f64, outer_radius: f64) -> Self {
        let mut ring = Self::circle(center, outer_radius);
        if inner_radius > 0.0 {
            let inner = kurbo::Circle::new(to_point(center), inner_radius);
            ring.path.extend(inner.path_elements(PATH_TOLERANCE));
        }
        ring
    }

    /// Pie slice with its apex at `center`, swept from `start` to `end` radians
    pub fn pie(center: DVec2, radius: f64, start: f64, end: f64) -> Self {
        let sweep = end - start;
        let arc = kurbo::Arc {
            center: to_point(center),
            radii: kurbo::Vec2::new(radius, radius),
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        let mut path = BezPath::new();
        path.move_to(to_point(center));
        path.line_to(to_point(center + DVec2::from_angle(start) * radius));
        path.extend(arc.append_iter(PATH_TOLERANCE));
        path.close_path();

        let (lo, hi) = (start.min(end), start.max(end));
        let mut extremes = vec![
            center,
            center + DVec2::from_angle(start) * radius,
            center + DVec2::from_angle(end) * radius,
        ];
        // Axis-aligned extremes of the arc that fall inside the sweep
        let mut theta = (lo / FRAC_PI_2).ceil() * FRAC_PI_2;
        while theta <= hi && theta - lo <= TAU {
            extremes.push(center + axis_direction(theta) * radius);
            theta += FRAC_PI_2;
        }
        Self {
            path,
            bounds: Bounds::from_points(extremes),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Even-odd point containment
    pub fn contains(&self, p: DVec2) -> bool {
        self.path.winding(to_point(p)) % 2 != 0
    }
}

/// Exact unit vector for a multiple of 90 degrees
fn axis_direction(theta: f64) -> DVec2 {
    match (theta / FRAC_PI_2).round().rem_euclid(4.0) as u8 {
        0 => DVec2::X,
        1 => DVec2::Y,
        2 => DVec2::NEG_X,
        _ => DVec2::NEG_Y,
    }
}
