//! Coordinate module
//!
//! Pure geometry over Cartesian and polar coordinates. Nothing here touches rendering:
//! - Every input is validated; malformed values are errors, never NaN
//! - Values are immutable; every transform returns a new coordinate
//! - Angles passed to transforms are radians

pub mod coordinate;
pub mod intersect;
pub mod transform;

pub use coordinate::{
    Coordinate, CoordinateKind, deg_to_rad, normalize_angle_deg, normalize_angle_rad,
    normalize_angle_signed_deg, normalize_angle_signed_rad, rad_to_deg,
};
pub use intersect::{CircleIntersection, find_circle_intersections};
pub use transform::{
    angle_between, distance, extend_coordinates, get_absolute_coordinates,
    get_relative_coordinates, move_point, rotate_point, scale_coordinates,
};
