pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;

use std::f64::consts::{PI, TAU};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Tolerance used when deciding whether a point lies on a curve, or whether
/// two primitives touch tangentially.
pub const ON_CURVE_TOLERANCE: f64 = 1e-6;

/// Normalizes an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU - TOLERANCE {
        0.0
    } else {
        a
    }
}

/// Signed smallest difference `b - a`, in `(-π, π]`.
#[must_use]
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = normalize_angle(b - a);
    if d > PI {
        d - TAU
    } else {
        d
    }
}

/// Returns `true` if two directions agree within `tolerance` radians.
#[must_use]
pub fn angles_match(a: f64, b: f64, tolerance: f64) -> bool {
    angle_difference(a, b).abs() <= tolerance
}

/// Polar angle of a vector.
#[must_use]
pub fn angle_of(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

/// Unit vector for a polar angle.
#[must_use]
pub fn direction(angle: f64) -> Vector2 {
    Vector2::new(angle.cos(), angle.sin())
}

/// Rotates a vector by 90° counter-clockwise (its left normal).
#[must_use]
pub fn left_normal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D cross product (z component).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rounds a coordinate to 3 decimals, the precision used for junction matching.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Returns `true` if both points agree at 3-decimal rounding.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn same_point_rounded(a: &Point2, b: &Point2) -> bool {
    round3(a.x) == round3(b.x) && round3(a.y) == round3(b.y)
}
