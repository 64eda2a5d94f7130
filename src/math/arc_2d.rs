//! 2D arc angle utilities.
//!
//! Arcs are described by a start angle and a signed sweep:
//! - `sweep > 0`: counter-clockwise
//! - `sweep < 0`: clockwise
use std::f64::consts::TAU;

use super::{direction, normalize_angle, Point2, Vector2, TOLERANCE};

/// Sweep of the minor arc from `start_angle` to `end_angle`, in `[-π, π]`.
#[must_use]
pub fn minor_sweep(start_angle: f64, end_angle: f64) -> f64 {
    super::angle_difference(start_angle, end_angle)
}

/// Evaluates a point on an arc at absolute angle `angle`.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, angle: f64) -> Point2 {
    center + direction(angle) * radius
}

/// Unit tangent of an arc at absolute angle `angle`, pointing in the sweep
/// direction.
#[must_use]
pub fn arc_tangent_at(angle: f64, sweep: f64) -> Vector2 {
    let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };
    // Tangent to circle at angle θ is (-sin θ, cos θ) for CCW; negate for CW.
    Vector2::new(-sign * angle.sin(), sign * angle.cos())
}

/// Angular offset of `angle` from `start_angle`, measured in the sweep
/// direction.
///
/// The result is in `[0, |sweep|]` when the angle lies on the arc. Outside the
/// arc it is folded to whichever end is angularly closer, so it may be
/// negative (before the start) or exceed `|sweep|` (past the end).
#[must_use]
pub fn angular_offset(angle: f64, start_angle: f64, sweep: f64) -> f64 {
    let raw = if sweep >= 0.0 {
        normalize_angle(angle - start_angle)
    } else {
        normalize_angle(start_angle - angle)
    };
    let span = sweep.abs();
    if raw <= span + TOLERANCE {
        return raw;
    }
    // Outside: fold towards the nearer end.
    let past_end = raw - span;
    let before_start = TAU - raw;
    if before_start < past_end {
        -before_start
    } else {
        raw
    }
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range, allowing
/// `angular_tolerance` radians of slack at either end.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64, angular_tolerance: f64) -> Option<f64> {
    if sweep.abs() < TOLERANCE {
        return None;
    }
    let offset = angular_offset(angle, start_angle, sweep);
    let span = sweep.abs();
    if offset >= -angular_tolerance && offset <= span + angular_tolerance {
        Some((offset / span).clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn minor_sweep_picks_short_way() {
        assert_abs_diff_eq!(minor_sweep(0.1, TAU - 0.1), -0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(minor_sweep(PI, 1.5 * PI), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn tangent_follows_sweep() {
        // At angle 0 on a CCW arc the tangent points +Y; on a CW arc, -Y.
        let t = arc_tangent_at(0.0, 1.0);
        assert_abs_diff_eq!(t.y, 1.0, epsilon = 1e-12);
        let t = arc_tangent_at(0.0, -1.0);
        assert_abs_diff_eq!(t.y, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn offset_folds_to_nearest_end() {
        // Quarter arc 0..π/2 CCW.
        assert_abs_diff_eq!(angular_offset(FRAC_PI_2 / 2.0, 0.0, FRAC_PI_2), FRAC_PI_2 / 2.0, epsilon = 1e-12);
        // Slightly before the start.
        assert_abs_diff_eq!(angular_offset(-0.1, 0.0, FRAC_PI_2), -0.1, epsilon = 1e-12);
        // Slightly past the end.
        assert_abs_diff_eq!(angular_offset(FRAC_PI_2 + 0.1, 0.0, FRAC_PI_2), FRAC_PI_2 + 0.1, epsilon = 1e-12);
    }

    #[test]
    fn clockwise_offset() {
        // CW arc from π/2 down to 0.
        let off = angular_offset(FRAC_PI_2 / 2.0, FRAC_PI_2, -FRAC_PI_2);
        assert_abs_diff_eq!(off, FRAC_PI_2 / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn param_out_of_range() {
        assert!(angle_to_arc_param(PI, 0.0, FRAC_PI_2, 1e-9).is_none());
        let t = angle_to_arc_param(FRAC_PI_2, 0.0, FRAC_PI_2, 1e-9).unwrap_or(-1.0);
        assert_abs_diff_eq!(t, 1.0, epsilon = 1e-12);
    }
}
