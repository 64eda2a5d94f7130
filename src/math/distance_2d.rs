use super::arc_2d::{angle_to_arc_param, arc_point_at};
use super::{angle_of, Point2, TOLERANCE};

/// Returns the minimum distance from `p` to the line segment `a`–`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < TOLERANCE * TOLERANCE {
        // Degenerate segment (zero length).
        return (p - a).norm();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (p - (a + d * t)).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// If the point's angle (relative to center) falls within the arc range,
/// the distance is `||p - center| - radius|`. Otherwise it is the distance to
/// the nearer arc endpoint.
#[must_use]
pub fn point_to_arc_dist(p: &Point2, center: &Point2, radius: f64, start_angle: f64, sweep: f64) -> f64 {
    let v = p - center;
    let dist_to_center = v.norm();

    if dist_to_center > TOLERANCE && angle_to_arc_param(angle_of(&v), start_angle, sweep, 0.0).is_some() {
        return (dist_to_center - radius).abs();
    }

    let e0 = arc_point_at(center, radius, start_angle);
    let e1 = arc_point_at(center, radius, start_angle + sweep);
    (p - e0).norm().min((p - e1).norm())
}
