use super::{cross, Point2, Vector2, ON_CURVE_TOLERANCE, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let delta = p2 - p1;
    let t = cross(&delta, d2) / denom;
    let u = cross(&delta, d1) / denom;
    Some((t, u))
}

/// Intersection of an infinite line with a full circle.
///
/// The line is `origin + t * dir`. A line that misses the circle by less than
/// [`ON_CURVE_TOLERANCE`] is treated as tangent and yields the foot of the
/// perpendicular from the center.
#[must_use]
pub fn line_circle_intersect_2d(
    origin: &Point2,
    dir: &Vector2,
    center: &Point2,
    radius: f64,
) -> Vec<Point2> {
    let len_sq = dir.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE || radius < TOLERANCE {
        return Vec::new();
    }
    let unit = dir / len_sq.sqrt();

    // Foot of the perpendicular from the center onto the line.
    let t_foot = (center - origin).dot(&unit);
    let foot = origin + unit * t_foot;
    let dist = (center - foot).norm();

    if dist > radius + ON_CURVE_TOLERANCE {
        return Vec::new();
    }
    if (dist - radius).abs() <= ON_CURVE_TOLERANCE {
        return vec![foot];
    }
    let half_chord = (radius * radius - dist * dist).max(0.0).sqrt();
    vec![foot - unit * half_chord, foot + unit * half_chord]
}

/// Intersection of two full circles.
///
/// Near-tangent configurations (external or internal) collapse to a single
/// point on the line of centers. Concentric circles yield nothing.
#[must_use]
pub fn circle_circle_intersect_2d(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> Vec<Point2> {
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }

    let delta = c2 - c1;
    let dist_sq = delta.norm_squared();
    let dist = dist_sq.sqrt();

    if dist < TOLERANCE {
        // Concentric circles: no intersection points, or infinitely many at equal radius.
        return Vec::new();
    }

    let sum = r1 + r2;
    let diff = (r1 - r2).abs();
    if dist > sum + ON_CURVE_TOLERANCE || dist < diff - ON_CURVE_TOLERANCE {
        return Vec::new();
    }

    let axis = delta / dist;

    // Tangent: the single contact point lies on the line of centers.
    if (dist - sum).abs() <= ON_CURVE_TOLERANCE {
        return vec![c1 + axis * r1];
    }
    if (dist - diff).abs() <= ON_CURVE_TOLERANCE {
        let sign = if r1 >= r2 { 1.0 } else { -1.0 };
        return vec![c1 + axis * (sign * r1)];
    }

    // Distance from c1 along the line c1→c2 to the radical line.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let mid = c1 + axis * a;
    let perp = Vector2::new(-axis.y, axis.x);

    vec![mid + perp * h, mid - perp * h]
}
