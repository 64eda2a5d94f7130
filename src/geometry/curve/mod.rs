mod arc;
mod circle;
mod line;

pub use arc::Arc;
pub use circle::Circle;
pub use line::Line;

use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::{Point2, Vector2, ON_CURVE_TOLERANCE, TOLERANCE};

/// Side of a curve relative to its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// `+1` for left, `-1` for right: the sign applied to offset distances.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::Left => 1.0,
            Self::Right => -1.0,
        }
    }
}

/// A planar curve as exchanged with the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// A straight segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
    /// A full circle (construction geometry).
    Circle(Circle),
}

impl Curve {
    #[must_use]
    pub fn start_point(&self) -> Point2 {
        match self {
            Self::Line(l) => *l.start(),
            Self::Arc(a) => a.start_point(),
            Self::Circle(c) => c.point_at(0.0),
        }
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        match self {
            Self::Line(l) => *l.end(),
            Self::Arc(a) => a.end_point(),
            Self::Circle(c) => c.point_at(0.0),
        }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        match self {
            Self::Line(l) => l.length(),
            Self::Arc(a) => a.length(),
            Self::Circle(c) => c.length(),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Circle(_))
    }

    /// Point at arc length `s` from the start.
    #[must_use]
    pub fn point_at(&self, s: f64) -> Point2 {
        match self {
            Self::Line(l) => l.point_at(s),
            Self::Arc(a) => a.point_at(s),
            Self::Circle(c) => c.point_at(s),
        }
    }

    /// Unit tangent at arc length `s`, in the direction of travel.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Vector2 {
        match self {
            Self::Line(l) => l.direction(),
            Self::Arc(a) => a.tangent_at(s),
            Self::Circle(c) => c.tangent_at(s),
        }
    }

    /// Arc-length parameter of the projection of `p` onto the curve's
    /// supporting line or circle. Not clamped to the curve's extent.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => l.project(p),
            Self::Arc(a) => a.project(p),
            Self::Circle(c) => c.project(p),
        }
    }

    /// Distance from `p` to the bounded curve.
    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        match self {
            Self::Line(l) => point_to_segment_dist(p, l.start(), l.end()),
            Self::Arc(a) => point_to_arc_dist(p, a.center(), a.radius(), a.start_angle(), a.sweep()),
            Self::Circle(c) => ((p - c.center()).norm() - c.radius()).abs(),
        }
    }

    /// Returns `true` if `p` lies on the bounded curve within `tolerance`.
    #[must_use]
    pub fn contains_point(&self, p: &Point2, tolerance: f64) -> bool {
        self.distance_to(p) <= tolerance
    }

    /// Returns the same curve traversed in the opposite direction.
    ///
    /// Circles have no meaningful reversal and are returned unchanged.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.reversed()),
            Self::Arc(a) => Self::Arc(a.reversed()),
            Self::Circle(_) => self.clone(),
        }
    }

    /// Extracts the part of the curve between arc lengths `s0 < s1`, clamped
    /// to the curve's extent. Circles yield counter-clockwise arcs.
    ///
    /// Returns `None` if the clamped span is shorter than the on-curve
    /// tolerance.
    #[must_use]
    pub fn sub_curve(&self, s0: f64, s1: f64) -> Option<Self> {
        let len = self.length();
        let (s0, s1) = if self.is_closed() {
            (s0, s1)
        } else {
            (s0.clamp(0.0, len), s1.clamp(0.0, len))
        };
        if s1 - s0 < ON_CURVE_TOLERANCE {
            return None;
        }
        match self {
            Self::Line(l) => Line::new(l.point_at(s0), l.point_at(s1)).ok().map(Self::Line),
            Self::Arc(a) => {
                let sweep = a.sweep().signum() * (s1 - s0) / a.radius();
                Arc::new(*a.center(), a.radius(), a.angle_at(s0), sweep)
                    .ok()
                    .map(Self::Arc)
            }
            Self::Circle(c) => {
                Arc::new(*c.center(), c.radius(), s0 / c.radius(), (s1 - s0) / c.radius())
                    .ok()
                    .map(Self::Arc)
            }
        }
    }

    /// Center and radius of the supporting circle, for arcs and circles.
    #[must_use]
    pub fn circle_parts(&self) -> Option<(Point2, f64)> {
        match self {
            Self::Line(_) => None,
            Self::Arc(a) => Some((*a.center(), a.radius())),
            Self::Circle(c) => Some((*c.center(), c.radius())),
        }
    }

    /// Returns `true` if both curves coincide within `tolerance`.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        let close = |a: Point2, b: Point2| (a - b).norm() <= tolerance;
        match (self, other) {
            (Self::Line(_), Self::Line(_)) => {
                close(self.start_point(), other.start_point()) && close(self.end_point(), other.end_point())
            }
            (Self::Arc(a), Self::Arc(b)) => {
                close(*a.center(), *b.center())
                    && (a.radius() - b.radius()).abs() <= tolerance
                    && close(a.start_point(), b.start_point())
                    && close(a.end_point(), b.end_point())
                    && (a.sweep() - b.sweep()).abs() <= tolerance.max(TOLERANCE)
            }
            (Self::Circle(a), Self::Circle(b)) => {
                close(*a.center(), *b.center()) && (a.radius() - b.radius()).abs() <= tolerance
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter_arc() -> Curve {
        // CCW from (1,0) to (0,1) around the origin.
        Curve::Arc(Arc::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2).unwrap())
    }

    #[test]
    fn arc_endpoints_and_tangents() {
        let arc = quarter_arc();
        assert_abs_diff_eq!(arc.start_point().x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.end_point().y, 1.0, epsilon = 1e-12);
        let t = arc.tangent_at(0.0);
        assert_abs_diff_eq!(t.y, 1.0, epsilon = 1e-12);
        let t = arc.tangent_at(arc.length());
        assert_abs_diff_eq!(t.x, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn reversed_arc_swaps_ends() {
        let arc = quarter_arc().reversed();
        assert_abs_diff_eq!(arc.start_point().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.end_point().x, 1.0, epsilon = 1e-12);
        // Travelling clockwise from (0,1): tangent points +X.
        assert_abs_diff_eq!(arc.tangent_at(0.0).x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn line_sub_curve() {
        let line = Curve::Line(Line::new(Point2::origin(), Point2::new(10.0, 0.0)).unwrap());
        let part = line.sub_curve(2.0, 6.0).unwrap();
        assert_abs_diff_eq!(part.start_point().x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(part.end_point().x, 6.0, epsilon = 1e-12);
        assert!(line.sub_curve(4.0, 4.0).is_none());
        // Clamped to the extent.
        let part = line.sub_curve(-3.0, 3.0).unwrap();
        assert_abs_diff_eq!(part.length(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn arc_sub_curve_keeps_direction() {
        let arc = quarter_arc().reversed();
        let half = arc.sub_curve(0.0, arc.length() / 2.0).unwrap();
        let mid = half.end_point();
        assert_abs_diff_eq!(mid.x, (PI / 4.0).cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(half.start_point().y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn project_onto_arc() {
        let arc = quarter_arc();
        let s = arc.project(&Point2::new(2.0, 2.0));
        assert_abs_diff_eq!(s, FRAC_PI_2 / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn side_sign() {
        assert_abs_diff_eq!(Side::Left.sign(), 1.0);
        assert_abs_diff_eq!(Side::Right.sign(), -1.0);
    }
}
