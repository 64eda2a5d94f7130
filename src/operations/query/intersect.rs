use crate::geometry::Curve;
use crate::math::intersect_2d::{
    circle_circle_intersect_2d, line_circle_intersect_2d, line_line_intersect_2d,
};
use crate::math::{Point2, ON_CURVE_TOLERANCE};
use crate::surface::IntersectMode;

/// Computes intersection points between two curves.
///
/// Intersections are found on the supporting lines/circles first, then
/// filtered by the bounds of every curve the [`IntersectMode`] does not
/// extend. Collinear lines and concentric arcs yield no points.
pub struct CurveCurveIntersect<'a> {
    a: &'a Curve,
    b: &'a Curve,
    mode: IntersectMode,
}

impl<'a> CurveCurveIntersect<'a> {
    /// Creates a new `CurveCurveIntersect` query.
    #[must_use]
    pub fn new(a: &'a Curve, b: &'a Curve, mode: IntersectMode) -> Self {
        Self { a, b, mode }
    }

    /// Executes the query, returning distinct intersection points.
    #[must_use]
    pub fn execute(&self) -> Vec<Point2> {
        let candidates = supporting_intersections(self.a, self.b);

        let mut result: Vec<Point2> = Vec::with_capacity(candidates.len());
        for p in candidates {
            if !self.mode.extends_first() && !self.a.contains_point(&p, ON_CURVE_TOLERANCE) {
                continue;
            }
            if !self.mode.extends_second() && !self.b.contains_point(&p, ON_CURVE_TOLERANCE) {
                continue;
            }
            if result.iter().any(|q| (q - p).norm() < ON_CURVE_TOLERANCE) {
                continue;
            }
            result.push(p);
        }
        result
    }
}

/// Intersections of the infinite supporting primitives of two curves.
fn supporting_intersections(a: &Curve, b: &Curve) -> Vec<Point2> {
    match (a, b) {
        (Curve::Line(la), Curve::Line(lb)) => {
            let (da, db) = (la.direction(), lb.direction());
            line_line_intersect_2d(la.start(), &da, lb.start(), &db)
                .map(|(t, _)| vec![la.start() + da * t])
                .unwrap_or_default()
        }
        (Curve::Line(l), other) | (other, Curve::Line(l)) => match other.circle_parts() {
            Some((center, radius)) => line_circle_intersect_2d(l.start(), &l.direction(), &center, radius),
            None => Vec::new(),
        },
        _ => match (a.circle_parts(), b.circle_parts()) {
            (Some((c1, r1)), Some((c2, r2))) => circle_circle_intersect_2d(&c1, r1, &c2, r2),
            _ => Vec::new(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Circle, Line};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Curve {
        Curve::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)).unwrap())
    }

    #[test]
    fn crossing_lines() {
        let a = line(0.0, 0.0, 2.0, 2.0);
        let b = line(0.0, 2.0, 2.0, 0.0);
        let hits = CurveCurveIntersect::new(&a, &b, IntersectMode::OnBoth).execute();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hits[0].y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn bounded_lines_miss_but_extended_hit() {
        let a = line(0.0, 0.0, 1.0, 0.0);
        let b = line(5.0, -1.0, 5.0, 1.0);
        assert!(CurveCurveIntersect::new(&a, &b, IntersectMode::OnBoth).execute().is_empty());
        assert!(CurveCurveIntersect::new(&a, &b, IntersectMode::ExtendSecond).execute().is_empty());
        let hits = CurveCurveIntersect::new(&a, &b, IntersectMode::ExtendFirst).execute();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn touching_at_endpoint() {
        // T-shape: the stem ends exactly on the bar.
        let bar = line(-10.0, 0.0, 10.0, 0.0);
        let stem = line(0.0, -10.0, 0.0, 0.0);
        let hits = CurveCurveIntersect::new(&stem, &bar, IntersectMode::OnBoth).execute();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn line_arc_respects_sweep() {
        // Upper semicircle only.
        let arc = Curve::Arc(Arc::new(Point2::origin(), 1.0, 0.0, PI).unwrap());
        let l = line(-2.0, 0.5, 2.0, 0.5);
        let hits = CurveCurveIntersect::new(&l, &arc, IntersectMode::OnBoth).execute();
        assert_eq!(hits.len(), 2);
        let l = line(-2.0, -0.5, 2.0, -0.5);
        assert!(CurveCurveIntersect::new(&l, &arc, IntersectMode::OnBoth).execute().is_empty());
        let hits = CurveCurveIntersect::new(&l, &arc, IntersectMode::ExtendSecond).execute();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn circle_tangent_to_line() {
        let circle = Curve::Circle(Circle::new(Point2::new(0.0, 3.0), 3.0).unwrap());
        let l = line(-5.0, 0.0, 5.0, 0.0);
        let hits = CurveCurveIntersect::new(&circle, &l, IntersectMode::OnBoth).execute();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn arc_arc() {
        let a = Curve::Arc(Arc::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2).unwrap());
        let b = Curve::Arc(Arc::new(Point2::new(1.0, 0.0), 1.0, FRAC_PI_2, FRAC_PI_2).unwrap());
        let hits = CurveCurveIntersect::new(&a, &b, IntersectMode::OnBoth).execute();
        assert_eq!(hits.len(), 1);
        assert_abs_diff_eq!(hits[0].x, 0.5, epsilon = 1e-9);
        assert!(hits[0].y > 0.0);
    }
}
