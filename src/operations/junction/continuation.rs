use tracing::warn;

use crate::geometry::{Curve, Line};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::{left_normal, Point2, Vector2, ON_CURVE_TOLERANCE};
use crate::network::{Continuation, PavementKind};

use super::arc::JunctionArc;

/// Pavement profile of one road at a junction corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PavementSide {
    pub width: f64,
    pub kind: PavementKind,
}

/// Pavement curves joining two roads around a junction arc.
#[derive(Debug, Clone)]
pub struct ContinuationCurves {
    pub curves: Vec<Curve>,
    /// Where the primary pavement edge must be cut.
    pub primary_break: Point2,
    /// Where the secondary pavement edge must be cut.
    pub secondary_break: Point2,
}

/// Joins the pavement edges of both roads across a junction arc.
///
/// Each pavement edge meets the arc's radial line through its tangent point
/// at `radius - pavement width` from the arc center. With
/// [`Continuation::Fillet`] a concentric arc at the larger pavement width
/// links them and a radial line closes the gap to the narrower side; with
/// [`Continuation::Straight`] both edges are carried on square to a corner.
pub struct PavementContinuation<'a> {
    arc: &'a JunctionArc,
    primary: PavementSide,
    secondary: PavementSide,
    policy: Continuation,
}

impl<'a> PavementContinuation<'a> {
    #[must_use]
    pub fn new(arc: &'a JunctionArc, primary: PavementSide, secondary: PavementSide, policy: Continuation) -> Self {
        Self {
            arc,
            primary,
            secondary,
            policy,
        }
    }

    #[must_use]
    pub fn execute(&self) -> ContinuationCurves {
        let center = self.arc.center();
        let radius = self.arc.radius();
        let u_p = unit(&(self.arc.primary_tangent - center));
        let u_s = unit(&(self.arc.secondary_tangent - center));
        let primary_break = center + u_p * (radius - self.primary.width);
        let secondary_break = center + u_s * (radius - self.secondary.width);

        let curves = match self.policy {
            Continuation::Fillet => self.fillet(&center, radius, &u_p, &u_s),
            Continuation::Straight => self.straight(&u_p, &u_s, &primary_break, &secondary_break),
        };
        ContinuationCurves {
            curves,
            primary_break,
            secondary_break,
        }
    }

    fn fillet(&self, center: &Point2, radius: f64, u_p: &Vector2, u_s: &Vector2) -> Vec<Curve> {
        let (wp, ws) = (self.primary.width, self.secondary.width);
        let large = wp.max(ws);
        let Ok(pavement_arc) = self.arc.arc.with_radius(radius - large) else {
            warn!(radius, pavement = large, "pavement fillet collapses");
            return Vec::new();
        };
        let pavement_arc = Curve::Arc(pavement_arc);
        if (wp - ws).abs() < ON_CURVE_TOLERANCE {
            return vec![pavement_arc];
        }

        let primary_is_small = wp < ws;
        let (small_width, u_small) = if primary_is_small { (wp, u_p) } else { (ws, u_s) };
        let small_point = center + u_small * (radius - small_width);
        // The arc starts at the secondary tangent point when reversed.
        let small_at_start = primary_is_small != self.arc.plan.reverse_arc;

        if self.primary.kind == self.secondary.kind {
            let fraction = (large - small_width) / large;
            let length = pavement_arc.length();
            let kept = if small_at_start {
                pavement_arc.sub_curve(fraction * length, length)
            } else {
                pavement_arc.sub_curve(0.0, (1.0 - fraction) * length)
            };
            let landing = match &kept {
                Some(c) if small_at_start => c.start_point(),
                Some(c) => c.end_point(),
                None if small_at_start => pavement_arc.end_point(),
                None => pavement_arc.start_point(),
            };
            kept.into_iter().chain(line(small_point, landing)).collect()
        } else {
            let landing = if small_at_start {
                pavement_arc.start_point()
            } else {
                pavement_arc.end_point()
            };
            std::iter::once(pavement_arc).chain(line(small_point, landing)).collect()
        }
    }

    fn straight(&self, u_p: &Vector2, u_s: &Vector2, q_p: &Point2, q_s: &Point2) -> Vec<Curve> {
        let towards_s = self.arc.secondary_tangent - self.arc.primary_tangent;
        let d_p = towards(&left_normal(u_p), &towards_s);
        let d_s = towards(&left_normal(u_s), &(-towards_s));

        if let Some((t, u)) = line_line_intersect_2d(q_p, &d_p, q_s, &d_s) {
            if t > ON_CURVE_TOLERANCE && u > ON_CURVE_TOLERANCE {
                let corner = q_p + d_p * t;
                return line(*q_p, corner).into_iter().chain(line(*q_s, corner)).collect();
            }
        }
        if self.primary.width >= self.secondary.width {
            line(*q_p, *q_s).into_iter().collect()
        } else {
            line(*q_s, *q_p).into_iter().collect()
        }
    }
}

fn unit(v: &Vector2) -> Vector2 {
    let len = v.norm();
    if len > 0.0 {
        v / len
    } else {
        *v
    }
}

/// `v` or its opposite, whichever points along `hint`.
fn towards(v: &Vector2, hint: &Vector2) -> Vector2 {
    if v.dot(hint) < 0.0 {
        -v
    } else {
        *v
    }
}

fn line(a: Point2, b: Point2) -> Option<Curve> {
    Line::new(a, b).ok().map(Curve::Line)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Side};
    use crate::math::arc_2d::minor_sweep;
    use crate::math::angle_of;
    use crate::network::CentreLineId;
    use crate::operations::junction::{ArcPass, ArcPlan};
    use approx::assert_abs_diff_eq;
    use slotmap::SlotMap;

    /// Corner of a northbound primary (x = 0) and an eastbound secondary
    /// (y = 0) at default widths: arc center (8.4, -8.4), radius 6.
    fn corner() -> JunctionArc {
        let mut ids: SlotMap<CentreLineId, ()> = SlotMap::with_key();
        let center = Point2::new(8.4, -8.4);
        let tp = Point2::new(2.4, -8.4);
        let ts = Point2::new(8.4, -2.4);
        let (a, b) = (angle_of(&(tp - center)), angle_of(&(ts - center)));
        JunctionArc {
            pass: ArcPass::Before,
            plan: ArcPlan {
                reverse_arc: false,
                primary_side: Side::Right,
                secondary_side: Side::Right,
            },
            arc: Arc::new(center, 6.0, a, minor_sweep(a, b)).unwrap(),
            primary_centre_line: ids.insert(()),
            secondary_centre_line: ids.insert(()),
            primary_tangent: tp,
            secondary_tangent: ts,
            primary_origin_skipped: false,
        }
    }

    fn side(width: f64, kind: PavementKind) -> PavementSide {
        PavementSide { width, kind }
    }

    #[test]
    fn equal_fillet_is_single_arc() {
        let arc = corner();
        let out = PavementContinuation::new(
            &arc,
            side(2.0, PavementKind::Footway),
            side(2.0, PavementKind::Footway),
            Continuation::Fillet,
        )
        .execute();
        assert_eq!(out.curves.len(), 1);
        let Curve::Arc(a) = &out.curves[0] else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(a.radius(), 4.0, epsilon = 1e-12);
        assert!((out.primary_break - Point2::new(4.4, -8.4)).norm() < 1e-9);
        assert!((out.secondary_break - Point2::new(8.4, -4.4)).norm() < 1e-9);
        assert!((a.start_point() - out.primary_break).norm() < 1e-9);
        assert!((a.end_point() - out.secondary_break).norm() < 1e-9);
    }

    #[test]
    fn unequal_kinds_close_with_radial_line() {
        let arc = corner();
        let out = PavementContinuation::new(
            &arc,
            side(1.0, PavementKind::ServiceStrip),
            side(2.0, PavementKind::Footway),
            Continuation::Fillet,
        )
        .execute();
        assert_eq!(out.curves.len(), 2);
        // Radial from (3.4, -8.4) to the fillet start at (4.4, -8.4).
        assert!((out.curves[1].start_point() - Point2::new(3.4, -8.4)).norm() < 1e-9);
        assert!((out.curves[1].end_point() - Point2::new(4.4, -8.4)).norm() < 1e-9);
    }

    #[test]
    fn same_kind_tapers_proportionally() {
        let arc = corner();
        let out = PavementContinuation::new(
            &arc,
            side(1.0, PavementKind::Footway),
            side(2.0, PavementKind::Footway),
            Continuation::Fillet,
        )
        .execute();
        assert_eq!(out.curves.len(), 2);
        let full = 4.0 * std::f64::consts::FRAC_PI_2;
        assert_abs_diff_eq!(out.curves[0].length(), full / 2.0, epsilon = 1e-9);
        assert!((out.curves[1].end_point() - out.curves[0].start_point()).norm() < 1e-9);
    }

    #[test]
    fn straight_meets_at_square_corner() {
        let arc = corner();
        let out = PavementContinuation::new(
            &arc,
            side(2.0, PavementKind::Footway),
            side(2.0, PavementKind::Footway),
            Continuation::Straight,
        )
        .execute();
        assert_eq!(out.curves.len(), 2);
        assert!((out.curves[0].end_point() - Point2::new(4.4, -4.4)).norm() < 1e-9);
        assert!((out.curves[1].end_point() - Point2::new(4.4, -4.4)).norm() < 1e-9);
    }
}
