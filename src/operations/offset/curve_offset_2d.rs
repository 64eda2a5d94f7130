use crate::geometry::{Circle, Curve, Line, Side};
use crate::math::TOLERANCE;

/// Offsets a planar curve sideways by a given distance.
///
/// # Sign Convention
///
/// `side` is taken relative to the curve's direction of travel. For a
/// counter-clockwise arc the left side faces the center, so a left offset
/// shrinks the radius; for a clockwise arc it grows it. Circles behave like
/// counter-clockwise arcs. A negative `distance` offsets to the opposite side.
pub struct CurveOffset2D<'a> {
    curve: &'a Curve,
    side: Side,
    distance: f64,
}

impl<'a> CurveOffset2D<'a> {
    /// Creates a new `CurveOffset2D` operation.
    #[must_use]
    pub fn new(curve: &'a Curve, side: Side, distance: f64) -> Self {
        Self {
            curve,
            side,
            distance,
        }
    }

    /// Executes the offset.
    ///
    /// Returns `None` when the offset collapses: an arc or circle offset
    /// through or beyond its center.
    #[must_use]
    pub fn execute(&self) -> Option<Curve> {
        let signed = self.side.sign() * self.distance;
        if signed.abs() < TOLERANCE {
            return Some(self.curve.clone());
        }

        match self.curve {
            Curve::Line(l) => {
                let shift = l.left_normal() * signed;
                Line::new(l.start() + shift, l.end() + shift).ok().map(Curve::Line)
            }
            Curve::Arc(a) => {
                // Positive signed distance moves towards the center of a CCW arc.
                let towards_center = if a.is_clockwise() { -signed } else { signed };
                let radius = a.radius() - towards_center;
                if radius <= TOLERANCE {
                    return None;
                }
                a.with_radius(radius).ok().map(Curve::Arc)
            }
            Curve::Circle(c) => {
                let radius = c.radius() - signed;
                if radius <= TOLERANCE {
                    return None;
                }
                Circle::new(*c.center(), radius).ok().map(Curve::Circle)
            }
        }
    }
}
