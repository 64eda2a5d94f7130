use crate::error::{GeometryError, Result};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::surface::{CurveId, DrawingSurface};

use super::curve::{Arc, Curve, Line};

/// Kind of geometry a [`Segment`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Line,
    Arc,
}

/// An immutable centre-line primitive: a straight line or a circular arc.
///
/// Segments read from a drawing surface remember the id of the curve they
/// were derived from; generated segments carry no source.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    curve: Curve,
    source: Option<CurveId>,
}

impl Segment {
    /// Wraps a line or arc curve.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NotASegment`] for full circles.
    pub fn new(curve: Curve) -> Result<Self> {
        match curve {
            Curve::Line(_) | Curve::Arc(_) => Ok(Self { curve, source: None }),
            Curve::Circle(_) => Err(GeometryError::NotASegment.into()),
        }
    }

    /// Creates a straight segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints coincide.
    pub fn line(start: Point2, end: Point2) -> Result<Self> {
        Self::new(Curve::Line(Line::new(start, end)?))
    }

    /// Creates an arc segment from center, radius, start angle and signed sweep.
    ///
    /// # Errors
    ///
    /// Returns an error if the arc is degenerate.
    pub fn arc(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        Self::new(Curve::Arc(Arc::new(center, radius, start_angle, sweep)?))
    }

    /// Reads a persisted curve from the drawing surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve does not exist or is not a line or arc.
    pub fn from_surface<S: DrawingSurface + ?Sized>(surface: &S, id: CurveId) -> Result<Self> {
        let mut segment = Self::new(surface.curve(id)?.clone())?;
        segment.source = Some(id);
        Ok(segment)
    }

    #[must_use]
    pub fn geometry_type(&self) -> GeometryType {
        match self.curve {
            Curve::Arc(_) => GeometryType::Arc,
            _ => GeometryType::Line,
        }
    }

    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Surface curve this segment was read from, if any.
    #[must_use]
    pub fn source(&self) -> Option<CurveId> {
        self.source
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        self.curve.start_point()
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        self.curve.end_point()
    }

    /// Unit tangent at the start, in the direction of travel.
    #[must_use]
    pub fn start_tangent(&self) -> Vector2 {
        self.curve.tangent_at(0.0)
    }

    /// Unit tangent at the end, in the direction of travel.
    #[must_use]
    pub fn end_tangent(&self) -> Vector2 {
        self.curve.tangent_at(self.curve.length())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.curve.length()
    }

    #[must_use]
    pub fn center(&self) -> Option<Point2> {
        match &self.curve {
            Curve::Arc(a) => Some(*a.center()),
            _ => None,
        }
    }

    #[must_use]
    pub fn radius(&self) -> Option<f64> {
        match &self.curve {
            Curve::Arc(a) => Some(a.radius()),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_clockwise(&self) -> Option<bool> {
        match &self.curve {
            Curve::Arc(a) => Some(a.is_clockwise()),
            _ => None,
        }
    }

    /// Returns the segment traversed in the opposite direction. The source
    /// reference is kept.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            curve: self.curve.reversed(),
            source: self.source,
        }
    }

    /// Direction used by the chaining rule at point `at`: a line's direction,
    /// or an arc's unit radial vector from its center towards `at`.
    #[must_use]
    pub fn reference_direction(&self, at: &Point2) -> Vector2 {
        match &self.curve {
            Curve::Arc(a) => {
                let radial = at - a.center();
                let len = radial.norm();
                if len < TOLERANCE {
                    radial
                } else {
                    radial / len
                }
            }
            _ => self.start_tangent(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::surface::CurveStore;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn line_segment_tangents() {
        let seg = Segment::line(Point2::origin(), Point2::new(0.0, 5.0)).unwrap();
        assert_eq!(seg.geometry_type(), GeometryType::Line);
        assert_abs_diff_eq!(seg.start_tangent().y, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(seg.end_tangent().y, 1.0, epsilon = 1e-12);
        assert!(seg.center().is_none());
    }

    #[test]
    fn arc_segment_properties() {
        let seg = Segment::arc(Point2::origin(), 3.0, 0.0, -FRAC_PI_2).unwrap();
        assert_eq!(seg.geometry_type(), GeometryType::Arc);
        assert_eq!(seg.is_clockwise(), Some(true));
        assert_abs_diff_eq!(seg.radius().unwrap(), 3.0);
        assert_abs_diff_eq!(seg.end_point().y, -3.0, epsilon = 1e-12);
        // Radial reference at the start point is +X.
        let r = seg.reference_direction(&seg.start_point());
        assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn circle_is_not_a_segment() {
        let circle = crate::geometry::Circle::new(Point2::origin(), 1.0).unwrap();
        assert!(Segment::new(Curve::Circle(circle)).is_err());
    }

    #[test]
    fn reads_source_from_surface() {
        let mut store = CurveStore::new();
        let line = Line::new(Point2::origin(), Point2::new(1.0, 0.0)).unwrap();
        let id = store.create_curve(Curve::Line(line));
        let seg = Segment::from_surface(&store, id).unwrap();
        assert_eq!(seg.source(), Some(id));
        assert_eq!(seg.reversed().source(), Some(id));
    }
}
