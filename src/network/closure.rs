use crate::error::Result;
use crate::geometry::{Curve, Line};
use crate::math::{left_normal, Point2, Vector2};
use crate::surface::{CurveId, DrawingSurface};

use super::road::{ChainEnd, SideWidths};

/// Cap across a free road end.
///
/// An end line spans the carriageway; a pad line on each side continues it
/// across the pavement.
#[derive(Debug, Clone)]
pub struct RoadClosure {
    end: ChainEnd,
    point: Point2,
    curves: Vec<Curve>,
    generated: Vec<CurveId>,
}

impl RoadClosure {
    /// Builds the cap geometry at `point`.
    ///
    /// `travel` is the road's unit tangent at that end, in its direction of
    /// travel, so its left normal points to the road's left side.
    #[must_use]
    pub fn new(end: ChainEnd, point: Point2, travel: &Vector2, left: SideWidths, right: SideWidths) -> Self {
        let n = left_normal(travel);
        let left_edge = point + n * left.carriageway;
        let right_edge = point - n * right.carriageway;
        let left_outer = point + n * (left.carriageway + left.pavement);
        let right_outer = point - n * (right.carriageway + right.pavement);

        let curves = [
            (left_edge, right_edge),
            (left_edge, left_outer),
            (right_edge, right_outer),
        ]
        .into_iter()
        .filter_map(|(a, b)| Line::new(a, b).ok().map(Curve::Line))
        .collect();

        Self {
            end,
            point,
            curves,
            generated: Vec::new(),
        }
    }

    #[must_use]
    pub fn end(&self) -> ChainEnd {
        self.end
    }

    #[must_use]
    pub fn point(&self) -> Point2 {
        self.point
    }

    /// End line first, then the left and right pads that have a width.
    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    #[must_use]
    pub fn generated(&self) -> &[CurveId] {
        &self.generated
    }

    pub fn generate<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        for curve in &self.curves {
            self.generated.push(surface.create_curve(curve.clone()));
        }
    }

    /// Erases the cap from the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated curve is no longer on the surface.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        surface.erase_all(&mut self.generated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::network::PavementKind;
    use crate::surface::CurveStore;
    use approx::assert_abs_diff_eq;

    fn widths(carriageway: f64, pavement: f64) -> SideWidths {
        SideWidths {
            carriageway,
            pavement,
            pavement_kind: PavementKind::Footway,
        }
    }

    #[test]
    fn cap_spans_carriageway_and_pavements() {
        let closure = RoadClosure::new(
            ChainEnd::End,
            Point2::new(10.0, 0.0),
            &Vector2::new(1.0, 0.0),
            widths(2.4, 2.0),
            widths(3.0, 1.0),
        );
        let curves = closure.curves();
        assert_eq!(curves.len(), 3);
        assert_abs_diff_eq!(curves[0].start_point().y, 2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(curves[0].end_point().y, -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curves[1].end_point().y, 4.4, epsilon = 1e-12);
        assert_abs_diff_eq!(curves[2].end_point().y, -4.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_pavement_has_no_pad() {
        let closure = RoadClosure::new(
            ChainEnd::Start,
            Point2::origin(),
            &Vector2::new(0.0, 1.0),
            widths(2.4, 0.0),
            widths(2.4, 2.0),
        );
        assert_eq!(closure.curves().len(), 2);
    }

    #[test]
    fn generate_and_clear() {
        let mut store = CurveStore::new();
        let mut closure = RoadClosure::new(
            ChainEnd::End,
            Point2::origin(),
            &Vector2::new(1.0, 0.0),
            widths(2.4, 2.0),
            widths(2.4, 2.0),
        );
        closure.generate(&mut store);
        assert_eq!(store.len(), 3);
        closure.clear(&mut store).unwrap();
        assert!(store.is_empty());
        assert!(closure.generated().is_empty());
    }
}
