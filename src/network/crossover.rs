use crate::error::{FeatureError, Result};
use crate::geometry::{Circle, Curve, Line};
use crate::math::{Point2, ON_CURVE_TOLERANCE};
use crate::surface::{CurveId, DrawingSurface, IntersectMode};

/// Vehicle crossing from a footway point down to the road edge.
///
/// The footway point is dropped perpendicular onto the nearest road edge; a
/// construction circle of the splay radius around that foot picks the
/// furthest landing point either side, and two connector lines join them
/// to the footway point.
#[derive(Debug, Clone)]
pub struct CrossOver {
    footway_point: Point2,
    splay_radius: f64,
    curves: Vec<Curve>,
    generated: Vec<CurveId>,
}

impl CrossOver {
    #[must_use]
    pub fn new(footway_point: Point2, splay_radius: f64) -> Self {
        Self {
            footway_point,
            splay_radius,
            curves: Vec::new(),
            generated: Vec::new(),
        }
    }

    #[must_use]
    pub fn footway_point(&self) -> Point2 {
        self.footway_point
    }

    #[must_use]
    pub fn splay_radius(&self) -> f64 {
        self.splay_radius
    }

    /// Connector lines from the last successful generation.
    #[must_use]
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    #[must_use]
    pub fn generated(&self) -> &[CurveId] {
        &self.generated
    }

    /// Lays the crossover against `edges`, the road's generated offsets and
    /// closure curves.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureError::NoLandingPoint`] if the footway point has no
    /// perpendicular foot on any edge.
    pub fn generate<S: DrawingSurface + ?Sized>(
        &mut self,
        edges: &[Curve],
        surface: &mut S,
    ) -> std::result::Result<(), FeatureError> {
        let (foot, tangent) = self.landing(edges).ok_or(FeatureError::NoLandingPoint)?;
        let circle = Circle::new(foot, self.splay_radius)
            .map(Curve::Circle)
            .map_err(|_| FeatureError::NoLandingPoint)?;

        let mut ahead: Option<Point2> = None;
        let mut behind: Option<Point2> = None;
        for edge in edges {
            for p in surface.intersect(&circle, edge, IntersectMode::OnBoth) {
                let slot = if (p - foot).dot(&tangent) >= 0.0 {
                    &mut ahead
                } else {
                    &mut behind
                };
                let further = slot
                    .is_none_or(|q| (p - self.footway_point).norm() > (q - self.footway_point).norm());
                if further {
                    *slot = Some(p);
                }
            }
        }

        self.curves = [ahead.unwrap_or(foot), behind.unwrap_or(foot)]
            .into_iter()
            .filter_map(|end| Line::new(self.footway_point, end).ok().map(Curve::Line))
            .collect();
        for curve in &self.curves {
            self.generated.push(surface.create_curve(curve.clone()));
        }
        Ok(())
    }

    /// Nearest perpendicular foot on any edge, with the edge tangent there.
    fn landing(&self, edges: &[Curve]) -> Option<(Point2, crate::math::Vector2)> {
        edges
            .iter()
            .filter_map(|edge| {
                let s = edge.project(&self.footway_point);
                let len = edge.length();
                if !edge.is_closed() && (s < -ON_CURVE_TOLERANCE || s > len + ON_CURVE_TOLERANCE) {
                    return None;
                }
                let s = s.clamp(0.0, len);
                let foot = edge.point_at(s);
                Some(((foot - self.footway_point).norm(), foot, edge.tangent_at(s)))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, foot, tangent)| (foot, tangent))
    }

    /// Erases the connector lines from the surface.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated curve is no longer on the surface.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        self.curves.clear();
        surface.erase_all(&mut self.generated)
    }
}
