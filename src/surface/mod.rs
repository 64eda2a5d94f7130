//! Boundary with the host drawing surface.
//!
//! The engine never stores curves itself: it reads centre lines from, and
//! writes generated offsets, arcs and closures to, a [`DrawingSurface`].
mod store;

pub use store::CurveStore;

use crate::error::{Result, SurfaceError};
use crate::geometry::{Curve, Side};
use crate::math::Point2;
use crate::operations::offset::CurveOffset2D;
use crate::operations::query::CurveCurveIntersect;

slotmap::new_key_type! {
    /// Unique identifier for a curve on a drawing surface.
    pub struct CurveId;
}

/// How bounded curves are treated by an intersection query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectMode {
    /// The point must lie on both curves.
    OnBoth,
    /// The first curve is extended to its supporting line or circle.
    ExtendFirst,
    /// The second curve is extended to its supporting line or circle.
    ExtendSecond,
    /// Both curves are extended.
    ExtendBoth,
}

impl IntersectMode {
    #[must_use]
    pub fn extends_first(self) -> bool {
        matches!(self, Self::ExtendFirst | Self::ExtendBoth)
    }

    #[must_use]
    pub fn extends_second(self) -> bool {
        matches!(self, Self::ExtendSecond | Self::ExtendBoth)
    }
}

/// Abstract store of planar curves.
///
/// `intersect` and `offset` have default implementations built on this
/// crate's geometry; hosts with their own kernels may override them.
pub trait DrawingSurface {
    /// Persists a curve and returns its reference.
    fn create_curve(&mut self, curve: Curve) -> CurveId;

    /// Looks up a persisted curve.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::CurveNotFound`] if `id` is unknown.
    fn curve(&self, id: CurveId) -> std::result::Result<&Curve, SurfaceError>;

    /// Removes a persisted curve.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::CurveNotFound`] if `id` is unknown.
    fn erase_curve(&mut self, id: CurveId) -> std::result::Result<(), SurfaceError>;

    /// Intersection points of two curves.
    fn intersect(&self, a: &Curve, b: &Curve, mode: IntersectMode) -> Vec<Point2> {
        CurveCurveIntersect::new(a, b, mode).execute()
    }

    /// Parallel curve at `distance` on `side`, or `None` if degenerate.
    fn offset(&self, curve: &Curve, side: Side, distance: f64) -> Option<Curve> {
        CurveOffset2D::new(curve, side, distance).execute()
    }

    /// Erases every curve in `ids`, draining the list.
    ///
    /// Every id is attempted even when some are missing.
    ///
    /// # Errors
    ///
    /// Returns the first failure after all curves have been attempted.
    fn erase_all(&mut self, ids: &mut Vec<CurveId>) -> Result<()> {
        let mut first = None;
        for id in ids.drain(..) {
            if let Err(err) = self.erase_curve(id) {
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), |err| Err(err.into()))
    }
}
