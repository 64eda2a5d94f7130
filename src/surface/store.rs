use slotmap::SlotMap;

use crate::error::SurfaceError;
use crate::geometry::Curve;

use super::{CurveId, DrawingSurface};

/// In-memory drawing surface.
///
/// Curves are held in a slotmap arena, so erased ids never alias newly
/// created curves.
#[derive(Debug, Default)]
pub struct CurveStore {
    curves: SlotMap<CurveId, Curve>,
}

impl CurveStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of curves currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterates over all stored curves.
    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &Curve)> {
        self.curves.iter()
    }

    #[must_use]
    pub fn contains(&self, id: CurveId) -> bool {
        self.curves.contains_key(id)
    }
}

impl DrawingSurface for CurveStore {
    fn create_curve(&mut self, curve: Curve) -> CurveId {
        self.curves.insert(curve)
    }

    fn curve(&self, id: CurveId) -> Result<&Curve, SurfaceError> {
        self.curves.get(id).ok_or(SurfaceError::CurveNotFound)
    }

    fn erase_curve(&mut self, id: CurveId) -> Result<(), SurfaceError> {
        self.curves
            .remove(id)
            .map(|_| ())
            .ok_or(SurfaceError::CurveNotFound)
    }
}
