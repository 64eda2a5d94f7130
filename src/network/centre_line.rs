use crate::error::Result;
use crate::geometry::{Segment, Side};
use crate::surface::DrawingSurface;

use super::offset::{CarriageWay, PavementKind};
use super::RoadId;

slotmap::new_key_type! {
    /// Unique identifier for a centre line within a road network.
    pub struct CentreLineId;
}

/// One member of a road chain together with its two carriageways.
#[derive(Debug, Clone)]
pub struct CentreLine {
    segment: Segment,
    road: RoadId,
    index: usize,
    left: CarriageWay,
    right: CarriageWay,
}

/// Widths and kind applied to one side when a centre line is created.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SideProfile {
    pub carriageway: f64,
    pub pavement: f64,
    pub kind: PavementKind,
}

impl CentreLine {
    pub(crate) fn new(segment: Segment, road: RoadId, index: usize, left: SideProfile, right: SideProfile) -> Self {
        Self {
            segment,
            road,
            index,
            left: CarriageWay::new(Side::Left, left.carriageway, left.pavement, left.kind),
            right: CarriageWay::new(Side::Right, right.carriageway, right.pavement, right.kind),
        }
    }

    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Road owning this centre line.
    #[must_use]
    pub fn road(&self) -> RoadId {
        self.road
    }

    /// Position within the owning road's chain.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn carriageway(&self, side: Side) -> &CarriageWay {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn carriageway_mut(&mut self, side: Side) -> &mut CarriageWay {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn is_ignored(&self, side: Side) -> bool {
        self.carriageway(side).is_ignored()
    }

    pub fn set_ignore(&mut self, side: Side, ignore: bool) {
        self.carriageway_mut(side).set_ignore(ignore);
    }

    /// Generates both sides. Returns `false` if any offset was degenerate.
    pub fn generate<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let left = self.left.create(&self.segment, surface);
        let right = self.right.create(&self.segment, surface);
        left && right
    }

    /// Erases generated curves and break points on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated curve is no longer on the surface.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let left = self.left.clear(surface);
        let right = self.right.clear(surface);
        left.and(right)
    }
}
