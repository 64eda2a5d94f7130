use crate::geometry::Side;

use super::centre_line::{CentreLineId, SideProfile};
use super::closure::RoadClosure;
use super::crossover::CrossOver;
use super::offset::PavementKind;

slotmap::new_key_type! {
    /// Unique identifier for a road within a road network.
    pub struct RoadId;
}

/// Which end of a road chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainEnd {
    Start,
    End,
}

/// Lateral profile of one side of a road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideWidths {
    pub carriageway: f64,
    pub pavement: f64,
    pub pavement_kind: PavementKind,
}

impl SideWidths {
    pub(crate) fn profile(self) -> SideProfile {
        SideProfile {
            carriageway: self.carriageway,
            pavement: self.pavement,
            kind: self.pavement_kind,
        }
    }
}

/// An ordered chain of centre lines sharing one lateral profile.
#[derive(Debug, Clone)]
pub struct Road {
    pub(crate) centre_lines: Vec<CentreLineId>,
    pub(crate) left: SideWidths,
    pub(crate) right: SideWidths,
    pub(crate) turning_head: bool,
    pub(crate) start_closure: Option<RoadClosure>,
    pub(crate) end_closure: Option<RoadClosure>,
    pub(crate) features: Vec<CrossOver>,
    pub(crate) has_errors: bool,
}

impl Road {
    pub(crate) fn new(left: SideWidths, right: SideWidths) -> Self {
        Self {
            centre_lines: Vec::new(),
            left,
            right,
            turning_head: false,
            start_closure: None,
            end_closure: None,
            features: Vec::new(),
            has_errors: false,
        }
    }

    /// Member centre lines in chain order.
    #[must_use]
    pub fn centre_lines(&self) -> &[CentreLineId] {
        &self.centre_lines
    }

    #[must_use]
    pub fn first(&self) -> Option<CentreLineId> {
        self.centre_lines.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<CentreLineId> {
        self.centre_lines.last().copied()
    }

    #[must_use]
    pub fn widths(&self, side: Side) -> SideWidths {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn widths_mut(&mut self, side: Side) -> &mut SideWidths {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    #[must_use]
    pub fn left_carriageway(&self) -> f64 {
        self.left.carriageway
    }

    #[must_use]
    pub fn right_carriageway(&self) -> f64 {
        self.right.carriageway
    }

    #[must_use]
    pub fn left_pavement(&self) -> f64 {
        self.left.pavement
    }

    #[must_use]
    pub fn right_pavement(&self) -> f64 {
        self.right.pavement
    }

    /// Turning heads use the smaller fillet radius where they meet another road.
    #[must_use]
    pub fn is_turning_head(&self) -> bool {
        self.turning_head
    }

    #[must_use]
    pub fn closure(&self, end: ChainEnd) -> Option<&RoadClosure> {
        match end {
            ChainEnd::Start => self.start_closure.as_ref(),
            ChainEnd::End => self.end_closure.as_ref(),
        }
    }

    pub(crate) fn closure_slot(&mut self, end: ChainEnd) -> &mut Option<RoadClosure> {
        match end {
            ChainEnd::Start => &mut self.start_closure,
            ChainEnd::End => &mut self.end_closure,
        }
    }

    #[must_use]
    pub fn features(&self) -> &[CrossOver] {
        &self.features
    }

    /// Set when a local degeneracy skipped part of this road's geometry
    /// during the last rebuild.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}
