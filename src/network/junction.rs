use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::JunctionError;
use crate::geometry::{Arc, Side};
use crate::math::{angles_match, normalize_angle, Point2};
use crate::surface::CurveId;

use super::centre_line::CentreLineId;
use super::road::ChainEnd;

/// Direction of the secondary road relative to the primary's travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    /// Side of the primary road the secondary road meets.
    #[must_use]
    pub fn side(self) -> Side {
        match self {
            Self::Left => Side::Left,
            Self::Right => Side::Right,
        }
    }
}

/// Where on its road a junction part lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionPartType {
    Start,
    End,
    Mid,
}

impl From<ChainEnd> for JunctionPartType {
    fn from(end: ChainEnd) -> Self {
        match end {
            ChainEnd::Start => Self::Start,
            ChainEnd::End => Self::End,
        }
    }
}

/// How pavements are joined across a junction arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuation {
    Fillet,
    Straight,
}

/// One of the two roads meeting at a junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JunctionPart {
    pub part_type: JunctionPartType,
    pub centre_line: CentreLineId,
    pub intersection_point: Point2,
    /// Direction of travel at the intersection point, in `[0, 2π)`.
    pub angle_at_intersection: f64,
}

/// A secondary road's chain end meeting a primary road's interior.
#[derive(Debug, Clone)]
pub struct Junction {
    primary: JunctionPart,
    secondary: JunctionPart,
    turn: Turn,
    radius: f64,
    continuation: Continuation,
    pub(crate) arcs: Vec<Arc>,
    pub(crate) generated: Vec<CurveId>,
}

impl Junction {
    /// Builds a junction, classifying its turn.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::UnclassifiedTurn`] if the roads do not meet
    /// at a right angle within `angle_tolerance`.
    pub fn new(
        primary: JunctionPart,
        secondary: JunctionPart,
        radius: f64,
        continuation: Continuation,
        angle_tolerance: f64,
    ) -> std::result::Result<Self, JunctionError> {
        let turn = classify_turn(&primary, &secondary, angle_tolerance)?;
        Ok(Self {
            primary,
            secondary,
            turn,
            radius,
            continuation,
            arcs: Vec::new(),
            generated: Vec::new(),
        })
    }

    #[must_use]
    pub fn primary(&self) -> &JunctionPart {
        &self.primary
    }

    #[must_use]
    pub fn secondary(&self) -> &JunctionPart {
        &self.secondary
    }

    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn continuation(&self) -> Continuation {
        self.continuation
    }

    /// Carriageway arcs built during the last rebuild.
    #[must_use]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Curves (arcs and pavement continuations) created on the surface.
    #[must_use]
    pub fn generated(&self) -> &[CurveId] {
        &self.generated
    }
}

/// Classifies the turn from the secondary road's approach direction.
///
/// A secondary road ending at the junction approaches along its travel
/// direction; one starting there approaches against it. Turning that
/// approach a quarter clockwise yields the primary direction for a right
/// turn, a quarter counter-clockwise for a left turn.
///
/// # Errors
///
/// Returns [`JunctionError::UnclassifiedTurn`] when neither rotation matches.
pub fn classify_turn(
    primary: &JunctionPart,
    secondary: &JunctionPart,
    angle_tolerance: f64,
) -> std::result::Result<Turn, JunctionError> {
    let approach = match secondary.part_type {
        JunctionPartType::Start => secondary.angle_at_intersection + PI,
        _ => secondary.angle_at_intersection,
    };
    let target = primary.angle_at_intersection;
    if angles_match(approach - FRAC_PI_2, target, angle_tolerance) {
        Ok(Turn::Right)
    } else if angles_match(approach + FRAC_PI_2, target, angle_tolerance) {
        Ok(Turn::Left)
    } else {
        Err(JunctionError::UnclassifiedTurn {
            primary: normalize_angle(target),
            secondary: normalize_angle(secondary.angle_at_intersection),
        })
    }
}
