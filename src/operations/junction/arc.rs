use tracing::debug;

use crate::error::JunctionError;
use crate::geometry::{Arc, Circle, Curve, Side};
use crate::math::arc_2d::minor_sweep;
use crate::math::{angle_of, same_point_rounded, Point2};
use crate::network::{CentreLineId, Junction, JunctionPartType, OffsetIntersect, RoadNetwork, Turn};
use crate::surface::{DrawingSurface, IntersectMode};

/// Which corner of a junction an arc closes.
///
/// `Before` faces the primary road's approach to the junction point,
/// `After` its continuation beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcPass {
    Before,
    After,
}

/// Sides and orientation of one junction arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcPlan {
    /// Arc runs from the secondary tangent point to the primary one.
    pub reverse_arc: bool,
    pub primary_side: Side,
    pub secondary_side: Side,
}

/// `(turn, secondary part type) -> [before, after]` as `(primary, secondary)` sides.
const PLANS: [((Turn, JunctionPartType), [(Side, Side); 2]); 4] = [
    ((Turn::Right, JunctionPartType::End), [(Side::Right, Side::Left), (Side::Right, Side::Right)]),
    ((Turn::Right, JunctionPartType::Start), [(Side::Right, Side::Right), (Side::Right, Side::Left)]),
    ((Turn::Left, JunctionPartType::End), [(Side::Left, Side::Right), (Side::Left, Side::Left)]),
    ((Turn::Left, JunctionPartType::Start), [(Side::Left, Side::Left), (Side::Left, Side::Right)]),
];

impl ArcPlan {
    /// Looks up the plan for a junction corner. `None` for a `Mid`
    /// secondary part, which never occurs for detected junctions.
    #[must_use]
    pub fn lookup(turn: Turn, secondary: JunctionPartType, pass: ArcPass) -> Option<Self> {
        let (_, sides) = PLANS.iter().find(|(key, _)| *key == (turn, secondary))?;
        let (primary_side, secondary_side) = match pass {
            ArcPass::Before => sides[0],
            ArcPass::After => sides[1],
        };
        Some(Self {
            reverse_arc: pass == ArcPass::After,
            primary_side,
            secondary_side,
        })
    }
}

/// Tangent arc closing one junction corner.
#[derive(Debug, Clone)]
pub struct JunctionArc {
    pub pass: ArcPass,
    pub plan: ArcPlan,
    pub arc: Arc,
    pub primary_centre_line: CentreLineId,
    pub secondary_centre_line: CentreLineId,
    pub primary_tangent: Point2,
    pub secondary_tangent: Point2,
    /// The centre line holding the junction point was stepped over.
    pub primary_origin_skipped: bool,
}

impl JunctionArc {
    #[must_use]
    pub fn center(&self) -> Point2 {
        *self.arc.center()
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.arc.radius()
    }
}

/// Searches both roads away from the junction for the first pair of
/// centre lines whose carriageway edges, pushed out by the junction radius,
/// intersect. That intersection is the arc center.
///
/// Pairs are tried in increasing combined distance from the junction.
/// Centre lines stepped over are marked ignored on the arc's side, and
/// break points are recorded at both tangent points.
pub struct JunctionArcBuilder<'a> {
    junction: &'a Junction,
    pass: ArcPass,
}

impl<'a> JunctionArcBuilder<'a> {
    #[must_use]
    pub fn new(junction: &'a Junction, pass: ArcPass) -> Self {
        Self { junction, pass }
    }

    /// Executes the search and records its side effects on `network`.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::NoArc`] if the walks are exhausted without an
    /// intersection; `network` is left untouched then.
    pub fn execute<S: DrawingSurface + ?Sized>(
        &self,
        network: &mut RoadNetwork,
        surface: &S,
    ) -> std::result::Result<JunctionArc, JunctionError> {
        let secondary_type = self.junction.secondary().part_type;
        let plan = ArcPlan::lookup(self.junction.turn(), secondary_type, self.pass).ok_or(JunctionError::NoArc)?;
        let primary_run = self.primary_run(network);
        let secondary_run = self.secondary_run(network);

        let (i, j, center) = self
            .search(network, surface, &plan, &primary_run, &secondary_run)
            .ok_or(JunctionError::NoArc)?;
        let (p_id, s_id) = (primary_run[i], secondary_run[j]);
        let primary_tangent = self
            .tangent_point(network, surface, p_id, plan.primary_side, &center)
            .ok_or(JunctionError::NoArc)?;
        let secondary_tangent = self
            .tangent_point(network, surface, s_id, plan.secondary_side, &center)
            .ok_or(JunctionError::NoArc)?;

        let radius = self.junction.radius();
        let (a_p, a_s) = (angle_of(&(primary_tangent - center)), angle_of(&(secondary_tangent - center)));
        let (start, end) = if plan.reverse_arc { (a_s, a_p) } else { (a_p, a_s) };
        let arc = Arc::new(center, radius, start, minor_sweep(start, end)).map_err(|_| JunctionError::NoArc)?;

        let origin = self.junction.primary().centre_line;
        let mut primary_origin_skipped = false;
        for &id in &primary_run[..i] {
            if id == origin {
                primary_origin_skipped = true;
            } else if let Some(cl) = network.centre_line_mut(id) {
                cl.set_ignore(plan.primary_side, true);
            }
        }
        for &id in &secondary_run[..j] {
            if let Some(cl) = network.centre_line_mut(id) {
                cl.set_ignore(plan.secondary_side, true);
            }
        }
        if let Some(cl) = network.centre_line_mut(p_id) {
            cl.carriageway_mut(plan.primary_side).offset_mut().add_intersect(OffsetIntersect {
                point: primary_tangent,
                is_before: self.pass == ArcPass::Before,
            });
        }
        if let Some(cl) = network.centre_line_mut(s_id) {
            cl.carriageway_mut(plan.secondary_side).offset_mut().add_intersect(OffsetIntersect {
                point: secondary_tangent,
                is_before: secondary_type == JunctionPartType::End,
            });
        }

        debug!(pass = ?self.pass, primary_steps = i, secondary_steps = j, "junction arc built");
        Ok(JunctionArc {
            pass: self.pass,
            plan,
            arc,
            primary_centre_line: p_id,
            secondary_centre_line: s_id,
            primary_tangent,
            secondary_tangent,
            primary_origin_skipped,
        })
    }

    /// Primary centre lines walking away from the junction point.
    fn primary_run(&self, network: &RoadNetwork) -> Vec<CentreLineId> {
        let part = self.junction.primary();
        let Some(cl) = network.centre_line(part.centre_line) else {
            return Vec::new();
        };
        let segment = cl.segment();
        match self.pass {
            ArcPass::Before => {
                let first = if same_point_rounded(&segment.start_point(), &part.intersection_point) {
                    network.previous(part.centre_line)
                } else {
                    Some(part.centre_line)
                };
                walk(network, first, RoadNetwork::previous)
            }
            ArcPass::After => {
                let first = if same_point_rounded(&segment.end_point(), &part.intersection_point) {
                    network.next(part.centre_line)
                } else {
                    Some(part.centre_line)
                };
                walk(network, first, RoadNetwork::next)
            }
        }
    }

    fn secondary_run(&self, network: &RoadNetwork) -> Vec<CentreLineId> {
        let part = self.junction.secondary();
        match part.part_type {
            JunctionPartType::End => walk(network, Some(part.centre_line), RoadNetwork::previous),
            _ => walk(network, Some(part.centre_line), RoadNetwork::next),
        }
    }

    fn search<S: DrawingSurface + ?Sized>(
        &self,
        network: &RoadNetwork,
        surface: &S,
        plan: &ArcPlan,
        primary_run: &[CentreLineId],
        secondary_run: &[CentreLineId],
    ) -> Option<(usize, usize, Point2)> {
        let (m, n) = (primary_run.len(), secondary_run.len());
        if m == 0 || n == 0 {
            return None;
        }
        let radius = self.junction.radius();
        let primary_edges: Vec<Option<Curve>> = primary_run
            .iter()
            .map(|&id| enlarged_edge(network, surface, id, plan.primary_side, radius))
            .collect();
        let secondary_edges: Vec<Option<Curve>> = secondary_run
            .iter()
            .map(|&id| enlarged_edge(network, surface, id, plan.secondary_side, radius))
            .collect();

        let junction_point = self.junction.secondary().intersection_point;
        for total in 0..m + n - 1 {
            for i in 0..=total.min(m - 1) {
                let j = total - i;
                if j >= n {
                    continue;
                }
                let (Some(p_edge), Some(s_edge)) = (&primary_edges[i], &secondary_edges[j]) else {
                    continue;
                };
                let center = surface
                    .intersect(p_edge, s_edge, IntersectMode::OnBoth)
                    .into_iter()
                    .min_by(|a, b| (a - junction_point).norm().total_cmp(&(b - junction_point).norm()));
                if let Some(center) = center {
                    return Some((i, j, center));
                }
            }
        }
        None
    }

    /// Touching point of the arc circle with a true carriageway edge.
    fn tangent_point<S: DrawingSurface + ?Sized>(
        &self,
        network: &RoadNetwork,
        surface: &S,
        id: CentreLineId,
        side: Side,
        center: &Point2,
    ) -> Option<Point2> {
        let cl = network.centre_line(id)?;
        let edge = surface.offset(cl.segment().curve(), side, cl.carriageway(side).width())?;
        let circle = Curve::Circle(Circle::new(*center, self.junction.radius()).ok()?);
        surface
            .intersect(&circle, &edge, IntersectMode::ExtendSecond)
            .into_iter()
            .min_by(|a, b| {
                let da = edge.distance_to(a);
                let db = edge.distance_to(b);
                da.total_cmp(&db)
            })
            .or_else(|| Some(foot_on_support(&edge, center)))
    }
}

fn walk(
    network: &RoadNetwork,
    first: Option<CentreLineId>,
    step: fn(&RoadNetwork, CentreLineId) -> Option<CentreLineId>,
) -> Vec<CentreLineId> {
    let mut run = Vec::new();
    let mut cursor = first;
    while let Some(id) = cursor {
        if run.contains(&id) {
            break;
        }
        run.push(id);
        cursor = step(network, id);
    }
    run
}

/// Carriageway edge pushed out by the junction radius.
fn enlarged_edge<S: DrawingSurface + ?Sized>(
    network: &RoadNetwork,
    surface: &S,
    id: CentreLineId,
    side: Side,
    radius: f64,
) -> Option<Curve> {
    let cl = network.centre_line(id)?;
    surface.offset(cl.segment().curve(), side, cl.carriageway(side).width() + radius)
}

/// Closest point to `p` on the curve's supporting line or circle.
fn foot_on_support(curve: &Curve, p: &Point2) -> Point2 {
    match curve.circle_parts() {
        Some((c, r)) => {
            let v = p - c;
            let len = v.norm();
            if len > 0.0 {
                c + v * (r / len)
            } else {
                curve.start_point()
            }
        }
        None => curve.point_at(curve.project(p)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plan_table() {
        let p = ArcPlan::lookup(Turn::Right, JunctionPartType::End, ArcPass::Before).unwrap();
        assert_eq!((p.primary_side, p.secondary_side), (Side::Right, Side::Left));
        assert!(!p.reverse_arc);

        let p = ArcPlan::lookup(Turn::Left, JunctionPartType::Start, ArcPass::After).unwrap();
        assert_eq!((p.primary_side, p.secondary_side), (Side::Left, Side::Right));
        assert!(p.reverse_arc);

        assert!(ArcPlan::lookup(Turn::Left, JunctionPartType::Mid, ArcPass::Before).is_none());
    }

    #[test]
    fn primary_side_follows_turn() {
        for turn in [Turn::Left, Turn::Right] {
            for part in [JunctionPartType::Start, JunctionPartType::End] {
                for pass in [ArcPass::Before, ArcPass::After] {
                    let p = ArcPlan::lookup(turn, part, pass).unwrap();
                    assert_eq!(p.primary_side, turn.side());
                }
            }
        }
    }

    #[test]
    fn foot_on_line_and_circle() {
        let line = Curve::Line(crate::geometry::Line::new(Point2::origin(), Point2::new(10.0, 0.0)).unwrap());
        let foot = foot_on_support(&line, &Point2::new(12.0, 5.0));
        assert!((foot - Point2::new(12.0, 0.0)).norm() < 1e-12);

        let circle = Curve::Circle(Circle::new(Point2::origin(), 2.0).unwrap());
        let foot = foot_on_support(&circle, &Point2::new(0.0, 5.0));
        assert!((foot - Point2::new(0.0, 2.0)).norm() < 1e-12);
    }
}
