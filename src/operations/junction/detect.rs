use tracing::{debug, warn};

use crate::error::JunctionError;
use crate::math::{angle_of, normalize_angle, same_point_rounded, Point2};
use crate::network::{ChainEnd, Junction, JunctionPart, JunctionPartType, Road, RoadId, RoadNetwork};
use crate::surface::{DrawingSurface, IntersectMode};

/// Junctions found by a [`JunctionDetector`] pass.
#[derive(Debug, Default)]
pub struct Detection {
    pub junctions: Vec<Junction>,
    /// Roads whose chain end meets another road but whose turn could not be
    /// classified.
    pub faults: Vec<(RoadId, JunctionError)>,
}

/// Finds road ends lying on the interior of another road.
///
/// For each road, its start and end points are compared (at 3-decimal
/// rounding) with the intersections of its end centre line against every
/// centre line of every other road. The first interior match becomes the
/// primary part; the chain end becomes the secondary part.
pub struct JunctionDetector<'a> {
    network: &'a RoadNetwork,
}

impl<'a> JunctionDetector<'a> {
    #[must_use]
    pub fn new(network: &'a RoadNetwork) -> Self {
        Self { network }
    }

    #[must_use]
    pub fn execute<S: DrawingSurface + ?Sized>(&self, surface: &S) -> Detection {
        let config = self.network.config();
        let mut detection = Detection::default();

        for road_id in self.network.road_ids() {
            let Some(road) = self.network.road(road_id) else {
                continue;
            };
            if self.is_loop(road) {
                continue;
            }
            for end in [ChainEnd::Start, ChainEnd::End] {
                let Some(secondary) = self.chain_end_part(road, end) else {
                    continue;
                };
                let Some(primary) = self.find_primary(road_id, &secondary, surface) else {
                    continue;
                };
                let radius = if road.is_turning_head() {
                    config.turning_head_radius
                } else {
                    config.junction_radius
                };
                match Junction::new(primary, secondary, radius, config.continuation, config.angle_tolerance) {
                    Ok(junction) => {
                        debug!(
                            ?end,
                            turn = ?junction.turn(),
                            x = secondary.intersection_point.x,
                            y = secondary.intersection_point.y,
                            "junction detected"
                        );
                        detection.junctions.push(junction);
                    }
                    Err(err) => {
                        warn!(?end, %err, "junction skipped");
                        detection.faults.push((road_id, err));
                    }
                }
            }
        }
        detection
    }

    fn is_loop(&self, road: &Road) -> bool {
        let ends = road
            .first()
            .zip(road.last())
            .and_then(|(a, b)| self.network.centre_line(a).zip(self.network.centre_line(b)));
        ends.is_some_and(|(a, b)| {
            road.centre_lines().len() > 1 && same_point_rounded(&a.segment().start_point(), &b.segment().end_point())
        })
    }

    fn chain_end_part(&self, road: &Road, end: ChainEnd) -> Option<JunctionPart> {
        let id = match end {
            ChainEnd::Start => road.first()?,
            ChainEnd::End => road.last()?,
        };
        let segment = self.network.centre_line(id)?.segment();
        let (point, tangent) = match end {
            ChainEnd::Start => (segment.start_point(), segment.start_tangent()),
            ChainEnd::End => (segment.end_point(), segment.end_tangent()),
        };
        Some(JunctionPart {
            part_type: end.into(),
            centre_line: id,
            intersection_point: point,
            angle_at_intersection: normalize_angle(angle_of(&tangent)),
        })
    }

    /// First centre line of another road whose interior holds the chain end.
    fn find_primary<S: DrawingSurface + ?Sized>(
        &self,
        road_id: RoadId,
        secondary: &JunctionPart,
        surface: &S,
    ) -> Option<JunctionPart> {
        let target = secondary.intersection_point;
        let probe = self.network.centre_line(secondary.centre_line)?.segment().curve();

        for other_id in self.network.road_ids().filter(|&id| id != road_id) {
            let Some(other) = self.network.road(other_id) else {
                continue;
            };
            if self.touches_chain_end(other, &target) {
                continue;
            }
            for &cl_id in other.centre_lines() {
                let Some(candidate) = self.network.centre_line(cl_id) else {
                    continue;
                };
                let curve = candidate.segment().curve();
                let hit = surface
                    .intersect(probe, curve, IntersectMode::ExtendFirst)
                    .into_iter()
                    .find(|p| same_point_rounded(p, &target));
                if let Some(point) = hit {
                    let s = curve.project(&point).clamp(0.0, curve.length());
                    return Some(JunctionPart {
                        part_type: JunctionPartType::Mid,
                        centre_line: cl_id,
                        intersection_point: point,
                        angle_at_intersection: normalize_angle(angle_of(&curve.tangent_at(s))),
                    });
                }
            }
        }
        None
    }

    fn touches_chain_end(&self, road: &Road, point: &Point2) -> bool {
        let start = road
            .first()
            .and_then(|id| self.network.centre_line(id))
            .map(|c| c.segment().start_point());
        let end = road
            .last()
            .and_then(|id| self.network.centre_line(id))
            .map(|c| c.segment().end_point());
        [start, end].into_iter().flatten().any(|p| same_point_rounded(&p, point))
    }
}
