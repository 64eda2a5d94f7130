//! Arena-backed road network and its full-rebuild driver.
//!
//! Centre lines and roads live in slotmap arenas; roads hold centre-line
//! ids in chain order and each centre line knows its road and position, so
//! walking a chain never needs back-pointers.
mod centre_line;
mod closure;
mod crossover;
mod junction;
mod offset;
mod road;

pub use centre_line::{CentreLine, CentreLineId};
pub use closure::RoadClosure;
pub use crossover::CrossOver;
pub use junction::{classify_turn, Continuation, Junction, JunctionPart, JunctionPartType, Turn};
pub use offset::{CarriageWay, OffsetCurve, OffsetIntersect, Pavement, PavementKind};
pub use road::{ChainEnd, Road, RoadId, SideWidths};

use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::config::{FailurePolicy, HighwayConfig};
use crate::error::{HighwaysError, Result, SurfaceError, WidthError};
use crate::geometry::{Curve, Segment, Side};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::operations::connectivity::ConnectivityBuilder;
use crate::operations::junction::{ArcPass, JunctionArcBuilder, JunctionDetector, PavementContinuation, PavementSide};
use crate::surface::{CurveId, DrawingSurface};

/// Summary of one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub roads: usize,
    pub junctions: usize,
    pub arcs: usize,
    pub curves_created: usize,
    pub roads_with_errors: usize,
    /// The network was finalized and nothing was regenerated.
    pub skipped: bool,
}

/// Roads, their centre lines and the junctions between them.
#[derive(Debug)]
pub struct RoadNetwork {
    config: HighwayConfig,
    centre_lines: SlotMap<CentreLineId, CentreLine>,
    roads: SlotMap<RoadId, Road>,
    order: Vec<RoadId>,
    junctions: Vec<Junction>,
    finalized: bool,
}

impl RoadNetwork {
    /// Creates an empty network.
    #[must_use]
    pub fn new(config: HighwayConfig) -> Self {
        Self {
            config,
            centre_lines: SlotMap::with_key(),
            roads: SlotMap::with_key(),
            order: Vec::new(),
            junctions: Vec::new(),
            finalized: false,
        }
    }

    /// Chains `segments` into roads.
    ///
    /// # Errors
    ///
    /// Returns a connectivity error if a segment is unusable as a centre line.
    pub fn from_segments(segments: Vec<Segment>, config: HighwayConfig) -> Result<Self> {
        let chains = ConnectivityBuilder::new(segments, &config).execute()?;
        let mut network = Self::new(config);
        network.load(chains);
        Ok(network)
    }

    fn load(&mut self, chains: Vec<Vec<Segment>>) {
        self.centre_lines.clear();
        self.roads.clear();
        self.order.clear();
        self.junctions.clear();

        let defaults = SideWidths {
            carriageway: self.config.carriageway_width,
            pavement: self.config.pavement_width,
            pavement_kind: self.config.pavement_kind,
        };
        for chain in chains {
            let road_id = self.roads.insert(Road::new(defaults, defaults));
            for (index, segment) in chain.into_iter().enumerate() {
                let cl = CentreLine::new(segment, road_id, index, defaults.profile(), defaults.profile());
                let cl_id = self.centre_lines.insert(cl);
                if let Some(road) = self.roads.get_mut(road_id) {
                    road.centre_lines.push(cl_id);
                }
            }
            self.order.push(road_id);
        }
        debug!(roads = self.order.len(), centre_lines = self.centre_lines.len(), "road network loaded");
    }

    #[must_use]
    pub fn config(&self) -> &HighwayConfig {
        &self.config
    }

    /// Road ids in creation order.
    pub fn road_ids(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.order.iter().copied()
    }

    /// Roads in creation order.
    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &Road)> + '_ {
        self.order.iter().filter_map(|&id| self.roads.get(id).map(|r| (id, r)))
    }

    #[must_use]
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id)
    }

    #[must_use]
    pub fn centre_line(&self, id: CentreLineId) -> Option<&CentreLine> {
        self.centre_lines.get(id)
    }

    pub(crate) fn centre_line_mut(&mut self, id: CentreLineId) -> Option<&mut CentreLine> {
        self.centre_lines.get_mut(id)
    }

    /// Junctions found by the last rebuild.
    #[must_use]
    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Following centre line on the same road.
    #[must_use]
    pub fn next(&self, id: CentreLineId) -> Option<CentreLineId> {
        let cl = self.centre_lines.get(id)?;
        self.roads.get(cl.road())?.centre_lines.get(cl.index() + 1).copied()
    }

    /// Preceding centre line on the same road.
    #[must_use]
    pub fn previous(&self, id: CentreLineId) -> Option<CentreLineId> {
        let cl = self.centre_lines.get(id)?;
        let index = cl.index().checked_sub(1)?;
        self.roads.get(cl.road())?.centre_lines.get(index).copied()
    }

    /// Returns `true` if every member offset is geometrically sound and
    /// consecutive centre lines still share their end points.
    #[must_use]
    pub fn is_road_valid(&self, id: RoadId) -> bool {
        let Some(road) = self.roads.get(id) else {
            return false;
        };
        let members: Vec<&CentreLine> = road
            .centre_lines
            .iter()
            .filter_map(|&cl| self.centre_lines.get(cl))
            .collect();
        let offsets_valid = members.iter().all(|cl| {
            [Side::Left, Side::Right].into_iter().all(|side| {
                let w = road.widths(side);
                OffsetCurve::is_valid(cl.segment(), w.carriageway)
                    && OffsetCurve::is_valid(cl.segment(), w.carriageway + w.pavement)
            })
        });
        let contiguous = members.windows(2).all(|pair| {
            (pair[0].segment().end_point() - pair[1].segment().start_point()).norm() < self.config.position_tolerance
        });
        offsets_valid && contiguous
    }

    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Freezes the network: rebuilds are skipped until [`Self::unfinalize`].
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    pub fn unfinalize(&mut self) {
        self.finalized = false;
    }

    /// Sets the carriageway width on one side of a road.
    ///
    /// # Errors
    ///
    /// Returns a [`WidthError`] and leaves the road unchanged if the width is
    /// negative, makes a member offset degenerate, or is not below the
    /// radius of a junction on that side. An id from outside this network
    /// gives [`WidthError::UnknownRoad`].
    pub fn set_carriageway_width(&mut self, road: RoadId, side: Side, width: f64) -> Result<()> {
        let Some(current) = self.roads.get(road).map(|r| r.widths(side)) else {
            return Err(WidthError::UnknownRoad.into());
        };
        if (current.carriageway - width).abs() < TOLERANCE {
            return Ok(());
        }
        self.validate_widths(road, side, width, current.pavement, width)?;
        self.apply_widths(road, side, width, current.pavement);
        Ok(())
    }

    /// Sets the pavement width on one side of a road.
    ///
    /// # Errors
    ///
    /// As [`Self::set_carriageway_width`], checked against the pavement's
    /// own offset.
    pub fn set_pavement_width(&mut self, road: RoadId, side: Side, width: f64) -> Result<()> {
        let Some(current) = self.roads.get(road).map(|r| r.widths(side)) else {
            return Err(WidthError::UnknownRoad.into());
        };
        if (current.pavement - width).abs() < TOLERANCE {
            return Ok(());
        }
        self.validate_widths(road, side, current.carriageway, width, width)?;
        self.apply_widths(road, side, current.carriageway, width);
        Ok(())
    }

    /// # Errors
    ///
    /// See [`Self::set_carriageway_width`].
    pub fn set_left_carriageway(&mut self, road: RoadId, width: f64) -> Result<()> {
        self.set_carriageway_width(road, Side::Left, width)
    }

    /// # Errors
    ///
    /// See [`Self::set_carriageway_width`].
    pub fn set_right_carriageway(&mut self, road: RoadId, width: f64) -> Result<()> {
        self.set_carriageway_width(road, Side::Right, width)
    }

    /// # Errors
    ///
    /// See [`Self::set_pavement_width`].
    pub fn set_left_pavement(&mut self, road: RoadId, width: f64) -> Result<()> {
        self.set_pavement_width(road, Side::Left, width)
    }

    /// # Errors
    ///
    /// See [`Self::set_pavement_width`].
    pub fn set_right_pavement(&mut self, road: RoadId, width: f64) -> Result<()> {
        self.set_pavement_width(road, Side::Right, width)
    }

    fn validate_widths(
        &self,
        road_id: RoadId,
        side: Side,
        carriageway: f64,
        pavement: f64,
        checked: f64,
    ) -> std::result::Result<(), WidthError> {
        if checked < 0.0 {
            return Err(WidthError::Negative(checked));
        }
        let Some(road) = self.roads.get(road_id) else {
            return Ok(());
        };
        for cl in road.centre_lines.iter().filter_map(|&id| self.centre_lines.get(id)) {
            for distance in [carriageway, carriageway + pavement] {
                if !OffsetCurve::is_valid(cl.segment(), distance) {
                    return Err(WidthError::InvalidOffset { side, distance });
                }
            }
        }
        let road_of = |id: CentreLineId| self.centre_lines.get(id).map(CentreLine::road);
        for junction in &self.junctions {
            let as_primary =
                road_of(junction.primary().centre_line) == Some(road_id) && junction.turn().side() == side;
            let as_secondary = road_of(junction.secondary().centre_line) == Some(road_id);
            if (as_primary || as_secondary) && checked >= junction.radius() {
                return Err(WidthError::InvalidRadius {
                    side,
                    width: checked,
                    radius: junction.radius(),
                });
            }
        }
        Ok(())
    }

    fn apply_widths(&mut self, road_id: RoadId, side: Side, carriageway: f64, pavement: f64) {
        let Some(road) = self.roads.get_mut(road_id) else {
            return;
        };
        let widths = road.widths_mut(side);
        widths.carriageway = carriageway;
        widths.pavement = pavement;
        for &id in &road.centre_lines {
            if let Some(cl) = self.centre_lines.get_mut(id) {
                cl.carriageway_mut(side).set_widths(carriageway, pavement);
            }
        }
    }

    pub fn set_pavement_kind(&mut self, road_id: RoadId, side: Side, kind: PavementKind) {
        let Some(road) = self.roads.get_mut(road_id) else {
            return;
        };
        road.widths_mut(side).pavement_kind = kind;
        for &id in &road.centre_lines {
            if let Some(cl) = self.centre_lines.get_mut(id) {
                cl.carriageway_mut(side).set_pavement_kind(kind);
            }
        }
    }

    pub fn set_turning_head(&mut self, road_id: RoadId, turning_head: bool) {
        if let Some(road) = self.roads.get_mut(road_id) {
            road.turning_head = turning_head;
        }
    }

    /// Attaches a crossover; returns `false` if the road is unknown.
    pub fn add_crossover(&mut self, road_id: RoadId, crossover: CrossOver) -> bool {
        match self.roads.get_mut(road_id) {
            Some(road) => {
                road.features.push(crossover);
                true
            }
            None => false,
        }
    }

    /// Every curve currently generated by the network, in a stable order.
    #[must_use]
    pub fn generated_curves(&self) -> Vec<CurveId> {
        let mut ids = Vec::new();
        for (_, road) in self.roads() {
            for cl in road.centre_lines.iter().filter_map(|&id| self.centre_lines.get(id)) {
                for side in [Side::Left, Side::Right] {
                    let cw = cl.carriageway(side);
                    ids.extend_from_slice(cw.offset().generated());
                    ids.extend_from_slice(cw.pavement().offset().generated());
                }
            }
            for closure in [&road.start_closure, &road.end_closure].into_iter().flatten() {
                ids.extend_from_slice(closure.generated());
            }
            for feature in &road.features {
                ids.extend_from_slice(feature.generated());
            }
        }
        for junction in &self.junctions {
            ids.extend_from_slice(junction.generated());
        }
        ids
    }

    /// Re-chains `segments` and rebuilds all geometry.
    ///
    /// On a connectivity fault the previous roads and curves are kept; with
    /// [`FailurePolicy::Finalize`] the network is also frozen.
    ///
    /// # Errors
    ///
    /// Returns the connectivity fault, or a surface error from the rebuild.
    pub fn update<S: DrawingSurface + ?Sized>(&mut self, segments: Vec<Segment>, surface: &mut S) -> Result<RebuildReport> {
        if self.finalized {
            debug!("network finalized, update skipped");
            return Ok(RebuildReport {
                skipped: true,
                ..RebuildReport::default()
            });
        }
        match ConnectivityBuilder::new(segments, &self.config).execute() {
            Ok(chains) => {
                self.reset(surface)?;
                self.load(chains);
                self.rebuild(surface)
            }
            Err(err) => {
                warn!(%err, policy = ?self.config.failure_policy, "topology rebuild failed");
                if self.config.failure_policy == FailurePolicy::Finalize {
                    self.finalized = true;
                }
                Err(err)
            }
        }
    }

    /// Erases every generated curve. Widths and topology are kept.
    ///
    /// Curves already removed from the surface by the host count as erased.
    ///
    /// # Errors
    ///
    /// Returns the first other surface failure, after every owner has been
    /// cleared.
    pub fn reset<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let mut outcome = Ok(());
        for cl in self.centre_lines.values_mut() {
            note_erase(&mut outcome, cl.clear(surface));
        }
        for road in self.roads.values_mut() {
            for slot in [&mut road.start_closure, &mut road.end_closure] {
                if let Some(mut closure) = slot.take() {
                    note_erase(&mut outcome, closure.clear(surface));
                }
            }
            for feature in &mut road.features {
                note_erase(&mut outcome, feature.clear(surface));
            }
        }
        for junction in &mut self.junctions {
            note_erase(&mut outcome, surface.erase_all(&mut junction.generated));
        }
        self.junctions.clear();
        outcome
    }

    /// Regenerates all curves: junction arcs first, so their break points
    /// and ignore flags shape the road offsets generated after them.
    ///
    /// # Errors
    ///
    /// Returns an error if a previously generated curve is no longer on the
    /// surface.
    pub fn rebuild<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<RebuildReport> {
        if self.finalized {
            debug!("network finalized, rebuild skipped");
            return Ok(RebuildReport {
                skipped: true,
                ..RebuildReport::default()
            });
        }
        self.reset(surface)?;
        for cl in self.centre_lines.values_mut() {
            cl.set_ignore(Side::Left, false);
            cl.set_ignore(Side::Right, false);
        }
        for road in self.roads.values_mut() {
            road.has_errors = false;
        }

        let detection = JunctionDetector::new(self).execute(surface);
        for (road_id, _) in &detection.faults {
            self.mark_errors(*road_id);
        }
        self.junctions = detection.junctions;

        let mut arcs = 0;
        for index in 0..self.junctions.len() {
            arcs += self.build_junction(index, surface);
        }
        for road_id in self.order.clone() {
            self.generate_road(road_id, surface);
        }

        let report = RebuildReport {
            roads: self.order.len(),
            junctions: self.junctions.len(),
            arcs,
            curves_created: self.generated_curves().len(),
            roads_with_errors: self.roads.values().filter(|r| r.has_errors).count(),
            skipped: false,
        };
        debug!(?report, "rebuild finished");
        Ok(report)
    }

    fn mark_errors(&mut self, road_id: RoadId) {
        if let Some(road) = self.roads.get_mut(road_id) {
            road.has_errors = true;
        }
    }

    fn road_of(&self, id: CentreLineId) -> Option<RoadId> {
        self.centre_lines.get(id).map(CentreLine::road)
    }

    fn pavement_side(&self, road_id: RoadId, side: Side) -> PavementSide {
        let (width, kind) = self.roads.get(road_id).map_or(
            (self.config.pavement_width, self.config.pavement_kind),
            |r| (r.widths(side).pavement, r.widths(side).pavement_kind),
        );
        PavementSide { width, kind }
    }

    /// Builds both corner arcs of a junction. Returns how many were built.
    fn build_junction<S: DrawingSurface + ?Sized>(&mut self, index: usize, surface: &mut S) -> usize {
        let Some(junction) = self.junctions.get(index).cloned() else {
            return 0;
        };
        let (Some(primary_road), Some(secondary_road)) = (
            self.road_of(junction.primary().centre_line),
            self.road_of(junction.secondary().centre_line),
        ) else {
            return 0;
        };
        let secondary_is_end = junction.secondary().part_type == JunctionPartType::End;

        let mut arcs = Vec::new();
        let mut generated = Vec::new();
        let mut origin_skips = 0;
        for pass in [ArcPass::Before, ArcPass::After] {
            let built = match JunctionArcBuilder::new(&junction, pass).execute(self, surface) {
                Ok(built) => built,
                Err(err) => {
                    warn!(?pass, %err, "junction corner left open");
                    self.mark_errors(secondary_road);
                    continue;
                }
            };
            if built.primary_origin_skipped {
                origin_skips += 1;
            }
            let continuation = PavementContinuation::new(
                &built,
                self.pavement_side(primary_road, built.plan.primary_side),
                self.pavement_side(secondary_road, built.plan.secondary_side),
                junction.continuation(),
            )
            .execute();
            if let Some(cl) = self.centre_lines.get_mut(built.primary_centre_line) {
                cl.carriageway_mut(built.plan.primary_side)
                    .pavement_mut()
                    .offset_mut()
                    .add_intersect(OffsetIntersect {
                        point: continuation.primary_break,
                        is_before: pass == ArcPass::Before,
                    });
            }
            if let Some(cl) = self.centre_lines.get_mut(built.secondary_centre_line) {
                cl.carriageway_mut(built.plan.secondary_side)
                    .pavement_mut()
                    .offset_mut()
                    .add_intersect(OffsetIntersect {
                        point: continuation.secondary_break,
                        is_before: secondary_is_end,
                    });
            }

            generated.push(surface.create_curve(Curve::Arc(built.arc.clone())));
            for curve in continuation.curves {
                generated.push(surface.create_curve(curve));
            }
            arcs.push(built.arc);
        }

        if origin_skips == 2 {
            let side = junction.turn().side();
            if let Some(cl) = self.centre_lines.get_mut(junction.primary().centre_line) {
                cl.set_ignore(side, true);
            }
        }

        let count = arcs.len();
        if let Some(stored) = self.junctions.get_mut(index) {
            stored.arcs = arcs;
            stored.generated = generated;
        }
        count
    }

    /// Offsets, closures and features of one road.
    fn generate_road<S: DrawingSurface + ?Sized>(&mut self, road_id: RoadId, surface: &mut S) {
        let Some(members) = self.roads.get(road_id).map(|r| r.centre_lines.clone()) else {
            return;
        };
        let mut sound = true;
        for id in &members {
            if let Some(cl) = self.centre_lines.get_mut(*id) {
                sound &= cl.generate(surface);
            }
        }

        for end in [ChainEnd::Start, ChainEnd::End] {
            if self.is_junction_end(road_id, end) {
                continue;
            }
            let Some((point, travel)) = self.chain_end(road_id, end) else {
                continue;
            };
            let Some(road) = self.roads.get_mut(road_id) else {
                return;
            };
            let mut closure = RoadClosure::new(end, point, &travel, road.left, road.right);
            closure.generate(surface);
            *road.closure_slot(end) = Some(closure);
        }

        let edges = self.road_edges(road_id, surface);
        let Some(road) = self.roads.get_mut(road_id) else {
            return;
        };
        road.features.retain_mut(|feature| match feature.generate(&edges, surface) {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "crossover dropped");
                false
            }
        });
        if !sound {
            road.has_errors = true;
        }
    }

    fn is_junction_end(&self, road_id: RoadId, end: ChainEnd) -> bool {
        let Some(road) = self.roads.get(road_id) else {
            return false;
        };
        let id = match end {
            ChainEnd::Start => road.first(),
            ChainEnd::End => road.last(),
        };
        let part_type = JunctionPartType::from(end);
        self.junctions
            .iter()
            .any(|j| Some(j.secondary().centre_line) == id && j.secondary().part_type == part_type)
    }

    /// Chain end point and travel tangent there; `None` for closed loops.
    fn chain_end(&self, road_id: RoadId, end: ChainEnd) -> Option<(Point2, Vector2)> {
        let road = self.roads.get(road_id)?;
        let first = self.centre_lines.get(road.first()?)?.segment();
        let last = self.centre_lines.get(road.last()?)?.segment();
        if road.centre_lines.len() > 1
            && (first.start_point() - last.end_point()).norm() < self.config.position_tolerance
        {
            return None;
        }
        Some(match end {
            ChainEnd::Start => (first.start_point(), first.start_tangent()),
            ChainEnd::End => (last.end_point(), last.end_tangent()),
        })
    }

    /// Generated offsets and closure curves of a road.
    fn road_edges<S: DrawingSurface + ?Sized>(&self, road_id: RoadId, surface: &S) -> Vec<Curve> {
        let Some(road) = self.roads.get(road_id) else {
            return Vec::new();
        };
        let mut edges = Vec::new();
        for cl in road.centre_lines.iter().filter_map(|&id| self.centre_lines.get(id)) {
            for side in [Side::Left, Side::Right] {
                let cw = cl.carriageway(side);
                for &id in cw.offset().generated().iter().chain(cw.pavement().offset().generated()) {
                    if let Ok(curve) = surface.curve(id) {
                        edges.push(curve.clone());
                    }
                }
            }
        }
        for closure in [&road.start_closure, &road.end_closure].into_iter().flatten() {
            edges.extend_from_slice(closure.curves());
        }
        edges
    }
}

fn note_erase(outcome: &mut Result<()>, result: Result<()>) {
    match result {
        Err(HighwaysError::Surface(SurfaceError::CurveNotFound)) => {
            warn!("generated curve was already erased");
        }
        Err(err) if outcome.is_ok() => *outcome = Err(err),
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::surface::CurveStore;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_2;
    use tracing_subscriber::EnvFilter;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
        Segment::line(Point2::new(x0, y0), Point2::new(x1, y1)).unwrap()
    }

    /// A northbound road through the origin, split there, and a side road
    /// leaving east that bends north through a quarter arc.
    fn side_road_segments() -> Vec<Segment> {
        vec![
            line(0.0, -30.0, 0.0, 0.0),
            line(0.0, 0.0, 10.0, 0.0),
            line(0.0, 0.0, 0.0, 30.0),
            Segment::arc(Point2::new(10.0, 10.0), 10.0, -FRAC_PI_2, FRAC_PI_2).unwrap(),
        ]
    }

    fn side_road_network() -> (RoadNetwork, CurveStore, RebuildReport) {
        init_tracing();
        let mut network = RoadNetwork::from_segments(side_road_segments(), HighwayConfig::default()).unwrap();
        let mut store = CurveStore::new();
        let report = network.rebuild(&mut store).unwrap();
        (network, store, report)
    }

    #[test]
    fn side_road_scenario() {
        let (network, store, report) = side_road_network();

        assert_eq!(report.roads, 2);
        assert_eq!(report.junctions, 1);
        assert_eq!(report.arcs, 2);
        assert_eq!(report.roads_with_errors, 0);

        let junction = &network.junctions()[0];
        assert_eq!(junction.turn(), Turn::Right);
        assert_eq!(junction.secondary().part_type, JunctionPartType::Start);
        for arc in junction.arcs() {
            assert_abs_diff_eq!(arc.radius(), 6.0, epsilon = 1e-9);
            assert_abs_diff_eq!(arc.sweep().abs(), FRAC_PI_2, epsilon = 1e-9);
        }
        // Equal pavements: one concentric fillet per corner.
        assert_eq!(junction.generated().len(), 4);
        let fillets = junction
            .generated()
            .iter()
            .filter(|&&id| matches!(store.curve(id).unwrap(), Curve::Arc(a) if (a.radius() - 4.0).abs() < 1e-9))
            .count();
        assert_eq!(fillets, 2);

        // 16 offsets, closures at three free ends, four junction curves.
        assert_eq!(report.curves_created, 29);
        assert_eq!(store.len(), 29);
    }

    #[test]
    fn junction_trims_offsets_at_tangent_points() {
        let (network, store, _) = side_road_network();
        let (primary_id, primary) = network.roads().next().unwrap();
        assert_eq!(primary.centre_lines().len(), 2);
        assert!(network.is_road_valid(primary_id));

        let before = network.centre_line(primary.centre_lines()[0]).unwrap();
        let right = before.carriageway(Side::Right).offset();
        assert_eq!(right.intersects().len(), 1);
        assert_eq!(right.generated().len(), 1);
        let kept = store.curve(right.generated()[0]).unwrap();
        assert!((kept.end_point() - Point2::new(2.4, -8.4)).norm() < 1e-9);

        let after = network.centre_line(primary.centre_lines()[1]).unwrap();
        let kept = store
            .curve(after.carriageway(Side::Right).offset().generated()[0])
            .unwrap();
        assert!((kept.start_point() - Point2::new(2.4, 8.4)).norm() < 1e-9);

        // Left side is untouched.
        let left = before.carriageway(Side::Left).offset();
        assert!(left.intersects().is_empty());
        assert_abs_diff_eq!(store.curve(left.generated()[0]).unwrap().length(), 30.0, epsilon = 1e-9);
    }

    #[test]
    fn secondary_end_has_no_closure() {
        let (network, _, _) = side_road_network();
        let (_, side_road) = network.roads().nth(1).unwrap();
        assert!(side_road.closure(ChainEnd::Start).is_none());
        assert!(side_road.closure(ChainEnd::End).is_some());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let (mut network, mut store, first) = side_road_network();
        let curves: Vec<Curve> = network
            .generated_curves()
            .iter()
            .map(|&id| store.curve(id).unwrap().clone())
            .collect();

        let second = network.rebuild(&mut store).unwrap();
        assert_eq!(first, second);
        let again: Vec<Curve> = network
            .generated_curves()
            .iter()
            .map(|&id| store.curve(id).unwrap().clone())
            .collect();
        assert_eq!(curves.len(), again.len());
        for (a, b) in curves.iter().zip(&again) {
            assert!(a.approx_eq(b, 1e-9));
        }
        assert_eq!(store.len(), curves.len());
    }

    #[test]
    fn width_at_junction_radius_is_rejected() {
        let (mut network, _, _) = side_road_network();
        let primary = network.road_ids().next().unwrap();

        let err = network.set_carriageway_width(primary, Side::Right, 6.0).unwrap_err();
        assert!(matches!(err, HighwaysError::Width(WidthError::InvalidRadius { .. })));
        assert_abs_diff_eq!(network.road(primary).unwrap().right_carriageway(), 2.4, epsilon = 1e-12);

        // The far side of the primary road has no junction.
        network.set_carriageway_width(primary, Side::Left, 6.0).unwrap();
        assert_abs_diff_eq!(network.road(primary).unwrap().left_carriageway(), 6.0, epsilon = 1e-12);

        let side_road = network.road_ids().nth(1).unwrap();
        assert!(network.set_left_pavement(side_road, 6.5).is_err());
        assert!(network.set_right_carriageway(side_road, -1.0).is_err());
    }

    #[test]
    fn width_beyond_arc_center_is_rejected() {
        let mut network = RoadNetwork::from_segments(side_road_segments(), HighwayConfig::default()).unwrap();
        let side_road = network.road_ids().nth(1).unwrap();
        let err = network.set_left_carriageway(side_road, 8.5).unwrap_err();
        assert!(matches!(err, HighwaysError::Width(WidthError::InvalidOffset { .. })));
        assert_abs_diff_eq!(network.road(side_road).unwrap().left_carriageway(), 2.4, epsilon = 1e-12);

        network.set_left_carriageway(side_road, 3.0).unwrap();
        let cl = network.road(side_road).unwrap().centre_lines()[1];
        let pavement = network.centre_line(cl).unwrap().carriageway(Side::Left).pavement();
        assert_abs_diff_eq!(pavement.offset().distance(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn crossover_is_kept_or_dropped() {
        let mut network =
            RoadNetwork::from_segments(vec![line(0.0, 0.0, 20.0, 0.0)], HighwayConfig::default()).unwrap();
        let road = network.road_ids().next().unwrap();
        assert!(network.add_crossover(road, CrossOver::new(Point2::new(10.0, 3.4), 3.0)));
        assert!(network.add_crossover(road, CrossOver::new(Point2::new(100.0, 50.0), 3.0)));

        let mut store = CurveStore::new();
        network.rebuild(&mut store).unwrap();
        let features = network.road(road).unwrap().features();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].generated().len(), 2);
        assert!(network.road(road).unwrap().closure(ChainEnd::Start).is_some());
    }

    #[test]
    fn connectivity_fault_retains_previous_curves() {
        let (mut network, mut store, report) = side_road_network();
        let err = network.update(vec![line(0.0, 0.0, 1e-4, 0.0)], &mut store);
        assert!(err.is_err());
        assert!(!network.is_finalized());
        assert_eq!(store.len(), report.curves_created);
        assert_eq!(network.road_ids().count(), 2);
    }

    #[test]
    fn connectivity_fault_can_finalize() {
        let config = HighwayConfig {
            failure_policy: FailurePolicy::Finalize,
            ..HighwayConfig::default()
        };
        let mut network = RoadNetwork::from_segments(side_road_segments(), config).unwrap();
        let mut store = CurveStore::new();
        network.rebuild(&mut store).unwrap();

        assert!(network.update(vec![line(0.0, 0.0, 1e-4, 0.0)], &mut store).is_err());
        assert!(network.is_finalized());
        assert!(network.rebuild(&mut store).unwrap().skipped);

        network.unfinalize();
        let report = network.update(side_road_segments(), &mut store).unwrap();
        assert_eq!(report.junctions, 1);
        assert_eq!(store.len(), report.curves_created);
    }

    #[test]
    fn manual_finalize_skips_rebuild() {
        let (mut network, mut store, report) = side_road_network();
        network.finalize();
        let skipped = network.rebuild(&mut store).unwrap();
        assert!(skipped.skipped);
        assert_eq!(skipped.curves_created, 0);
        assert_eq!(store.len(), report.curves_created);

        network.unfinalize();
        assert_eq!(network.rebuild(&mut store).unwrap(), report);
    }

    #[test]
    fn narrow_side_road_pavement_adds_radial_lines() {
        let (mut network, mut store, _) = side_road_network();
        let side_road = network.road_ids().nth(1).unwrap();
        network.set_left_pavement(side_road, 1.0).unwrap();
        network.set_right_pavement(side_road, 1.0).unwrap();
        network.set_pavement_kind(side_road, Side::Right, PavementKind::ServiceStrip);
        let road = network.road(side_road).unwrap();
        assert_abs_diff_eq!(road.left_pavement(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(road.right_pavement(), 1.0, epsilon = 1e-12);
        assert_eq!(road.widths(Side::Right).pavement_kind, PavementKind::ServiceStrip);

        let report = network.rebuild(&mut store).unwrap();
        // Each corner: junction arc, fillet at the wider pavement, closing line.
        assert_eq!(network.junctions()[0].generated().len(), 6);
        assert_eq!(report.curves_created, 31);
    }

    #[test]
    fn degenerate_offset_flags_road() {
        init_tracing();
        let tight = Segment::arc(Point2::origin(), 2.0, 0.0, FRAC_PI_2).unwrap();
        let mut network = RoadNetwork::from_segments(vec![tight], HighwayConfig::default()).unwrap();
        let road = network.road_ids().next().unwrap();
        assert!(!network.is_road_valid(road));

        let mut store = CurveStore::new();
        let report = network.rebuild(&mut store).unwrap();
        assert_eq!(report.roads_with_errors, 1);
        assert!(network.road(road).unwrap().has_errors());
    }

    #[test]
    fn chain_walk() {
        let network = RoadNetwork::from_segments(side_road_segments(), HighwayConfig::default()).unwrap();
        let (_, primary) = network.roads().next().unwrap();
        let (a, b) = (primary.centre_lines()[0], primary.centre_lines()[1]);
        assert_eq!(network.next(a), Some(b));
        assert_eq!(network.previous(b), Some(a));
        assert_eq!(network.previous(a), None);
        assert_eq!(network.next(b), None);
    }

    #[test]
    fn externally_erased_curve_does_not_orphan_the_rest() {
        let (mut network, mut store, report) = side_road_network();
        let gone = network.junctions()[0].generated()[0];
        store.erase_curve(gone).unwrap();

        let again = network.rebuild(&mut store).unwrap();
        assert_eq!(again, report);
        assert_eq!(store.len(), again.curves_created);
    }

    #[test]
    fn short_first_secondary_centre_line_is_stepped_over() {
        let mut network = RoadNetwork::from_segments(
            vec![
                line(0.0, -30.0, 0.0, 30.0),
                line(0.0, 0.0, 5.0, 0.0),
                line(5.0, 0.0, 20.0, 0.0),
            ],
            HighwayConfig::default(),
        )
        .unwrap();
        let mut store = CurveStore::new();
        let report = network.rebuild(&mut store).unwrap();
        assert_eq!(report.junctions, 1);
        assert_eq!(report.arcs, 2);

        let (_, side_road) = network.roads().nth(1).unwrap();
        assert_eq!(side_road.centre_lines().len(), 2);
        let first = network.centre_line(side_road.centre_lines()[0]).unwrap();
        let second = network.centre_line(side_road.centre_lines()[1]).unwrap();
        for side in [Side::Left, Side::Right] {
            assert!(first.is_ignored(side));
            assert!(first.carriageway(side).offset().generated().is_empty());
            assert!(first.carriageway(side).pavement().offset().generated().is_empty());
            assert!(!second.is_ignored(side));
            assert_eq!(second.carriageway(side).offset().generated().len(), 1);
        }

        let mut centres: Vec<Point2> = network.junctions()[0].arcs().iter().map(|a| *a.center()).collect();
        centres.sort_by(|a, b| a.y.total_cmp(&b.y));
        assert!((centres[0] - Point2::new(8.4, -8.4)).norm() < 1e-9);
        assert!((centres[1] - Point2::new(8.4, 8.4)).norm() < 1e-9);
    }

    #[test]
    fn left_turn_into_secondary_end() {
        let mut network = RoadNetwork::from_segments(
            vec![line(0.0, -30.0, 0.0, 30.0), line(-20.0, 0.0, 0.0, 0.0)],
            HighwayConfig::default(),
        )
        .unwrap();
        let mut store = CurveStore::new();
        let report = network.rebuild(&mut store).unwrap();
        assert_eq!(report.arcs, 2);
        assert_eq!(report.roads_with_errors, 0);

        let junction = &network.junctions()[0];
        assert_eq!(junction.turn(), Turn::Left);
        assert_eq!(junction.secondary().part_type, JunctionPartType::End);
        let mut centres: Vec<Point2> = junction.arcs().iter().map(|a| *a.center()).collect();
        centres.sort_by(|a, b| a.y.total_cmp(&b.y));
        assert!((centres[0] - Point2::new(-8.4, -8.4)).norm() < 1e-9);
        assert!((centres[1] - Point2::new(-8.4, 8.4)).norm() < 1e-9);

        let (_, side_road) = network.roads().nth(1).unwrap();
        assert!(side_road.closure(ChainEnd::End).is_none());
        assert!(side_road.closure(ChainEnd::Start).is_some());
    }

    #[test]
    fn width_setter_rejects_unknown_road() {
        let mut network =
            RoadNetwork::from_segments(vec![line(0.0, 0.0, 20.0, 0.0)], HighwayConfig::default()).unwrap();
        let err = network
            .set_carriageway_width(RoadId::default(), Side::Left, 3.0)
            .unwrap_err();
        assert!(matches!(err, HighwaysError::Width(WidthError::UnknownRoad)));
        assert!(network.set_right_pavement(RoadId::default(), 1.0).is_err());
    }
}
