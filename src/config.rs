use crate::network::{Continuation, PavementKind};

/// What a [`RoadNetwork`](crate::network::RoadNetwork) does when a rebuild
/// hits a topology fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Keep the previously generated curves and topology.
    RetainPrevious,
    /// Keep the previous state and freeze the network: no further automatic
    /// regeneration until it is unfinalized.
    Finalize,
}

/// Named constants supplied at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct HighwayConfig {
    /// Fillet radius used at junctions.
    pub junction_radius: f64,
    /// Fillet radius used where the secondary road is a turning head.
    pub turning_head_radius: f64,
    /// Initial carriageway width on each side of new roads.
    pub carriageway_width: f64,
    /// Initial pavement width beyond each carriageway of new roads.
    pub pavement_width: f64,
    /// Initial pavement kind on each side of new roads.
    pub pavement_kind: PavementKind,
    /// ε: two points closer than this coincide.
    pub position_tolerance: f64,
    /// δ: two directions within this many radians agree.
    pub angle_tolerance: f64,
    /// How pavements are joined across junction arcs.
    pub continuation: Continuation,
    pub failure_policy: FailurePolicy,
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            junction_radius: 6.0,
            turning_head_radius: 4.0,
            carriageway_width: 2.4,
            pavement_width: 2.0,
            pavement_kind: PavementKind::Footway,
            position_tolerance: 1e-3,
            angle_tolerance: 1e-2,
            continuation: Continuation::Fillet,
            failure_policy: FailurePolicy::RetainPrevious,
        }
    }
}
