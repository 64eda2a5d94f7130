use thiserror::Error;

use crate::geometry::Side;

/// Top-level error type for the highways engine.
#[derive(Debug, Error)]
pub enum HighwaysError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    #[error(transparent)]
    Width(#[from] WidthError),

    #[error(transparent)]
    Junction(#[from] JunctionError),

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,

    #[error("curve is neither a line nor an arc")]
    NotASegment,
}

/// Faults raised while chaining raw segments into roads.
///
/// These abort the whole rebuild: a road's geometry is undefined without a
/// sound topology.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("segment {index} cannot be used as a centre line: {reason}")]
    InvalidCentreLine { index: usize, reason: String },
}

/// Rejected carriageway/pavement width changes. State is left unchanged.
#[derive(Debug, Error)]
pub enum WidthError {
    #[error("{side:?} width {width} is not below junction radius {radius}")]
    InvalidRadius { side: Side, width: f64, radius: f64 },

    #[error("{side:?} offset distance {distance} is invalid for a member centre line")]
    InvalidOffset { side: Side, distance: f64 },

    #[error("width must be non-negative, got {0}")]
    Negative(f64),

    #[error("road is not part of this network")]
    UnknownRoad,
}

/// Faults local to a single junction.
#[derive(Debug, Error)]
pub enum JunctionError {
    #[error("turn cannot be classified: primary angle {primary}, secondary angle {secondary}")]
    UnclassifiedTurn { primary: f64, secondary: f64 },

    #[error("no intersecting offsets found for the junction arc")]
    NoArc,
}

/// Errors reported by a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("curve not found on the drawing surface")]
    CurveNotFound,
}

/// Failures of road features; the feature is dropped from its road.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("no perpendicular landing point on any offset of the road")]
    NoLandingPoint,
}

/// Convenience type alias for results using [`HighwaysError`].
pub type Result<T> = std::result::Result<T, HighwaysError>;
