pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod network;
pub mod operations;
pub mod surface;

pub use config::{FailurePolicy, HighwayConfig};
pub use error::{HighwaysError, Result};
pub use network::{RebuildReport, RoadNetwork};
pub use surface::{CurveId, CurveStore, DrawingSurface};
