//! Junction detection and geometry.
mod arc;
mod continuation;
mod detect;

pub use arc::{ArcPass, ArcPlan, JunctionArc, JunctionArcBuilder};
pub use continuation::{ContinuationCurves, PavementContinuation, PavementSide};
pub use detect::{Detection, JunctionDetector};
