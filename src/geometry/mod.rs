pub mod curve;
pub mod segment;

pub use curve::{Arc, Circle, Curve, Line, Side};
pub use segment::{GeometryType, Segment};
