mod curve_offset_2d;

pub use curve_offset_2d::CurveOffset2D;
