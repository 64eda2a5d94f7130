mod intersect;

pub use intersect::CurveCurveIntersect;
