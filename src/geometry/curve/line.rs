use crate::error::{GeometryError, Result};
use crate::math::{left_normal, Point2, Vector2, TOLERANCE};

/// A bounded straight segment from `start` to `end`.
///
/// Parameterized by arc length: `P(s) = start + s * direction`, `s ∈ [0, length]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    start: Point2,
    end: Point2,
}

impl Line {
    /// Creates a new line segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the two points coincide.
    pub fn new(start: Point2, end: Point2) -> Result<Self> {
        if (end - start).norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn start(&self) -> &Point2 {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &Point2 {
        &self.end
    }

    /// Returns the unit direction from start to end.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start) / self.length()
    }

    /// Returns the unit normal pointing to the left of the direction of travel.
    #[must_use]
    pub fn left_normal(&self) -> Vector2 {
        left_normal(&self.direction())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Evaluates the point at arc length `s` (not clamped).
    #[must_use]
    pub fn point_at(&self, s: f64) -> Point2 {
        self.start + self.direction() * s
    }

    /// Arc-length parameter of the perpendicular foot of `p` (not clamped).
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        (p - self.start).dot(&self.direction())
    }

    /// Returns the same segment traversed end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}
