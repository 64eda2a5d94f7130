use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{arc_point_at, arc_tangent_at};
use crate::math::{angle_of, normalize_angle, Point2, Vector2, TOLERANCE};

/// A full counter-clockwise circle, parameterized from angle zero.
///
/// Used as a construction aid: junction fillets and crossover splays are
/// found by intersecting circles against offset curves.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("circle radius must be positive".into()).into(),
            );
        }
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        TAU * self.radius
    }

    #[must_use]
    pub fn point_at(&self, s: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, s / self.radius)
    }

    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Vector2 {
        arc_tangent_at(s / self.radius, 1.0)
    }

    /// Arc-length parameter of the radial projection of `p`, in `[0, 2πr)`.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        let v = p - self.center;
        if v.norm() < TOLERANCE {
            return 0.0;
        }
        normalize_angle(angle_of(&v)) * self.radius
    }
}
