use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{angular_offset, arc_point_at, arc_tangent_at};
use crate::math::{angle_of, Point2, Vector2, TOLERANCE};

/// A circular arc in the plane.
///
/// Defined by a center, radius, start angle and a signed sweep (radians).
/// A positive sweep runs counter-clockwise, a negative one clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    center: Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl Arc {
    /// Creates a new arc.
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the arc circle
    /// * `radius` - Radius (must be positive)
    /// * `start_angle` - Angle of the start point in radians
    /// * `sweep` - Signed sweep in radians, `0 < |sweep| <= 2π`
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive or the sweep is empty or
    /// larger than a full turn.
    pub fn new(center: Point2, radius: f64, start_angle: f64, sweep: f64) -> Result<Self> {
        if radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if sweep.abs() < TOLERANCE || sweep.abs() > TAU + TOLERANCE {
            return Err(GeometryError::Degenerate(format!("arc sweep {sweep} out of range")).into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            sweep,
        })
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
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.sweep < 0.0
    }

    #[must_use]
    pub fn start_point(&self) -> Point2 {
        arc_point_at(&self.center, self.radius, self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> Point2 {
        arc_point_at(&self.center, self.radius, self.end_angle())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    /// Absolute angle reached after travelling arc length `s` from the start.
    #[must_use]
    pub fn angle_at(&self, s: f64) -> f64 {
        self.start_angle + self.sweep.signum() * s / self.radius
    }

    #[must_use]
    pub fn point_at(&self, s: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, self.angle_at(s))
    }

    /// Unit tangent at arc length `s`, in the direction of travel.
    #[must_use]
    pub fn tangent_at(&self, s: f64) -> Vector2 {
        arc_tangent_at(self.angle_at(s), self.sweep)
    }

    /// Arc-length parameter of the radial projection of `p`.
    ///
    /// Points outside the angular range fold to the nearer end, so the result
    /// may be negative or exceed [`Arc::length`].
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        let v = p - self.center;
        if v.norm() < TOLERANCE {
            return 0.0;
        }
        angular_offset(angle_of(&v), self.start_angle, self.sweep) * self.radius
    }

    /// Returns the same arc traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            radius: self.radius,
            start_angle: self.end_angle(),
            sweep: -self.sweep,
        }
    }

    /// Returns a concentric arc over the same angular range.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is non-positive.
    pub fn with_radius(&self, radius: f64) -> Result<Self> {
        Self::new(self.center, radius, self.start_angle, self.sweep)
    }
}
