//! 2D vector helpers on top of `ultraviolet::Vec2`.
//!
//! Addition, subtraction, scaling, `dot` and `mag` come straight from
//! ultraviolet. [`Vec2Ext`] fills in the pieces a 2D rigid-body solver needs
//! that ultraviolet does not spell out: the scalar cross product, the
//! perpendicular, rotation by an angle and a normalize that reports failure.

use crate::error::{PhysicsError, Result};
use ultraviolet::Vec2;

/// Extra 2D operations used by collision and contact code.
pub trait Vec2Ext: Sized {
    /// Z component of the 3D cross product of `(self, 0)` and `(other, 0)`.
    fn cross(self, other: Vec2) -> f32;

    /// Counter-clockwise perpendicular, `(-y, x)`.
    fn perp(self) -> Vec2;

    /// Rotates counter-clockwise by `angle` radians.
    fn rotated(self, angle: f32) -> Vec2;

    /// Unit vector in the same direction.
    /// Fails with [`PhysicsError::DegenerateVector`] when the length is zero.
    fn try_normalized(self) -> Result<Vec2>;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    fn rotated(self, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn try_normalized(self) -> Result<Vec2> {
        let mag = self.mag();
        if mag > 0.0 {
            Ok(self / mag)
        } else {
            Err(PhysicsError::DegenerateVector)
        }
    }
}

/// Cross product of a scalar angular velocity with a vector, `ω × r`.
/// Gives the linear velocity of a point at offset `r` on a spinning body.
#[inline]
pub fn cross_scalar(w: f32, r: Vec2) -> Vec2 {
    r.perp() * w
}

/// Rigid placement of a body: translation plus rotation about the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub angle: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec2 { x: 0.0, y: 0.0 },
        angle: 0.0,
    };

    pub fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }

    /// Maps a body-local point into world space.
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        self.position + local.rotated(self.angle)
    }

    /// Maps a body-local direction into world space (rotation only).
    #[inline]
    pub fn apply_vector(&self, local: Vec2) -> Vec2 {
        local.rotated(self.angle)
    }
}
