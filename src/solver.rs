//! Single-iteration sequential-impulse contact response.
//!
//! Each contact is resolved in three passes:
//!
//! 1. push the bodies apart along the normal (split by inverse mass),
//! 2. a normal impulse that removes approaching velocity, scaled by restitution,
//! 3. a friction impulse against the remaining slip, clamped by Coulomb's law.

use crate::body::Body;
use crate::collision::{Contact, ContactImpulse};
use crate::error::{PhysicsError, Result};
use crate::math::Vec2Ext;
use crate::shape::Material;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How two per-shape coefficients are merged into one for a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CombineRule {
    Min,
    Max,
    Average,
    GeometricMean,
    Multiply,
}

impl CombineRule {
    pub fn combine(self, a: f32, b: f32) -> f32 {
        match self {
            CombineRule::Min => a.min(b),
            CombineRule::Max => a.max(b),
            CombineRule::Average => 0.5 * (a + b),
            CombineRule::GeometricMean => (a * b).sqrt(),
            CombineRule::Multiply => a * b,
        }
    }
}

/// Tunables for contact resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Penetration left uncorrected.
    pub slop: f32,
    /// Fraction of the remaining penetration removed per contact, in `[0, 1]`.
    pub bias: f32,
    pub restitution: CombineRule,
    pub friction: CombineRule,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            slop: Self::DEFAULT_SLOP,
            bias: Self::DEFAULT_BIAS,
            restitution: Self::DEFAULT_RESTITUTION,
            friction: Self::DEFAULT_FRICTION,
        }
    }
}

impl SolverConfig {
    pub const DEFAULT_SLOP: f32 = 0.0;
    pub const DEFAULT_BIAS: f32 = 1.0;
    pub const DEFAULT_RESTITUTION: CombineRule = CombineRule::Min;
    pub const DEFAULT_FRICTION: CombineRule = CombineRule::GeometricMean;

    /// Checks that `slop` is finite and non-negative and `bias` lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.slop.is_finite() && self.slop >= 0.0) {
            return Err(PhysicsError::InvalidConfig("slop must be finite and non-negative"));
        }
        if !(0.0..=1.0).contains(&self.bias) {
            return Err(PhysicsError::InvalidConfig("bias must lie in [0, 1]"));
        }
        Ok(())
    }
}

/// Resolves one contact between `a` and `b`, mutating both in place.
///
/// The contact normal must point from `b` toward `a`. Static bodies have zero
/// inverse mass and ignore impulses, so a static side is never moved.
pub fn resolve(
    contact: &Contact,
    (a, material_a): (&mut Body, Material),
    (b, material_b): (&mut Body, Material),
    config: &SolverConfig,
) -> ContactImpulse {
    let n = contact.normal;
    let inv_mass_sum = a.inverse_mass() + b.inverse_mass();
    if inv_mass_sum == 0.0 {
        return ContactImpulse::default();
    }

    let correction = (contact.depth - config.slop).max(0.0) * config.bias;
    if correction > 0.0 {
        let push = n * (correction / inv_mass_sum);
        a.translate(push * a.inverse_mass());
        b.translate(-push * b.inverse_mass());
    }

    // Lever arms from each centre of mass to the contact point, after correction.
    let ra = contact.point - a.position();
    let rb = contact.point - b.position();

    let v_rel = a.velocity_at(ra) - b.velocity_at(rb);
    let vn = v_rel.dot(n);
    if vn >= 0.0 {
        return ContactImpulse::default();
    }

    let e = config.restitution.combine(material_a.elasticity, material_b.elasticity);
    let ra_n = ra.cross(n);
    let rb_n = rb.cross(n);
    let k_normal =
        inv_mass_sum + ra_n * ra_n * a.inverse_moment() + rb_n * rb_n * b.inverse_moment();
    let jn = -(1.0 + e) * vn / k_normal;
    a.apply_impulse_at(n * jn, ra);
    b.apply_impulse_at(-n * jn, rb);

    // Friction acts on the slip left after the normal impulse.
    let v_rel = a.velocity_at(ra) - b.velocity_at(rb);
    let slip = v_rel - n * v_rel.dot(n);
    let Ok(t) = slip.try_normalized() else {
        return ContactImpulse { normal: jn, tangent: 0.0 };
    };
    let vt = slip.dot(t);
    let ra_t = ra.cross(t);
    let rb_t = rb.cross(t);
    let k_tangent =
        inv_mass_sum + ra_t * ra_t * a.inverse_moment() + rb_t * rb_t * b.inverse_moment();
    let mu = config.friction.combine(material_a.friction, material_b.friction);
    let jt = (-vt / k_tangent).max(-mu * jn);
    a.apply_impulse_at(t * jt, ra);
    b.apply_impulse_at(-t * jt, rb);

    ContactImpulse { normal: jn, tangent: jt }
}
