use crate::error::{PhysicsError, Result};
use crate::math::{Transform, Vec2Ext, cross_scalar};
use crate::shape::Shape;
use ultraviolet::Vec2;

/// Mass and moment of a dynamic body, with their inverses cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    pub moment: f32,
    pub inv_mass: f32,
    pub inv_moment: f32,
}

impl MassProperties {
    /// Fails with [`PhysicsError::InvalidMass`] unless both values are finite and positive.
    pub fn new(mass: f32, moment: f32) -> Result<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(mass) || !valid(moment) {
            return Err(PhysicsError::InvalidMass { mass, moment });
        }
        Ok(Self {
            mass,
            moment,
            inv_mass: 1.0 / mass,
            inv_moment: 1.0 / moment,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyKind {
    /// Infinite mass. Never integrated and never receives impulses.
    Static,
    Dynamic(MassProperties),
}

/// A rigid body with its owned collision shapes.
#[derive(Clone, Debug)]
pub struct Body {
    kind: BodyKind,
    position: Vec2,
    angle: f32,
    velocity: Vec2,
    angular_velocity: f32,
    /// Force accumulated for the next step, cleared after it.
    force: Vec2,
    torque: f32,
    shapes: Vec<Shape>,
}

impl Body {
    fn with_kind(kind: BodyKind, position: Vec2, angle: f32) -> Self {
        Self {
            kind,
            position,
            angle,
            velocity: Vec2::zero(),
            angular_velocity: 0.0,
            force: Vec2::zero(),
            torque: 0.0,
            shapes: Vec::new(),
        }
    }

    /// Creates a static body at the origin with no rotation.
    pub fn new_static() -> Self {
        Self::new_static_at(Vec2::zero(), 0.0)
    }

    pub fn new_static_at(position: Vec2, angle: f32) -> Self {
        Self::with_kind(BodyKind::Static, position, angle)
    }

    /// Creates a dynamic body at the origin, at rest.
    pub fn new_dynamic(mass: f32, moment: f32) -> Result<Self> {
        let props = MassProperties::new(mass, moment)?;
        Ok(Self::with_kind(BodyKind::Dynamic(props), Vec2::zero(), 0.0))
    }

    /// Creates a dynamic body whose moment is derived from its shapes.
    /// The mass is split evenly across the shapes; an empty list has no
    /// defined moment and is rejected.
    pub fn new_dynamic_with_shapes(mass: f32, shapes: Vec<Shape>) -> Result<Self> {
        let share = mass / shapes.len() as f32;
        let moment: f32 = shapes.iter().map(|s| s.moment(share)).sum();
        let mut body = Self::new_dynamic(mass, moment)?;
        body.shapes = shapes;
        Ok(body)
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_static(&self) -> bool {
        matches!(self.kind, BodyKind::Static)
    }

    pub fn is_dynamic(&self) -> bool {
        !self.is_static()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.angle)
    }

    /// Infinite for static bodies.
    pub fn mass(&self) -> f32 {
        match self.kind {
            BodyKind::Static => f32::INFINITY,
            BodyKind::Dynamic(p) => p.mass,
        }
    }

    /// Infinite for static bodies.
    pub fn moment(&self) -> f32 {
        match self.kind {
            BodyKind::Static => f32::INFINITY,
            BodyKind::Dynamic(p) => p.moment,
        }
    }

    pub fn inverse_mass(&self) -> f32 {
        match self.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic(p) => p.inv_mass,
        }
    }

    pub fn inverse_moment(&self) -> f32 {
        match self.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic(p) => p.inv_moment,
        }
    }

    /// Moves the body. For a static body this carries its shapes rigidly.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// No effect on static bodies.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if self.is_dynamic() {
            self.velocity = velocity;
        }
    }

    /// No effect on static bodies.
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if self.is_dynamic() {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Adds a force through the centre of mass, applied during the next step.
    pub fn apply_force(&mut self, force: Vec2) {
        if self.is_dynamic() {
            self.force += force;
        }
    }

    pub fn apply_torque(&mut self, torque: f32) {
        if self.is_dynamic() {
            self.torque += torque;
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec2) {
        if let BodyKind::Dynamic(p) = self.kind {
            self.velocity += impulse * p.inv_mass;
        }
    }

    /// Applies `impulse` at offset `r` from the centre of mass.
    pub fn apply_impulse_at(&mut self, impulse: Vec2, r: Vec2) {
        if let BodyKind::Dynamic(p) = self.kind {
            self.velocity += impulse * p.inv_mass;
            self.angular_velocity += r.cross(impulse) * p.inv_moment;
        }
    }

    /// Velocity of the point at offset `r` from the centre of mass.
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.velocity + cross_scalar(self.angular_velocity, r)
    }

    /// Zero for static bodies.
    pub fn kinetic_energy(&self) -> f32 {
        match self.kind {
            BodyKind::Static => 0.0,
            BodyKind::Dynamic(p) => {
                0.5 * p.mass * self.velocity.mag_sq()
                    + 0.5 * p.moment * self.angular_velocity * self.angular_velocity
            }
        }
    }

    /// First half of a semi-implicit Euler step: gravity, accumulated forces
    /// and damping update the velocities.
    pub(crate) fn integrate_velocity(&mut self, gravity: Vec2, damping: f32, dt: f32) {
        let BodyKind::Dynamic(p) = self.kind else {
            return;
        };
        let factor = damping.powf(dt);
        self.velocity = (self.velocity + (gravity + self.force * p.inv_mass) * dt) * factor;
        self.angular_velocity = (self.angular_velocity + self.torque * p.inv_moment * dt) * factor;
    }

    /// Second half: positions advance with the already-updated velocities.
    pub(crate) fn integrate_position(&mut self, dt: f32) {
        if self.is_static() {
            return;
        }
        self.position += self.velocity * dt;
        self.angle += self.angular_velocity * dt;
        self.force = Vec2::zero();
        self.torque = 0.0;
    }

    /// Shifts the body without touching its velocity. Used for penetration correction.
    pub(crate) fn translate(&mut self, offset: Vec2) {
        if self.is_dynamic() {
            self.position += offset;
        }
    }
}
