use crate::error::{PhysicsError, Result};
use crate::math::{Transform, Vec2Ext};
use ultraviolet::Vec2;

/// Local-space geometry of a collision shape, relative to its body's origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Circle { offset: Vec2, radius: f32 },
    /// A line segment from `a` to `b`, inflated by `thickness / 2` on every side.
    Segment { a: Vec2, b: Vec2, thickness: f32 },
}

/// Surface coefficients used when combining two shapes at a contact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Material {
    pub friction: f32,
    pub elasticity: f32,
}

/// A collision shape attached to one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    geometry: Geometry,
    material: Material,
}

/// World-space geometry, computed on demand from a body transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WorldShape {
    Circle { center: Vec2, radius: f32 },
    Segment { a: Vec2, b: Vec2, thickness: f32 },
}

fn check_dimension(value: f32, reason: &'static str) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidShape(reason))
    }
}

fn check_point(p: Vec2) -> Result<()> {
    if p.x.is_finite() && p.y.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidShape("coordinates must be finite"))
    }
}

impl Shape {
    /// Creates a circle of `radius` centred at `offset` in body space.
    /// A radius of zero is a point.
    pub fn circle(offset: Vec2, radius: f32) -> Result<Self> {
        check_point(offset)?;
        check_dimension(radius, "radius must be finite and non-negative")?;
        Ok(Self {
            geometry: Geometry::Circle { offset, radius },
            material: Material::default(),
        })
    }

    /// Creates a segment between two body-space endpoints.
    pub fn segment(a: Vec2, b: Vec2, thickness: f32) -> Result<Self> {
        check_point(a)?;
        check_point(b)?;
        check_dimension(thickness, "thickness must be finite and non-negative")?;
        Ok(Self {
            geometry: Geometry::Segment { a, b, thickness },
            material: Material::default(),
        })
    }

    pub fn with_friction(mut self, friction: f32) -> Result<Self> {
        self.set_friction(friction)?;
        Ok(self)
    }

    pub fn with_elasticity(mut self, elasticity: f32) -> Result<Self> {
        self.set_elasticity(elasticity)?;
        Ok(self)
    }

    /// Friction coefficient, any finite value `>= 0`.
    pub fn set_friction(&mut self, friction: f32) -> Result<()> {
        check_dimension(friction, "friction must be finite and non-negative")?;
        self.material.friction = friction;
        Ok(())
    }

    /// Restitution coefficient in `[0, 1]`.
    pub fn set_elasticity(&mut self, elasticity: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&elasticity) {
            return Err(PhysicsError::InvalidShape("elasticity must lie in [0, 1]"));
        }
        self.material.elasticity = elasticity;
        Ok(())
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn friction(&self) -> f32 {
        self.material.friction
    }

    pub fn elasticity(&self) -> f32 {
        self.material.elasticity
    }

    /// Moment of inertia of this shape about the body origin for the given mass.
    ///
    /// Circles use the solid disk formula `m r² / 2`, segments the thin rod
    /// formula `m len² / 12` (thickness ignored). Both add the parallel-axis
    /// term for their centre's distance from the body origin. The value is
    /// meaningless for shapes on static bodies, which have infinite mass.
    pub fn moment(&self, mass: f32) -> f32 {
        match self.geometry {
            Geometry::Circle { offset, radius } => {
                mass * (0.5 * radius * radius + offset.mag_sq())
            }
            Geometry::Segment { a, b, .. } => {
                let mid = (a + b) * 0.5;
                mass * ((b - a).mag_sq() / 12.0 + mid.mag_sq())
            }
        }
    }

    /// Centre of the bounding circle in body space.
    pub fn local_center(&self) -> Vec2 {
        match self.geometry {
            Geometry::Circle { offset, .. } => offset,
            Geometry::Segment { a, b, .. } => (a + b) * 0.5,
        }
    }

    /// Radius of a circle around [`Shape::local_center`] that encloses the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self.geometry {
            Geometry::Circle { radius, .. } => radius,
            Geometry::Segment { a, b, thickness } => 0.5 * (b - a).mag() + 0.5 * thickness,
        }
    }

    /// Places the shape in the world using its body's current transform.
    pub fn world(&self, transform: &Transform) -> WorldShape {
        match self.geometry {
            Geometry::Circle { offset, radius } => WorldShape::Circle {
                center: transform.apply(offset),
                radius,
            },
            Geometry::Segment { a, b, thickness } => WorldShape::Segment {
                a: transform.apply(a),
                b: transform.apply(b),
                thickness,
            },
        }
    }
}

impl WorldShape {
    pub fn center(&self) -> Vec2 {
        match *self {
            WorldShape::Circle { center, .. } => center,
            WorldShape::Segment { a, b, .. } => (a + b) * 0.5,
        }
    }

    pub fn bounding_radius(&self) -> f32 {
        match *self {
            WorldShape::Circle { radius, .. } => radius,
            WorldShape::Segment { a, b, thickness } => 0.5 * (b - a).mag() + 0.5 * thickness,
        }
    }
}

/// Outward normal of the segment `a -> b`: its counter-clockwise perpendicular.
/// A zero-length segment has no direction, so it falls back to +Y.
pub fn segment_normal(a: Vec2, b: Vec2) -> Vec2 {
    (b - a).perp().try_normalized().unwrap_or(Vec2::unit_y())
}
