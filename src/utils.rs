use crate::{
    body::Body,
    error::Result,
    shape::Shape,
    space::{BodyHandle, Space},
};
use ultraviolet::Vec2;

/// Fixed step used by the ready-made scenes, 60 Hz.
pub const DEFAULT_DT: f32 = 1.0 / 60.0;

/// Handles into the scene built by [`ball_drop`].
#[derive(Clone, Copy, Debug)]
pub struct BallDrop {
    pub ground: BodyHandle,
    pub ball: BodyHandle,
}

/// Builds the canonical scene: a ball of radius 5 and mass 1 held at
/// `(0, 15)` above a static ledge tilted from `(-20, 5)` to `(20, -5)`, under
/// gravity `(0, -100)`. The ball rolls off the low end to the right.
pub fn ball_drop() -> Result<(Space, BallDrop)> {
    let mut space = Space::new();
    space.set_gravity(Vec2::new(0.0, -100.0));

    let mut ground = Body::new_static();
    ground.add_shape(
        Shape::segment(Vec2::new(-20.0, 5.0), Vec2::new(20.0, -5.0), 0.0)?.with_friction(1.0)?,
    );
    let ground = space.add_body(ground);

    let radius = 5.0;
    let mass = 1.0;
    let ball_shape = Shape::circle(Vec2::zero(), radius)?.with_friction(0.7)?;
    let mut ball = Body::new_dynamic(mass, ball_shape.moment(mass))?;
    ball.set_position(Vec2::new(0.0, 15.0));
    ball.add_shape(ball_shape);
    let ball = space.add_body(ball);

    Ok((space, BallDrop { ground, ball }))
}

/// Builds a wide static ledge with `n` balls scattered above it.
/// Radii, positions and materials come from a generator seeded with `seed`,
/// so the same seed always yields the same world.
pub fn scattered_balls(n: usize, seed: u64) -> Result<Space> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut space = Space::new();
    space.set_gravity(Vec2::new(0.0, -100.0));

    let half_width = 10.0 + (n as f32).sqrt() * 10.0;
    let mut ground = Body::new_static_at(Vec2::new(0.0, -5.0), 0.0);
    ground.add_shape(
        Shape::segment(Vec2::new(-half_width, 2.0), Vec2::new(half_width, -2.0), 1.0)?
            .with_friction(0.9)?,
    );
    space.add_body(ground);

    for _ in 0..n {
        let radius = 0.5 + rng.f32() * 1.5;
        let mass = radius * radius;
        let x = (rng.f32() * 2.0 - 1.0) * half_width;
        let y = 5.0 + rng.f32() * 40.0;

        let shape = Shape::circle(Vec2::zero(), radius)?
            .with_friction(rng.f32())?
            .with_elasticity(rng.f32() * 0.5)?;
        let mut body = Body::new_dynamic_with_shapes(mass, vec![shape])?;
        body.set_position(Vec2::new(x, y));
        body.set_velocity(Vec2::new(rng.f32() * 10.0 - 5.0, 0.0));
        space.add_body(body);
    }

    Ok(space)
}
