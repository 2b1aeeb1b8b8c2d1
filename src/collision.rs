//! Narrow-phase collision detection.
//!
//! [`detect`] dispatches on the pair of shape variants. Every handler reports
//! the contact normal pointing from body B toward body A: the direction A has
//! to move to get out of B. For the circle/segment pair that is "from the
//! segment toward the circle".
//!
//! Supported pairs:
//!
//! - circle / segment (either order)
//! - circle / circle
//! - segment / segment never collides

use crate::body::Body;
use crate::math::Vec2Ext;
use crate::shape::{Shape, WorldShape, segment_normal};
use crate::space::BodyHandle;
use ultraviolet::Vec2;

/// One shape together with the body that owns it.
#[derive(Clone, Copy, Debug)]
pub struct Collider<'a> {
    pub handle: BodyHandle,
    pub body: &'a Body,
    pub shape: &'a Shape,
}

/// A single overlap between two shapes, valid for one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// World-space point on the surface of B.
    pub point: Vec2,
    /// Unit normal from B toward A.
    pub normal: Vec2,
    /// Overlap along the normal, never negative.
    pub depth: f32,
    /// Impulses applied by the resolver, filled in once the contact is resolved.
    pub impulse: ContactImpulse,
}

/// Normal and tangential impulse magnitudes applied at a contact.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContactImpulse {
    pub normal: f32,
    pub tangent: f32,
}

/// Geometry of an overlap before it is tied to bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Overlap {
    point: Vec2,
    normal: Vec2,
    depth: f32,
}

impl Overlap {
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Tests two shapes for overlap using their bodies' current transforms.
pub fn detect(a: Collider<'_>, b: Collider<'_>) -> Option<Contact> {
    let world_a = a.shape.world(&a.body.transform());
    let world_b = b.shape.world(&b.body.transform());

    // Cheap reject before any exact test.
    let reach = world_a.bounding_radius() + world_b.bounding_radius();
    if (world_a.center() - world_b.center()).mag_sq() > reach * reach {
        return None;
    }

    let overlap = match (world_a, world_b) {
        (
            WorldShape::Circle { center, radius },
            WorldShape::Segment { a: sa, b: sb, thickness },
        ) => circle_segment(center, radius, sa, sb, thickness),
        (
            WorldShape::Segment { a: sa, b: sb, thickness },
            WorldShape::Circle { center, radius },
        ) => circle_segment(center, radius, sa, sb, thickness).map(Overlap::flipped),
        (
            WorldShape::Circle { center: ca, radius: ra },
            WorldShape::Circle { center: cb, radius: rb },
        ) => circle_circle(ca, ra, cb, rb),
        (WorldShape::Segment { .. }, WorldShape::Segment { .. }) => None,
    }?;

    Some(Contact {
        body_a: a.handle,
        body_b: b.handle,
        point: overlap.point,
        normal: overlap.normal,
        depth: overlap.depth,
        impulse: ContactImpulse::default(),
    })
}

/// Closest point to `p` on the finite segment `a -> b`.
/// A zero-length segment collapses to `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.mag_sq();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Circle against a point inflated by `surface`, the shared core of both handlers.
/// `fallback` is used as the normal when the centre sits exactly on the point.
fn circle_point(
    center: Vec2,
    radius: f32,
    point: Vec2,
    surface: f32,
    fallback: Vec2,
) -> Option<Overlap> {
    let delta = center - point;
    let dist = delta.mag();
    let reach = radius + surface;
    if dist > reach {
        return None;
    }
    let normal = delta.try_normalized().unwrap_or(fallback);
    Some(Overlap {
        point: point + normal * surface,
        normal,
        depth: reach - dist,
    })
}

/// Normal points from the segment toward the circle.
fn circle_segment(center: Vec2, radius: f32, a: Vec2, b: Vec2, thickness: f32) -> Option<Overlap> {
    let closest = closest_point_on_segment(center, a, b);
    circle_point(center, radius, closest, 0.5 * thickness, segment_normal(a, b))
}

/// Normal points from circle B toward circle A.
fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Overlap> {
    circle_point(ca, ra, cb, rb, Vec2::unit_y())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn ball_at(pos: Vec2, radius: f32) -> Body {
        let mut body = Body::new_dynamic(1.0, 1.0).unwrap();
        body.add_shape(Shape::circle(Vec2::zero(), radius).unwrap());
        body.set_position(pos);
        body
    }

    fn ledge(a: Vec2, b: Vec2, thickness: f32) -> Body {
        let mut body = Body::new_static();
        body.add_shape(Shape::segment(a, b, thickness).unwrap());
        body
    }

    fn run(a: &Body, b: &Body) -> Option<Contact> {
        detect(
            Collider { handle: BodyHandle::from_raw(0), body: a, shape: &a.shapes()[0] },
            Collider { handle: BodyHandle::from_raw(1), body: b, shape: &b.shapes()[0] },
        )
    }

    #[test]
    fn circle_resting_into_flat_segment() {
        let ball = ball_at(Vec2::new(0.0, 4.0), 5.0);
        let ground = ledge(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), 0.0);
        let c = run(&ball, &ground).expect("overlap");
        assert!(approx_eq(c.depth, 1.0));
        assert_eq!(c.normal, Vec2::unit_y());
        assert_eq!(c.point, Vec2::zero());
        assert_eq!(c.body_a, BodyHandle::from_raw(0));
    }

    #[test]
    fn thickness_extends_reach_and_moves_point_to_surface() {
        let ball = ball_at(Vec2::new(0.0, 5.5), 5.0);
        let ground = ledge(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), 2.0);
        let c = run(&ball, &ground).expect("overlap");
        assert!(approx_eq(c.depth, 0.5));
        assert!(approx_eq(c.point.y, 1.0));
    }

    #[test]
    fn separated_shapes_do_not_touch() {
        let ball = ball_at(Vec2::new(0.0, 5.01), 5.0);
        let ground = ledge(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), 0.0);
        assert!(run(&ball, &ground).is_none());
        // Past the end of the segment only the endpoint counts.
        let ball = ball_at(Vec2::new(14.0, 3.5), 5.0);
        assert!(run(&ball, &ground).is_none());
    }

    #[test]
    fn segment_end_acts_as_rounded_cap() {
        let ball = ball_at(Vec2::new(13.0, 4.0), 5.0);
        let ground = ledge(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), 0.0);
        let c = run(&ball, &ground).expect("overlap");
        assert_eq!(c.point, Vec2::new(10.0, 0.0));
        assert!(approx_eq(c.normal.x, 0.6) && approx_eq(c.normal.y, 0.8));
        assert!(approx_eq(c.depth, 0.0));
    }

    #[test]
    fn swapped_order_flips_normal() {
        let ball = ball_at(Vec2::new(0.0, 4.0), 5.0);
        let ground = ledge(Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0), 0.0);
        let c = run(&ground, &ball).expect("overlap");
        assert_eq!(c.normal, -Vec2::unit_y());
        assert!(approx_eq(c.depth, 1.0));
    }

    #[test]
    fn centre_on_segment_uses_segment_normal() {
        let ball = ball_at(Vec2::new(0.0, 0.0), 5.0);
        let ground = ledge(Vec2::new(-20.0, 5.0), Vec2::new(20.0, -5.0), 0.0);
        let c = run(&ball, &ground).expect("overlap");
        assert_eq!(c.normal, segment_normal(Vec2::new(-20.0, 5.0), Vec2::new(20.0, -5.0)));
        assert!(c.normal.y > 0.0);
        assert!(approx_eq(c.depth, 5.0));
    }

    #[test]
    fn degenerate_segment_matches_point_circle() {
        let p = Vec2::new(2.0, -1.0);
        let ball = ball_at(Vec2::new(4.0, 1.0), 3.0);
        let pin = ledge(p, p, 0.0);
        let mut dot = Body::new_static();
        dot.add_shape(Shape::circle(p, 0.0).unwrap());

        let vs_segment = run(&ball, &pin).expect("overlap");
        let vs_point = run(&ball, &dot).expect("overlap");
        assert_eq!(vs_segment, vs_point);

        // Also with the centre sitting exactly on the point.
        let ball = ball_at(p, 3.0);
        assert_eq!(run(&ball, &pin), run(&ball, &dot));
        assert_eq!(run(&ball, &pin).map(|c| c.normal), Some(Vec2::unit_y()));
    }

    #[test]
    fn circles_overlap() {
        let a = ball_at(Vec2::new(3.0, 0.0), 2.0);
        let b = ball_at(Vec2::new(0.0, 0.0), 2.0);
        let c = run(&a, &b).expect("overlap");
        assert_eq!(c.normal, Vec2::unit_x());
        assert!(approx_eq(c.depth, 1.0));
        assert!(approx_eq(c.point.x, 2.0));
    }

    #[test]
    fn segments_never_collide() {
        let a = ledge(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), 1.0);
        let b = ledge(Vec2::new(0.0, -1.0), Vec2::new(0.0, 1.0), 1.0);
        assert!(run(&a, &b).is_none());
    }

    #[test]
    fn closest_point_clamps_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(5.0, 3.0), a, b), Vec2::new(5.0, 0.0));
        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 3.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec2::new(15.0, 3.0), a, b), b);
        assert_eq!(closest_point_on_segment(Vec2::new(1.0, 1.0), a, a), a);
    }

    #[test]
    fn very_short_segment_still_has_two_ends() {
        let a = Vec2::zero();
        let b = Vec2::new(1e-4, 0.0);
        assert_eq!(closest_point_on_segment(Vec2::new(1.0, 0.0), a, b), b);
        assert_eq!(closest_point_on_segment(Vec2::new(-1.0, 0.0), a, b), a);
    }
}
