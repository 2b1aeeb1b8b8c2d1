use rigid2d::Vec2;
use rigid2d::utils::{self, DEFAULT_DT};

/// One row of the per-frame trace: state after the step, and whether the
/// step found a contact.
#[derive(Debug, Clone, Copy)]
struct Frame {
    pos: Vec2,
    vel: Vec2,
    contact: Option<rigid2d::Contact>,
}

fn run_two_seconds() -> (Vec<Frame>, utils::BallDrop) {
    let (mut space, scene) = utils::ball_drop().unwrap();
    let mut frames = Vec::with_capacity(120);
    for _ in 0..120 {
        space.step(DEFAULT_DT).unwrap();
        let ball = space.body(scene.ball).unwrap();
        frames.push(Frame {
            pos: ball.position(),
            vel: ball.velocity(),
            contact: space.contacts().first().copied(),
        });
    }
    (frames, scene)
}

#[test]
fn falls_freely_until_first_contact() {
    let (frames, _) = run_two_seconds();
    let first = frames
        .iter()
        .position(|f| f.contact.is_some())
        .expect("ball should reach the ledge");
    assert!(first > 10 && first < 60, "first contact at step {first}");

    let mut last_vy = 0.0;
    for f in &frames[..first] {
        assert!(f.vel.y < last_vy);
        assert_eq!(f.vel.x, 0.0);
        last_vy = f.vel.y;
    }
}

#[test]
fn first_contact_is_under_the_ball_on_the_ledge() {
    let (frames, scene) = run_two_seconds();
    let contact = frames.iter().find_map(|f| f.contact).unwrap();

    assert_eq!(contact.body_a, scene.ball);
    assert_eq!(contact.body_b, scene.ground);
    // Lies on the line y = -x / 4 close to the drop point.
    assert!(contact.point.x.abs() < 2.0, "contact at {:?}", contact.point);
    assert!((contact.point.y + 0.25 * contact.point.x).abs() < 1e-3);
    // Points from the ledge up toward the ball.
    assert!(contact.normal.y > 0.9);
    assert!(contact.impulse.normal > 0.0);
}

#[test]
fn contact_turns_the_fall_into_a_roll_downhill() {
    let (frames, _) = run_two_seconds();
    let first = frames.iter().position(|f| f.contact.is_some()).unwrap();
    let before = frames[first - 1];
    let after = frames[first];

    assert!(after.vel.y > before.vel.y, "{:?} -> {:?}", before.vel, after.vel);
    assert!(after.vel.x > 0.0);

    // The ledge slopes down to the right, so the ball keeps heading right.
    let last = frames.last().unwrap();
    assert!(last.vel.x > after.vel.x);
    assert!(last.pos.x > 5.0, "ended at {:?}", last.pos);
}

#[test]
fn ball_spins_while_rolling() {
    let (mut space, scene) = utils::ball_drop().unwrap();
    for _ in 0..60 {
        space.step(DEFAULT_DT).unwrap();
    }
    // Rolling right means turning clockwise.
    assert!(space.body(scene.ball).unwrap().angular_velocity() < 0.0);
    assert!((space.time() - 1.0).abs() < 1e-5);
}
