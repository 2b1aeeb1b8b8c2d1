use crate::{
    body::Body,
    collision::{self, Collider, Contact},
    error::{PhysicsError, Result},
    solver::{self, SolverConfig},
};

use ultraviolet::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key of a body inside a [`Space`]. Handles are never reused, so ordering by
/// handle is ordering by insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u32);

impl BodyHandle {
    pub(crate) fn from_raw(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// World-wide simulation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpaceConfig {
    pub gravity: Vec2,
    /// Fraction of velocity kept after one second; 1 disables damping.
    pub damping: f32,
    pub solver: SolverConfig,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::zero(),
            damping: Self::DEFAULT_DAMPING,
            solver: SolverConfig::default(),
        }
    }
}

impl SpaceConfig {
    pub const DEFAULT_DAMPING: f32 = 1.0;

    /// Checks that gravity is finite, `damping` lies in `[0, 1]` and the
    /// solver settings are in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite()) {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PhysicsError::InvalidConfig("damping must lie in [0, 1]"));
        }
        self.solver.validate()
    }
}

/// The simulation world: owns every body and advances them in fixed steps.
#[derive(Clone, Debug, Default)]
pub struct Space {
    config: SpaceConfig,
    /// Slot per handle ever issued; removed bodies leave `None` behind.
    bodies: Vec<Option<Body>>,
    /// Contacts found during the most recent step.
    contacts: Vec<Contact>,
    /// Simulated time in seconds.
    time: f64,
    /// Number of completed steps.
    steps: u64,
}

impl Space {
    /// Creates an empty space with no gravity.
    pub fn new() -> Self {
        Self::with_config(SpaceConfig::default())
    }

    pub fn with_config(config: SpaceConfig) -> Self {
        Self {
            config,
            bodies: Vec::new(),
            contacts: Vec::new(),
            time: 0.0,
            steps: 0,
        }
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.config.gravity = gravity;
    }

    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SpaceConfig {
        &mut self.config
    }

    /// Takes ownership of `body` and returns its handle.
    pub fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = BodyHandle::from_raw(self.bodies.len() as u32);
        self.bodies.push(Some(body));
        handle
    }

    /// Removes a body and hands it back. Its handle stays retired.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Option<Body> {
        self.bodies.get_mut(handle.index())?.take()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.index())?.as_ref()
    }

    /// Mutable access between steps, e.g. to perturb position or velocity.
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.index())?.as_mut()
    }

    /// Live bodies in insertion order.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|body| (BodyHandle::from_raw(i as u32), body))
            })
    }

    pub fn len(&self) -> usize {
        self.bodies.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Contacts detected and resolved during the last call to [`Space::step`].
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advances the world by `dt` seconds.
    /// Velocities are integrated first, then contacts are detected and
    /// resolved, then positions move with the corrected velocities.
    ///
    /// Fails before touching any body with [`PhysicsError::InvalidTimestep`]
    /// if `dt` is not a positive finite number, or with
    /// [`PhysicsError::InvalidConfig`] if the configuration was set out of range.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidTimestep(dt));
        }
        self.config.validate()?;

        self.integrate_velocities(dt);
        self.collide();
        self.integrate_positions(dt);

        self.time += f64::from(dt);
        self.steps += 1;
        Ok(())
    }

    fn integrate_velocities(&mut self, dt: f32) {
        let gravity = self.config.gravity;
        let damping = self.config.damping;
        for body in self.bodies.iter_mut().flatten() {
            body.integrate_velocity(gravity, damping, dt);
        }
    }

    fn integrate_positions(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().flatten() {
            body.integrate_position(dt);
        }
    }

    /// Tests every shape pair across bodies `i < j` in handle order and
    /// resolves each contact as soon as it is found. Pairs of static bodies
    /// are skipped, as are shapes on the same body.
    fn collide(&mut self) {
        self.contacts.clear();
        let config = self.config.solver;

        for j in 1..self.bodies.len() {
            for i in 0..j {
                let (lo, hi) = self.bodies.split_at_mut(j);
                let (Some(first), Some(second)) = (lo[i].as_mut(), hi[0].as_mut()) else {
                    continue;
                };
                if first.is_static() && second.is_static() {
                    continue;
                }
                let (first, second) = (
                    (BodyHandle::from_raw(i as u32), first),
                    (BodyHandle::from_raw(j as u32), second),
                );
                // A static body always plays B, so normals point away from it.
                let ((ha, a), (hb, b)) = if first.1.is_static() {
                    (second, first)
                } else {
                    (first, second)
                };

                for sa in 0..a.shapes().len() {
                    for sb in 0..b.shapes().len() {
                        let shape_a = a.shapes()[sa];
                        let shape_b = b.shapes()[sb];
                        let found = collision::detect(
                            Collider { handle: ha, body: &*a, shape: &shape_a },
                            Collider { handle: hb, body: &*b, shape: &shape_b },
                        );
                        if let Some(mut contact) = found {
                            contact.impulse = solver::resolve(
                                &contact,
                                (&mut *a, shape_a.material()),
                                (&mut *b, shape_b.material()),
                                &config,
                            );
                            self.contacts.push(contact);
                        }
                    }
                }
            }
        }
    }
}
