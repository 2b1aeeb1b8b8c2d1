pub mod body;
pub mod collision;
pub mod error;
pub mod math;
pub mod shape;
pub mod solver;
pub mod space;
pub mod utils;

pub use body::{Body, BodyKind, MassProperties};
pub use collision::{Collider, Contact, ContactImpulse, detect};
pub use error::{PhysicsError, Result};
pub use math::{Transform, Vec2Ext};
pub use shape::{Geometry, Material, Shape, WorldShape};
pub use solver::{CombineRule, SolverConfig, resolve};
pub use space::{BodyHandle, Space, SpaceConfig};
pub use ultraviolet;
pub use ultraviolet::Vec2;
