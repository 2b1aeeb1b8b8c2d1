//! Error type shared by every fallible operation in the crate.

/// Precondition violations reported by constructors, mutators and [`crate::Space::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// A dynamic body needs strictly positive, finite mass and moment.
    InvalidMass { mass: f32, moment: f32 },
    /// `step` needs a strictly positive, finite time delta.
    InvalidTimestep(f32),
    /// Normalizing a zero-length vector.
    DegenerateVector,
    /// A shape dimension or material coefficient is out of range.
    InvalidShape(&'static str),
    /// A [`crate::SpaceConfig`] or [`crate::SolverConfig`] field is out of range.
    InvalidConfig(&'static str),
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::InvalidMass { mass, moment } => {
                write!(f, "invalid mass properties (mass {mass}, moment {moment})")
            }
            PhysicsError::InvalidTimestep(dt) => write!(f, "invalid timestep {dt}"),
            PhysicsError::DegenerateVector => write!(f, "cannot normalize a zero-length vector"),
            PhysicsError::InvalidShape(reason) => write!(f, "invalid shape: {reason}"),
            PhysicsError::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for PhysicsError {}

pub type Result<T> = std::result::Result<T, PhysicsError>;
