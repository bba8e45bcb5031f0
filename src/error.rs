use thiserror::Error;

/// Errors raised while building or driving a simulation.
///
/// Only structurally invalid inputs end up here. Physically out-of-range
/// commands are clamped and fuel exhaustion degrades to zero thrust.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid mass: {0} kg (must be finite and > 0)")]
    InvalidMass(f64),

    #[error("invalid inertia factor: {0} m^2 (must be finite and > 0)")]
    InvalidInertia(f64),

    #[error("invalid time step: {0} s (must be finite and > 0)")]
    InvalidTimeStep(f64),

    #[error("invalid fuel load: {0} kg (must be finite and >= 0)")]
    InvalidFuel(f64),

    #[error("invalid gravity vector: ({0}, {1})")]
    InvalidGravity(f64, f64),

    #[error("duplicate actuator name: {0}")]
    DuplicateActuator(String),

    #[error("invalid actuator {name}: {reason}")]
    InvalidActuator { name: String, reason: String },

    #[error("weight vector has {got} values, network needs {expected}")]
    WeightCount { expected: usize, got: usize },

    #[error("time {time} s is outside the recorded span [{start}, {end}]")]
    OutOfRange { time: f64, start: f64, end: f64 },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
