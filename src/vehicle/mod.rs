pub mod actuator;
pub mod config;

pub use actuator::{Actuator, ActuatorKind, Contribution};
pub use config::{presets, ActuatorConfig, ActuatorKindConfig, BodyBuilder, BodyConfig};
