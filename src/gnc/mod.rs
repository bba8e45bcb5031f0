pub mod command;
pub mod controller;
pub mod landing;
pub mod neural;
pub mod pid;
pub mod sensor;

pub use command::{ActuatorCommand, Setpoint};
pub use controller::{ControlStep, NullController};
pub use landing::{PidLanding, ScriptPhase, ScriptedLanding};
pub use neural::NeuralLanding;
pub use pid::Pid;
pub use sensor::SensorView;
