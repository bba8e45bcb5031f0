pub mod dynamics;
pub mod error;
pub mod gnc;
pub mod io;
pub mod sim;
pub mod vehicle;

pub use dynamics::{BodyState, CompositeBody, SimConfig, WorldState};
pub use error::{Result, SimError};
pub use gnc::{ActuatorCommand, ControlStep, SensorView};
pub use sim::{simulate_with, Outcome, SimulationResults, Simulation};
pub use vehicle::{presets, Actuator, BodyBuilder, BodyConfig};
