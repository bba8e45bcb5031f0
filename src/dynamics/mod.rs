pub mod body;
pub mod integrator;
pub mod state;

pub use body::{CompositeBody, StepOutput};
pub use integrator::euler_step;
pub use state::{BodyState, SimConfig, WorldState, DEFAULT_DT, EARTH_GRAVITY, G0};
