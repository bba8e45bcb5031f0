pub mod event;
pub mod results;
pub mod runner;
pub mod termination;

pub use event::{detect_events, flight_events, EventDetector, EventKind, SimEvent};
pub use results::{Outcome, Property, Sample, SimulationResults};
pub use runner::{simulate_with, Phase, Simulation};
pub use termination::{landing_zone, touchdown, DEFAULT_ZONE_HALF_WIDTH};
