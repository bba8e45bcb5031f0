use super::results::{Sample, SimulationResults};

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// Kinds of flight events recoverable from a recorded run.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Commanded power went from zero to nonzero.
    EngineStart { actuator: String },
    /// Commanded power went from nonzero to zero.
    EngineCutoff { actuator: String },
    FuelExhausted,
    Touchdown,
    Custom(String),
}

/// A discrete event that occurred during a run.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Vec<EventKind>;
}

/// Reports power on/off transitions per actuator.
pub struct ThrottleDetector;

impl EventDetector for ThrottleDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Vec<EventKind> {
        let power = |s: &Sample, name: &str| s.command.get(name).map_or(0.0, |sp| sp.power);
        current
            .command
            .iter()
            .filter_map(|(name, sp)| {
                let before = power(prev, name) > 0.0;
                let after = sp.power > 0.0;
                match (before, after) {
                    (false, true) => Some(EventKind::EngineStart { actuator: name.to_owned() }),
                    (true, false) => Some(EventKind::EngineCutoff { actuator: name.to_owned() }),
                    _ => None,
                }
            })
            .collect()
    }
}

/// Reports the tick the tank ran dry.
pub struct FuelDetector;

impl EventDetector for FuelDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Vec<EventKind> {
        if prev.fuel > 0.0 && current.fuel <= 0.0 {
            vec![EventKind::FuelExhausted]
        } else {
            vec![]
        }
    }
}

/// Reports when altitude crosses a threshold (ascending or descending).
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false }
    }

    /// Descending through the ground plane.
    pub fn touchdown() -> Self {
        Self::new(0.0, false)
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Vec<EventKind> {
        if self.fired {
            return vec![];
        }
        let (y0, y1) = (prev.state.position.y, current.state.position.y);
        let crossed = if self.ascending {
            y0 < self.altitude && y1 >= self.altitude
        } else {
            y0 > self.altitude && y1 <= self.altitude
        };
        if !crossed {
            return vec![];
        }
        self.fired = true;
        if !self.ascending && self.altitude == 0.0 {
            vec![EventKind::Touchdown]
        } else {
            vec![EventKind::Custom(format!(
                "Altitude {:.0}m ({})",
                self.altitude,
                if self.ascending { "ascending" } else { "descending" }
            ))]
        }
    }
}

/// Run `detectors` over every consecutive pair of samples.
pub fn detect_events(results: &SimulationResults, detectors: &mut [&mut dyn EventDetector]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in results.samples().windows(2) {
        for det in detectors.iter_mut() {
            for kind in det.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].time, kind });
            }
        }
    }
    events
}

/// Standard detector set: throttle transitions, fuel exhaustion, touchdown.
pub fn flight_events(results: &SimulationResults) -> Vec<SimEvent> {
    let mut throttle = ThrottleDetector;
    let mut fuel = FuelDetector;
    let mut ground = AltitudeDetector::touchdown();
    let mut detectors: [&mut dyn EventDetector; 3] = [&mut throttle, &mut fuel, &mut ground];
    detect_events(results, &mut detectors)
}
