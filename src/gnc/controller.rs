use super::command::ActuatorCommand;
use super::sensor::SensorView;

/// Control logic plugged into the simulation loop.
///
/// Called exactly once per tick, before that tick's physics step. The
/// implementation writes setpoints into `command`, which persists across
/// ticks; anything it leaves untouched keeps its previous value.
pub trait ControlStep {
    fn compute(&mut self, sensors: &SensorView, command: &mut ActuatorCommand, fuel_remaining: f64, dt: f64);

    /// Reset internal state (e.g., PID integrators) before a fresh run.
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Closures work as controllers.
impl<F> ControlStep for F
where
    F: FnMut(&SensorView, &mut ActuatorCommand, f64, f64),
{
    fn compute(&mut self, sensors: &SensorView, command: &mut ActuatorCommand, fuel_remaining: f64, dt: f64) {
        self(sensors, command, fuel_remaining, dt)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Writes nothing. The body flies on whatever setpoints it started with.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullController;

impl ControlStep for NullController {
    fn compute(&mut self, _: &SensorView, _: &mut ActuatorCommand, _: f64, _: f64) {}

    fn name(&self) -> &str {
        "NullController"
    }
}
