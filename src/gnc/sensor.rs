use nalgebra::Vector2;
use serde::Serialize;

use crate::dynamics::state::BodyState;

/// Read-only snapshot handed to controllers. Owned copy; writing to it
/// cannot reach the live body.
///
/// Accelerations are those of the most recently completed step (zero before
/// the first step). All values are exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorView {
    state: BodyState,
    acceleration: Vector2<f64>,
    angular_acceleration: f64,
}

impl SensorView {
    pub fn new(state: BodyState, acceleration: Vector2<f64>, angular_acceleration: f64) -> Self {
        Self {
            state,
            acceleration,
            angular_acceleration,
        }
    }

    pub fn position(&self) -> Vector2<f64> {
        self.state.position
    }

    pub fn velocity(&self) -> Vector2<f64> {
        self.state.velocity
    }

    pub fn acceleration(&self) -> Vector2<f64> {
        self.acceleration
    }

    pub fn angle(&self) -> f64 {
        self.state.angle
    }

    pub fn angular_velocity(&self) -> f64 {
        self.state.angular_velocity
    }

    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    pub fn state(&self) -> BodyState {
        self.state
    }

    /// Flat feature vector: x, y, vx, vy, ax, ay, angle, omega, alpha.
    /// The input layout learned controllers are trained against.
    pub fn to_features(&self) -> [f64; 9] {
        [
            self.state.position.x,
            self.state.position.y,
            self.state.velocity.x,
            self.state.velocity.y,
            self.acceleration.x,
            self.acceleration.y,
            self.state.angle,
            self.state.angular_velocity,
            self.angular_acceleration,
        ]
    }
}
