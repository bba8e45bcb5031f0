use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665; // standard gravity, used for Isp conversion
pub const EARTH_GRAVITY: f64 = -9.81; // m/s^2, world frame +Y up
pub const DEFAULT_DT: f64 = 1.0 / 60.0; // s

// ---------------------------------------------------------------------------
// Rigid-body state (planar)
// ---------------------------------------------------------------------------

/// Planar rigid-body state.
/// Frame: world X right, world Y up, origin at the landing pad.
/// `angle` is measured counter-clockwise from world +Y to the body nose axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vector2<f64>, // m
    pub velocity: Vector2<f64>, // m/s
    pub angle: f64,             // rad
    pub angular_velocity: f64,  // rad/s
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vector2::zeros(),
            velocity: Vector2::zeros(),
            angle: 0.0,
            angular_velocity: 0.0,
        }
    }
}

impl BodyState {
    pub fn at_rest(x: f64, y: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            ..Self::default()
        }
    }

    /// Rotate a body-frame vector into the world frame.
    pub fn to_world(&self, local: &Vector2<f64>) -> Vector2<f64> {
        let (s, c) = self.angle.sin_cos();
        Vector2::new(c * local.x - s * local.y, s * local.x + c * local.y)
    }

    /// Body nose axis (local +Y) in the world frame.
    pub fn forward(&self) -> Vector2<f64> {
        self.to_world(&Vector2::y())
    }
}

// ---------------------------------------------------------------------------
// World: clock, gravity, fixed step
// ---------------------------------------------------------------------------

/// Per-run world parameters. Gravity and `dt` are fixed at construction;
/// only the owning simulation advances `time`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    time: f64,
    gravity: Vector2<f64>,
    dt: f64,
}

impl WorldState {
    pub fn new(gravity: Vector2<f64>, dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SimError::InvalidTimeStep(dt));
        }
        if !(gravity.x.is_finite() && gravity.y.is_finite()) {
            return Err(SimError::InvalidGravity(gravity.x, gravity.y));
        }
        Ok(Self { time: 0.0, gravity, dt })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self> {
        Self::new(config.gravity, config.dt)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn gravity(&self) -> Vector2<f64> {
        self.gravity
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub(crate) fn advance(&mut self) {
        self.time += self.dt;
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub dt: f64,
    pub gravity: Vector2<f64>,
    /// Simulated-time ceiling; `None` runs until the termination predicate holds.
    pub max_time: Option<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,                              // 60 Hz
            gravity: Vector2::new(0.0, EARTH_GRAVITY),
            max_time: Some(300.0),                       // 5 min ceiling
        }
    }
}
