use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::dynamics::state::{BodyState, G0};
use crate::error::{Result, SimError};
use super::actuator::{Actuator, ActuatorKind};

// ---------------------------------------------------------------------------
// Body / actuator descriptors (config provider output)
// ---------------------------------------------------------------------------

/// Construction inputs for one body. Angles are in degrees on disk and
/// converted to radians by [`BodyConfig::initial_state`] and
/// [`ActuatorConfig::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub dry_mass: f64,       // kg
    pub fuel: f64,           // kg at start
    pub inertia_factor: f64, // m^2, inertia = factor * mass
    #[serde(default = "zero_vec")]
    pub position: Vector2<f64>,
    #[serde(default = "zero_vec")]
    pub velocity: Vector2<f64>,
    #[serde(default)]
    pub angle_deg: f64,
    #[serde(default)]
    pub angular_velocity: f64, // rad/s
    #[serde(default)]
    pub actuators: Vec<ActuatorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    pub name: String,
    pub offset: Vector2<f64>, // m from CG, body frame
    /// Explicit propellant draw, kg per N*s. Takes precedence over `isp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<f64>, // s
    #[serde(flatten)]
    pub kind: ActuatorKindConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActuatorKindConfig {
    MainEngine {
        max_thrust: f64,
        #[serde(default)]
        gimbal_limit_deg: f64,
        #[serde(default)]
        ignition_time: f64,
        #[serde(default)]
        min_power: f64,
        #[serde(default = "full_power")]
        max_power: f64,
    },
    Rcs {
        max_force: f64,
        direction: Vector2<f64>,
    },
}

fn zero_vec() -> Vector2<f64> {
    Vector2::zeros()
}

fn full_power() -> f64 {
    1.0
}

impl BodyConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn initial_state(&self) -> BodyState {
        BodyState {
            position: self.position,
            velocity: self.velocity,
            angle: self.angle_deg.to_radians(),
            angular_velocity: self.angular_velocity,
        }
    }

    /// Wet mass at start.
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.fuel
    }
}

impl ActuatorConfig {
    /// Propellant draw per N*s: explicit rate, else 1 / (Isp * g0), else zero.
    pub fn consumption_rate(&self) -> Result<f64> {
        match (self.fuel_rate, self.isp) {
            (Some(rate), _) => Ok(rate),
            (None, Some(isp)) if isp > 0.0 && isp.is_finite() => Ok(1.0 / (isp * G0)),
            (None, Some(isp)) => Err(self.invalid(format!("isp must be > 0, got {isp}"))),
            (None, None) => Ok(0.0),
        }
    }

    pub fn build(&self) -> Result<Actuator> {
        let rate = self.consumption_rate()?;
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(self.invalid(format!("fuel_rate must be >= 0, got {rate}")));
        }

        let kind = match self.kind {
            ActuatorKindConfig::MainEngine {
                max_thrust,
                gimbal_limit_deg,
                ignition_time,
                min_power,
                max_power,
            } => {
                check_non_negative(self, "max_thrust", max_thrust)?;
                check_non_negative(self, "gimbal_limit_deg", gimbal_limit_deg)?;
                check_non_negative(self, "ignition_time", ignition_time)?;
                if !(max_power > 0.0 && max_power <= 1.0) {
                    return Err(self.invalid(format!("max_power must be in (0, 1], got {max_power}")));
                }
                if !(0.0..=max_power).contains(&min_power) {
                    return Err(self.invalid(format!("min_power must be in [0, {max_power}], got {min_power}")));
                }
                ActuatorKind::MainEngine {
                    max_thrust,
                    gimbal_limit: gimbal_limit_deg.to_radians(),
                    ignition_time,
                    min_power,
                    max_power,
                }
            }
            ActuatorKindConfig::Rcs { max_force, direction } => {
                check_non_negative(self, "max_force", max_force)?;
                let direction = direction
                    .try_normalize(1e-12)
                    .ok_or_else(|| self.invalid("direction must be a nonzero vector".into()))?;
                ActuatorKind::Rcs { max_force, direction }
            }
        };

        Ok(Actuator::new(self.name.clone(), kind, self.offset, rate))
    }

    fn invalid(&self, reason: String) -> SimError {
        SimError::InvalidActuator {
            name: self.name.clone(),
            reason,
        }
    }
}

fn check_non_negative(cfg: &ActuatorConfig, field: &str, v: f64) -> Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(cfg.invalid(format!("{field} must be >= 0, got {v}")))
    }
}

// ---------------------------------------------------------------------------
// Body builder
// ---------------------------------------------------------------------------

pub struct BodyBuilder {
    config: BodyConfig,
}

impl BodyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: BodyConfig {
                name: name.into(),
                dry_mass: 1000.0,
                fuel: 0.0,
                inertia_factor: 1.0,
                position: Vector2::zeros(),
                velocity: Vector2::zeros(),
                angle_deg: 0.0,
                angular_velocity: 0.0,
                actuators: vec![],
            },
        }
    }

    pub fn dry_mass(mut self, v: f64) -> Self { self.config.dry_mass = v; self }
    pub fn fuel(mut self, v: f64) -> Self { self.config.fuel = v; self }
    pub fn inertia_factor(mut self, v: f64) -> Self { self.config.inertia_factor = v; self }
    pub fn position(mut self, x: f64, y: f64) -> Self { self.config.position = Vector2::new(x, y); self }
    pub fn velocity(mut self, vx: f64, vy: f64) -> Self { self.config.velocity = Vector2::new(vx, vy); self }
    pub fn angle_deg(mut self, v: f64) -> Self { self.config.angle_deg = v; self }
    pub fn angular_velocity(mut self, v: f64) -> Self { self.config.angular_velocity = v; self }

    #[allow(clippy::too_many_arguments)]
    pub fn main_engine(
        mut self,
        name: impl Into<String>,
        offset: (f64, f64),
        max_thrust: f64,
        gimbal_limit_deg: f64,
        ignition_time: f64,
        min_power: f64,
        isp: f64,
    ) -> Self {
        self.config.actuators.push(ActuatorConfig {
            name: name.into(),
            offset: Vector2::new(offset.0, offset.1),
            fuel_rate: None,
            isp: Some(isp),
            kind: ActuatorKindConfig::MainEngine {
                max_thrust,
                gimbal_limit_deg,
                ignition_time,
                min_power,
                max_power: 1.0,
            },
        });
        self
    }

    pub fn rcs(
        mut self,
        name: impl Into<String>,
        offset: (f64, f64),
        max_force: f64,
        direction: (f64, f64),
        isp: f64,
    ) -> Self {
        self.config.actuators.push(ActuatorConfig {
            name: name.into(),
            offset: Vector2::new(offset.0, offset.1),
            fuel_rate: None,
            isp: Some(isp),
            kind: ActuatorKindConfig::Rcs {
                max_force,
                direction: Vector2::new(direction.0, direction.1),
            },
        });
        self
    }

    pub fn actuator(mut self, actuator: ActuatorConfig) -> Self {
        self.config.actuators.push(actuator);
        self
    }

    pub fn build(self) -> BodyConfig {
        self.config
    }
}

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    pub const RAPTOR_LEFT: &str = "Raptor 1";
    pub const RAPTOR_RIGHT: &str = "Raptor 2";
    pub const RCS_TOP_LEFT: &str = "RCS TL";
    pub const RCS_TOP_RIGHT: &str = "RCS TR";
    pub const RCS_BOTTOM_LEFT: &str = "RCS BL";
    pub const RCS_BOTTOM_RIGHT: &str = "RCS BR";

    /// Starship on final approach: 500 m up, drifting, belly-flop recovered.
    ///
    /// Two gimballed Raptors under the CG and four RCS pods, each pushing
    /// away from the side it is mounted on.
    pub fn starship() -> BodyConfig {
        BodyBuilder::new("Starship")
            .dry_mass(100_000.0)
            .fuel(20_000.0)
            .inertia_factor(150.0)
            .position(0.0, 500.0)
            .velocity(0.0, -50.0)
            .angle_deg(0.0)
            .main_engine(RAPTOR_LEFT, (-2.0, -22.0), 2_200_000.0, 15.0, 0.5, 0.4, 330.0)
            .main_engine(RAPTOR_RIGHT, (2.0, -22.0), 2_200_000.0, 15.0, 0.5, 0.4, 330.0)
            .rcs(RCS_TOP_LEFT, (-4.5, 20.0), 20_000.0, (1.0, 0.0), 250.0)
            .rcs(RCS_TOP_RIGHT, (4.5, 20.0), 20_000.0, (-1.0, 0.0), 250.0)
            .rcs(RCS_BOTTOM_LEFT, (-4.5, -20.0), 20_000.0, (1.0, 0.0), 250.0)
            .rcs(RCS_BOTTOM_RIGHT, (4.5, -20.0), 20_000.0, (-1.0, 0.0), 250.0)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_and_degrees() {
        let json = r#"{
            "name": "Hopper",
            "dry_mass": 500.0,
            "fuel": 100.0,
            "inertia_factor": 4.0,
            "position": [0.0, 10.0],
            "angle_deg": 90.0,
            "actuators": [
                { "name": "Main", "type": "main_engine", "offset": [0.0, -2.0],
                  "max_thrust": 8000.0, "gimbal_limit_deg": 10.0, "isp": 300.0 },
                { "name": "Side", "type": "rcs", "offset": [0.5, 1.0],
                  "max_force": 50.0, "direction": [-2.0, 0.0], "fuel_rate": 0.001 }
            ]
        }"#;
        let cfg = BodyConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.velocity, Vector2::zeros());
        assert!((cfg.initial_state().angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let main = cfg.actuators[0].build().unwrap();
        match main.kind() {
            ActuatorKind::MainEngine { gimbal_limit, ignition_time, min_power, max_power, .. } => {
                assert!((gimbal_limit - 10.0_f64.to_radians()).abs() < 1e-12);
                assert_eq!(*ignition_time, 0.0);
                assert_eq!((*min_power, *max_power), (0.0, 1.0));
            }
            other => panic!("expected main engine, got {:?}", other),
        }
        assert!((main.fuel_rate() - 1.0 / (300.0 * G0)).abs() < 1e-15);

        let side = cfg.actuators[1].build().unwrap();
        match side.kind() {
            ActuatorKind::Rcs { direction, .. } => assert!((direction.x + 1.0).abs() < 1e-12),
            other => panic!("expected rcs, got {:?}", other),
        }
        assert_eq!(side.fuel_rate(), 0.001);
    }

    #[test]
    fn bad_actuator_rejected() {
        let bad = ActuatorConfig {
            name: "Broken".into(),
            offset: Vector2::zeros(),
            fuel_rate: None,
            isp: Some(0.0),
            kind: ActuatorKindConfig::Rcs {
                max_force: 10.0,
                direction: Vector2::x(),
            },
        };
        assert!(matches!(bad.build(), Err(SimError::InvalidActuator { .. })));

        let zero_dir = ActuatorConfig {
            isp: None,
            kind: ActuatorKindConfig::Rcs {
                max_force: 10.0,
                direction: Vector2::zeros(),
            },
            ..bad
        };
        assert!(zero_dir.build().is_err());

        let engine = |min_power: f64, max_power: f64| ActuatorConfig {
            name: "Throttled".into(),
            offset: Vector2::zeros(),
            fuel_rate: Some(0.0),
            isp: None,
            kind: ActuatorKindConfig::MainEngine {
                max_thrust: 1000.0,
                gimbal_limit_deg: 0.0,
                ignition_time: 0.0,
                min_power,
                max_power,
            },
        };
        assert!(engine(0.4, 0.8).build().is_ok());
        assert!(engine(0.9, 0.8).build().is_err(), "floor above ceiling");
        assert!(engine(0.0, 0.0).build().is_err());
        assert!(engine(0.0, 1.5).build().is_err());
    }

    #[test]
    fn preset_round_trips_through_json() {
        let cfg = presets::starship();
        let text = cfg.to_json_string().unwrap();
        let back = BodyConfig::from_json_str(&text).unwrap();
        assert_eq!(back, cfg);
        assert_eq!(back.actuators.len(), 6);
    }
}
