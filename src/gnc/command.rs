use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Requested output for one actuator. Not validated; the actuator clamps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Setpoint {
    pub power: f64,  // [0, 1] nominal
    pub gimbal: f64, // rad
}

/// Setpoints keyed by actuator name, written by a controller each tick.
///
/// Ordered by name so recorded commands serialize identically across runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActuatorCommand {
    setpoints: BTreeMap<String, Setpoint>,
}

impl ActuatorCommand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, power: f64, gimbal: f64) {
        self.setpoints.insert(name.to_owned(), Setpoint { power, gimbal });
    }

    /// Update power, keeping any gimbal already requested for `name`.
    pub fn set_power(&mut self, name: &str, power: f64) {
        self.setpoints.entry(name.to_owned()).or_default().power = power;
    }

    /// Update gimbal, keeping any power already requested for `name`.
    pub fn set_gimbal(&mut self, name: &str, gimbal: f64) {
        self.setpoints.entry(name.to_owned()).or_default().gimbal = gimbal;
    }

    pub fn get(&self, name: &str) -> Option<&Setpoint> {
        self.setpoints.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setpoint)> {
        self.setpoints.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.setpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setpoints.is_empty()
    }
}
