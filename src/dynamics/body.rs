use std::collections::HashSet;

use nalgebra::Vector2;
use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::gnc::{ActuatorCommand, SensorView};
use crate::vehicle::{Actuator, BodyConfig};
use super::integrator::euler_step;
use super::state::{BodyState, WorldState};

// ---------------------------------------------------------------------------
// Composite rigid body: structure + propellant + actuators
// ---------------------------------------------------------------------------

/// Net loads and propellant use of one completed step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    pub net_force: Vector2<f64>, // N, world frame, gravity included
    pub net_torque: f64,         // N*m
    pub fuel_burned: f64,        // kg
}

#[derive(Debug, Clone)]
pub struct CompositeBody {
    name: String,
    dry_mass: f64,
    inertia_factor: f64,
    fuel: f64,
    actuators: Vec<Actuator>,
    state: BodyState,
    acceleration: Vector2<f64>,
    angular_acceleration: f64,
}

impl CompositeBody {
    pub fn new(
        name: impl Into<String>,
        dry_mass: f64,
        inertia_factor: f64,
        fuel: f64,
        actuators: Vec<Actuator>,
        state: BodyState,
    ) -> Result<Self> {
        if !(dry_mass.is_finite() && dry_mass > 0.0) {
            return Err(SimError::InvalidMass(dry_mass));
        }
        if !(inertia_factor.is_finite() && inertia_factor > 0.0) {
            return Err(SimError::InvalidInertia(inertia_factor));
        }
        if !(fuel.is_finite() && fuel >= 0.0) {
            return Err(SimError::InvalidFuel(fuel));
        }
        let mut seen = HashSet::new();
        for a in &actuators {
            if !seen.insert(a.name()) {
                return Err(SimError::DuplicateActuator(a.name().to_owned()));
            }
        }

        Ok(Self {
            name: name.into(),
            dry_mass,
            inertia_factor,
            fuel,
            actuators,
            state,
            acceleration: Vector2::zeros(),
            angular_acceleration: 0.0,
        })
    }

    pub fn from_config(config: &BodyConfig) -> Result<Self> {
        let actuators = config
            .actuators
            .iter()
            .map(|a| a.build())
            .collect::<Result<Vec<_>>>()?;
        Self::new(
            config.name.clone(),
            config.dry_mass,
            config.inertia_factor,
            config.fuel,
            actuators,
            config.initial_state(),
        )
    }

    // -----------------------------------------------------------------------
    // Mass properties
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dry_mass(&self) -> f64 {
        self.dry_mass
    }

    pub fn fuel_remaining(&self) -> f64 {
        self.fuel
    }

    /// Current mass: dry mass plus remaining propellant.
    pub fn mass(&self) -> f64 {
        self.dry_mass + self.fuel
    }

    /// Moment of inertia about the CG; scales with mass.
    pub fn inertia(&self) -> f64 {
        self.inertia_factor * self.mass()
    }

    // -----------------------------------------------------------------------
    // State access (copies)
    // -----------------------------------------------------------------------

    pub fn state(&self) -> BodyState {
        self.state
    }

    pub fn acceleration(&self) -> Vector2<f64> {
        self.acceleration
    }

    pub fn angular_acceleration(&self) -> f64 {
        self.angular_acceleration
    }

    pub fn sensor_view(&self) -> SensorView {
        SensorView::new(self.state, self.acceleration, self.angular_acceleration)
    }

    pub fn actuators(&self) -> &[Actuator] {
        &self.actuators
    }

    pub fn actuator(&self, name: &str) -> Option<&Actuator> {
        self.actuators.iter().find(|a| a.name() == name)
    }

    // -----------------------------------------------------------------------
    // Command + step
    // -----------------------------------------------------------------------

    /// Latch setpoints for the actuators named in `cmd`. Others keep theirs.
    pub fn apply_command(&mut self, cmd: &ActuatorCommand) {
        for (name, sp) in cmd.iter() {
            match self.actuators.iter_mut().find(|a| a.name() == name) {
                Some(actuator) => {
                    actuator.set_power(sp.power);
                    actuator.set_gimbal(sp.gimbal);
                }
                None => debug!(body = %self.name, actuator = name, "command for unknown actuator ignored"),
            }
        }
    }

    /// Net world-frame force (gravity included) and torque at the current
    /// state and setpoints.
    pub fn net_loads(&self, world: &WorldState) -> (Vector2<f64>, f64) {
        let (force, torque, _) = self.aggregate(world);
        (force, torque)
    }

    /// Sum actuator contributions in the world frame, plus gravity, along
    /// with the propellant the step would draw.
    fn aggregate(&self, world: &WorldState) -> (Vector2<f64>, f64, f64) {
        let fueled = self.fuel > 0.0;
        let mut force = world.gravity() * self.mass();
        let mut torque = 0.0;
        let mut demand = 0.0;
        for actuator in &self.actuators {
            let c = actuator.contribution(fueled);
            force += self.state.to_world(&c.force);
            torque += c.torque;
            demand += actuator.fuel_burn(&c, world.dt());
        }
        (force, torque, demand)
    }

    /// Advance one fixed step.
    ///
    /// Loads are computed from the pre-step state and mass; propellant burned
    /// this step only changes the mass seen by the next one.
    pub fn step(&mut self, world: &WorldState) -> StepOutput {
        let dt = world.dt();
        let fueled = self.fuel > 0.0;
        let mass = self.mass();
        let inertia = self.inertia();

        let (net_force, net_torque, demand) = self.aggregate(world);

        self.state = euler_step(&self.state, &net_force, net_torque, mass, inertia, dt);
        self.acceleration = net_force / mass;
        self.angular_acceleration = net_torque / inertia;

        let fuel_burned = demand.min(self.fuel);
        self.fuel = (self.fuel - fuel_burned).max(0.0);
        if fueled && self.fuel <= 0.0 {
            warn!(body = %self.name, time = world.time(), "fuel exhausted, continuing ballistic");
        }

        for actuator in &mut self.actuators {
            actuator.advance(dt);
        }

        StepOutput {
            net_force,
            net_torque,
            fuel_burned,
        }
    }
}
