use nalgebra::Vector2;
use serde::Serialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Actuator kinds
// ---------------------------------------------------------------------------

/// Kind-specific actuator parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ActuatorKind {
    /// Gimballed main engine. Thrust along body +Y, deflected by the gimbal.
    MainEngine {
        max_thrust: f64,    // N
        gimbal_limit: f64,  // rad, symmetric
        ignition_time: f64, // s, OFF -> commanded power ramp
        min_power: f64,     // lowest nonzero throttle, [0, max_power]
        max_power: f64,     // throttle ceiling, (0, 1]
    },
    /// Fixed-direction reaction control thruster.
    Rcs {
        max_force: f64,          // N
        direction: Vector2<f64>, // unit thrust direction, body frame
    },
}

/// Force and torque produced by one actuator, body frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub force: Vector2<f64>, // N
    pub torque: f64,         // N*m, about the center of mass
}

impl Contribution {
    pub fn zero() -> Self {
        Self { force: Vector2::zeros(), torque: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Ignition {
    Off,
    Ramping { elapsed: f64 },
    Running,
}

// ---------------------------------------------------------------------------
// Actuator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Actuator {
    name: String,
    kind: ActuatorKind,
    offset: Vector2<f64>, // mounting point relative to CG, body frame, m
    fuel_rate: f64,       // kg per N*s of delivered impulse
    power: f64,
    gimbal: f64,
    ignition: Ignition,
}

impl Actuator {
    pub fn new(name: impl Into<String>, kind: ActuatorKind, offset: Vector2<f64>, fuel_rate: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            offset,
            fuel_rate,
            power: 0.0,
            gimbal: 0.0,
            ignition: Ignition::Off,
        }
    }

    pub fn main_engine(
        name: impl Into<String>,
        offset: Vector2<f64>,
        max_thrust: f64,
        gimbal_limit: f64,
        ignition_time: f64,
        fuel_rate: f64,
    ) -> Self {
        let kind = ActuatorKind::MainEngine {
            max_thrust,
            gimbal_limit,
            ignition_time,
            min_power: 0.0,
            max_power: 1.0,
        };
        Self::new(name, kind, offset, fuel_rate)
    }

    pub fn rcs(
        name: impl Into<String>,
        offset: Vector2<f64>,
        max_force: f64,
        direction: Vector2<f64>,
        fuel_rate: f64,
    ) -> Self {
        let direction = direction.try_normalize(1e-12).unwrap_or_else(Vector2::zeros);
        Self::new(name, ActuatorKind::Rcs { max_force, direction }, offset, fuel_rate)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ActuatorKind {
        &self.kind
    }

    pub fn offset(&self) -> Vector2<f64> {
        self.offset
    }

    pub fn fuel_rate(&self) -> f64 {
        self.fuel_rate
    }

    /// Commanded power after clamping.
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Commanded gimbal after clamping, rad.
    pub fn gimbal(&self) -> f64 {
        self.gimbal
    }

    pub fn is_igniting(&self) -> bool {
        matches!(self.ignition, Ignition::Ramping { .. })
    }

    pub fn max_output(&self) -> f64 {
        match self.kind {
            ActuatorKind::MainEngine { max_thrust, .. } => max_thrust,
            ActuatorKind::Rcs { max_force, .. } => max_force,
        }
    }

    // -----------------------------------------------------------------------
    // Setpoints
    // -----------------------------------------------------------------------

    /// Set commanded power. Out-of-range values are clamped, NaN reads as off.
    pub fn set_power(&mut self, power: f64) {
        let power = self.constrain_power(power);

        if power == 0.0 {
            self.power = 0.0;
            self.ignition = Ignition::Off;
            return;
        }

        self.power = power;
        if self.ignition == Ignition::Off {
            self.ignition = match self.kind {
                ActuatorKind::MainEngine { ignition_time, .. } if ignition_time > 0.0 => {
                    debug!(actuator = %self.name, power, ignition_time, "ignition started");
                    Ignition::Ramping { elapsed: 0.0 }
                }
                _ => Ignition::Running,
            };
        }
    }

    /// Set commanded gimbal. Clamped to the gimbal limit; RCS ignores it.
    pub fn set_gimbal(&mut self, gimbal: f64) {
        self.gimbal = match self.kind {
            ActuatorKind::MainEngine { gimbal_limit, .. } if !gimbal.is_nan() => {
                gimbal.clamp(-gimbal_limit, gimbal_limit)
            }
            _ => 0.0,
        };
    }

    fn constrain_power(&self, power: f64) -> f64 {
        if power.is_nan() {
            return 0.0;
        }
        match self.kind {
            ActuatorKind::MainEngine { min_power, max_power, .. } => {
                let max_power = max_power.clamp(0.0, 1.0);
                let power = power.clamp(0.0, max_power);
                if power > 0.0 && power < min_power {
                    min_power.min(max_power)
                } else {
                    power
                }
            }
            ActuatorKind::Rcs { .. } => power.clamp(0.0, 1.0),
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Power actually delivered this tick, including the ignition ramp.
    pub fn delivered_power(&self) -> f64 {
        match (self.ignition, &self.kind) {
            (Ignition::Off, _) => 0.0,
            (Ignition::Running, _) => self.power,
            (Ignition::Ramping { elapsed }, ActuatorKind::MainEngine { ignition_time, .. }) => {
                self.power * (elapsed / ignition_time).min(1.0)
            }
            (Ignition::Ramping { .. }, ActuatorKind::Rcs { .. }) => self.power,
        }
    }

    /// Body-frame force and torque at the current setpoint.
    /// An unfueled actuator contributes nothing regardless of its command.
    pub fn contribution(&self, fueled: bool) -> Contribution {
        if !fueled {
            return Contribution::zero();
        }

        let force = match self.kind {
            ActuatorKind::MainEngine { max_thrust, .. } => {
                let thrust = max_thrust * self.delivered_power();
                let (s, c) = self.gimbal.sin_cos();
                Vector2::new(-thrust * s, thrust * c)
            }
            ActuatorKind::Rcs { max_force, direction } => direction * (max_force * self.delivered_power()),
        };

        Contribution {
            force,
            torque: self.offset.x * force.y - self.offset.y * force.x,
        }
    }

    /// Propellant drawn to deliver `contribution` for `dt` seconds.
    pub fn fuel_burn(&self, contribution: &Contribution, dt: f64) -> f64 {
        contribution.force.norm() * self.fuel_rate * dt
    }

    /// Advance the ignition ramp by one tick.
    pub(crate) fn advance(&mut self, dt: f64) {
        if let (Ignition::Ramping { elapsed }, ActuatorKind::MainEngine { ignition_time, .. }) =
            (self.ignition, &self.kind)
        {
            let elapsed = elapsed + dt;
            if elapsed >= ignition_time - 1e-9 {
                debug!(actuator = %self.name, "ignition complete");
                self.ignition = Ignition::Running;
            } else {
                self.ignition = Ignition::Ramping { elapsed };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raptor() -> Actuator {
        Actuator::main_engine("Raptor", Vector2::new(0.0, -20.0), 1000.0, 0.25, 1.0, 0.0)
    }

    #[test]
    fn power_is_clamped() {
        let mut a = raptor();
        a.set_power(3.0);
        assert_eq!(a.power(), 1.0);
        a.set_power(-2.0);
        assert_eq!(a.power(), 0.0);
        a.set_power(f64::NAN);
        assert_eq!(a.power(), 0.0);
    }

    #[test]
    fn min_power_floor() {
        let mut a = Actuator::new(
            "Raptor",
            ActuatorKind::MainEngine {
                max_thrust: 1000.0,
                gimbal_limit: 0.2,
                ignition_time: 0.0,
                min_power: 0.4,
                max_power: 0.9,
            },
            Vector2::zeros(),
            0.0,
        );
        a.set_power(0.1);
        assert_eq!(a.power(), 0.4);
        a.set_power(0.0);
        assert_eq!(a.power(), 0.0);
        a.set_power(0.6);
        assert_eq!(a.power(), 0.6);
        a.set_power(1.0);
        assert_eq!(a.power(), 0.9, "capped at max_power");
        assert!((a.contribution(true).force.y - 900.0).abs() < 1e-9);
    }

    #[test]
    fn gimbal_clamped_and_rcs_has_none() {
        let mut a = raptor();
        a.set_gimbal(1.0);
        assert_eq!(a.gimbal(), 0.25);
        a.set_gimbal(-1.0);
        assert_eq!(a.gimbal(), -0.25);

        let mut r = Actuator::rcs("RCS", Vector2::new(-4.0, 20.0), 100.0, Vector2::x(), 0.0);
        r.set_gimbal(0.5);
        assert_eq!(r.gimbal(), 0.0);
    }

    #[test]
    fn ramp_from_off() {
        let mut a = raptor();
        a.set_power(1.0);
        assert!(a.is_igniting());
        assert_eq!(a.delivered_power(), 0.0);
        a.advance(0.5);
        assert!((a.delivered_power() - 0.5).abs() < 1e-12);
        a.advance(0.5);
        assert!(!a.is_igniting());
        assert_eq!(a.delivered_power(), 1.0);
        // Throttle changes while running apply instantly
        a.set_power(0.6);
        assert_eq!(a.delivered_power(), 0.6);
    }

    #[test]
    fn zero_command_restarts_the_ramp() {
        let mut a = Actuator::main_engine("Raptor", Vector2::new(0.0, -20.0), 1000.0, 0.25, 0.5, 0.0);
        let powers = [1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0];
        let thrust: Vec<f64> = powers
            .iter()
            .map(|&p| {
                a.set_power(p);
                let t = a.contribution(true).force.norm();
                a.advance(0.25);
                t
            })
            .collect();

        let expected = [0.0, 500.0, 1000.0, 1000.0, 0.0, 0.0, 500.0, 1000.0];
        for (got, want) in thrust.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "thrust profile {:?}", thrust);
        }
    }

    #[test]
    fn unfueled_actuator_is_silent() {
        let mut r = Actuator::rcs("RCS", Vector2::new(-4.0, 20.0), 100.0, Vector2::x(), 0.0);
        r.set_power(1.0);
        let c = r.contribution(false);
        assert_eq!(c.force, Vector2::zeros());
        assert_eq!(c.torque, 0.0);
    }

    #[test]
    fn rcs_torque_is_offset_cross_force() {
        let mut r = Actuator::rcs("RCS TL", Vector2::new(-4.0, 20.0), 100.0, Vector2::x(), 0.0);
        r.set_power(1.0);
        let c = r.contribution(true);
        assert!((c.force.x - 100.0).abs() < 1e-12);
        // r x F = (-4)(0) - (20)(100)
        assert!((c.torque + 2000.0).abs() < 1e-9);
    }

    #[test]
    fn gimbal_deflects_thrust() {
        let mut a = Actuator::main_engine("Raptor", Vector2::new(0.0, -20.0), 1000.0, 0.25, 0.0, 0.0);
        a.set_power(1.0);
        a.set_gimbal(0.25);
        let c = a.contribution(true);
        assert!((c.force.x + 1000.0 * 0.25_f64.sin()).abs() < 1e-9);
        assert!((c.force.y - 1000.0 * 0.25_f64.cos()).abs() < 1e-9);
        // Nozzle below CG pushed to -X swings the nose clockwise
        assert!((c.torque + 20_000.0 * 0.25_f64.sin()).abs() < 1e-9);
    }
}
