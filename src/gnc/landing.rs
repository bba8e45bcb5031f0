use tracing::{debug, info};

use crate::vehicle::presets::{
    RAPTOR_LEFT, RAPTOR_RIGHT, RCS_BOTTOM_LEFT, RCS_BOTTOM_RIGHT, RCS_TOP_LEFT, RCS_TOP_RIGHT,
};
use super::command::ActuatorCommand;
use super::controller::ControlStep;
use super::pid::Pid;
use super::sensor::SensorView;

// Actuator names default to the Starship preset layout.

fn fire_rcs(cmd: &mut ActuatorCommand, ccw: bool, cw: bool) {
    // TR + BL spin the body counter-clockwise, TL + BR clockwise
    let ccw = if ccw { 1.0 } else { 0.0 };
    let cw = if cw { 1.0 } else { 0.0 };
    cmd.set_power(RCS_TOP_RIGHT, ccw);
    cmd.set_power(RCS_BOTTOM_LEFT, ccw);
    cmd.set_power(RCS_TOP_LEFT, cw);
    cmd.set_power(RCS_BOTTOM_RIGHT, cw);
}

// ---------------------------------------------------------------------------
// Scripted landing: altitude trigger, timed gimbal kicks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPhase {
    Coast,
    Kick,
    Counter,
    Final,
}

/// Open-loop landing script.
///
/// Coasts until `trigger_height`, then lights both engines with a gimbal
/// kick and clockwise RCS, reverses the gimbal after `kick_time`, and after
/// `counter_time` centres the gimbals for the final burn.
#[derive(Debug, Clone)]
pub struct ScriptedLanding {
    pub trigger_height: f64, // m
    pub trigger_power: f64,  // [0, 1]
    pub kick_gimbal: f64,    // rad
    pub kick_time: f64,      // s
    pub counter_time: f64,   // s
    pub final_power: f64,    // [0, 1]
    phase: ScriptPhase,
    timer: f64,
}

impl ScriptedLanding {
    pub fn new() -> Self {
        Self {
            trigger_height: 275.0,
            trigger_power: 0.8,
            kick_gimbal: 15.0_f64.to_radians(),
            kick_time: 2.25,
            counter_time: 1.5,
            final_power: 1.0,
            phase: ScriptPhase::Coast,
            timer: 0.0,
        }
    }

    pub fn phase(&self) -> ScriptPhase {
        self.phase
    }

    fn enter(&mut self, phase: ScriptPhase) {
        debug!(from = ?self.phase, to = ?phase, "script phase change");
        self.phase = phase;
        self.timer = 0.0;
    }
}

impl Default for ScriptedLanding {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStep for ScriptedLanding {
    fn compute(&mut self, sensors: &SensorView, cmd: &mut ActuatorCommand, fuel_remaining: f64, dt: f64) {
        match self.phase {
            ScriptPhase::Coast if sensors.position().y <= self.trigger_height => {
                for engine in [RAPTOR_LEFT, RAPTOR_RIGHT] {
                    cmd.set(engine, self.trigger_power, self.kick_gimbal);
                }
                cmd.set_power(RCS_BOTTOM_LEFT, 1.0);
                cmd.set_power(RCS_TOP_LEFT, 1.0);
                self.enter(ScriptPhase::Kick);
            }
            ScriptPhase::Kick if self.timer > self.kick_time => {
                cmd.set_gimbal(RAPTOR_LEFT, -self.kick_gimbal);
                cmd.set_gimbal(RAPTOR_RIGHT, -self.kick_gimbal);
                self.enter(ScriptPhase::Counter);
            }
            ScriptPhase::Counter if self.timer > self.counter_time => {
                cmd.set(RAPTOR_LEFT, self.final_power, 0.0);
                cmd.set(RAPTOR_RIGHT, 0.0, 0.0);
                self.enter(ScriptPhase::Final);
            }
            _ => {}
        }

        if self.phase != ScriptPhase::Coast {
            self.timer += dt;
        }
        if fuel_remaining <= 0.0 {
            debug!("script running dry");
        }
    }

    fn reset(&mut self) {
        self.phase = ScriptPhase::Coast;
        self.timer = 0.0;
    }

    fn name(&self) -> &str {
        "ScriptedLanding"
    }
}

// ---------------------------------------------------------------------------
// PID landing: attitude via gimbal + RCS, descent rate via throttle
// ---------------------------------------------------------------------------

/// Closed-loop landing controller.
///
/// Guidance picks a descent rate that shrinks with altitude and a tilt that
/// cancels lateral drift; two PIDs track them.
#[derive(Debug, Clone)]
pub struct PidLanding {
    pub attitude_pid: Pid,
    pub descent_pid: Pid,
    pub max_tilt: f64,          // rad
    pub max_gimbal: f64,        // rad
    pub rcs_deadband: f64,      // attitude effort below which RCS stays off
    pub hover_throttle: f64,    // feed-forward
    pub descent_gain: f64,      // 1/s, desired sink rate per metre of altitude
    pub min_descent_rate: f64,  // m/s
    pub max_descent_rate: f64,  // m/s
    pub drift_position_gain: f64,
    pub drift_velocity_gain: f64,
    pub ignition_altitude: f64, // m; engines stay off above
    ignited: bool,
}

impl PidLanding {
    pub fn new() -> Self {
        Self {
            // Tuned for the Starship preset
            attitude_pid: Pid::new(2.0, 0.05, 1.5),
            descent_pid: Pid::new(0.08, 0.02, 0.0).with_integral_limit(5.0),
            max_tilt: 10.0_f64.to_radians(),
            max_gimbal: 15.0_f64.to_radians(),
            rcs_deadband: 0.02,
            hover_throttle: 0.27,
            descent_gain: 0.12,
            min_descent_rate: 1.0,
            max_descent_rate: 60.0,
            drift_position_gain: 0.002,
            drift_velocity_gain: 0.02,
            ignition_altitude: 400.0,
            ignited: false,
        }
    }

    /// Desired vertical velocity (negative = down) at altitude `y`.
    pub fn target_descent_rate(&self, y: f64) -> f64 {
        -(self.descent_gain * y.max(0.0)).clamp(self.min_descent_rate, self.max_descent_rate)
    }

    /// Desired attitude. Positive angle tilts the nose to -X, so drift to +X
    /// asks for a positive tilt.
    pub fn target_angle(&self, sensors: &SensorView) -> f64 {
        let p = sensors.position();
        let v = sensors.velocity();
        (self.drift_position_gain * p.x + self.drift_velocity_gain * v.x).clamp(-self.max_tilt, self.max_tilt)
    }
}

impl Default for PidLanding {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStep for PidLanding {
    fn compute(&mut self, sensors: &SensorView, cmd: &mut ActuatorCommand, fuel_remaining: f64, dt: f64) {
        let y = sensors.position().y;

        // --- Attitude ---
        let angle_error = self.target_angle(sensors) - sensors.angle();
        let effort = self.attitude_pid.update(angle_error, dt);
        fire_rcs(cmd, effort > self.rcs_deadband, effort < -self.rcs_deadband);

        if !self.ignited && y > self.ignition_altitude {
            return;
        }
        if !self.ignited {
            info!(altitude = y, fuel = fuel_remaining, "landing burn ignition");
            self.ignited = true;
        }

        // Nozzles sit below the CG: negative gimbal yields positive torque
        let gimbal = (-effort).clamp(-self.max_gimbal, self.max_gimbal);

        // --- Descent rate ---
        let vy_error = self.target_descent_rate(y) - sensors.velocity().y;
        let tilt = sensors.angle().cos().max(0.5);
        let throttle = ((self.hover_throttle + self.descent_pid.update(vy_error, dt)) / tilt).clamp(0.0, 1.0);

        cmd.set(RAPTOR_LEFT, throttle, gimbal);
        cmd.set(RAPTOR_RIGHT, throttle, gimbal);
    }

    fn reset(&mut self) {
        self.attitude_pid.reset();
        self.descent_pid.reset();
        self.ignited = false;
    }

    fn name(&self) -> &str {
        "PidLanding"
    }
}
