use nalgebra::Vector2;

use super::state::BodyState;

// ---------------------------------------------------------------------------
// Explicit (forward) Euler, fixed step
// ---------------------------------------------------------------------------

/// Single forward-Euler step.
///
/// Position and angle advance with the pre-step velocity and angular
/// velocity; the order must not change or recorded runs stop reproducing.
pub fn euler_step(
    state: &BodyState,
    net_force: &Vector2<f64>,
    net_torque: f64,
    mass: f64,
    inertia: f64,
    dt: f64,
) -> BodyState {
    let accel = net_force / mass;
    let alpha = net_torque / inertia;

    BodyState {
        position: state.position + state.velocity * dt,
        velocity: state.velocity + accel * dt,
        angle: state.angle + state.angular_velocity * dt,
        angular_velocity: state.angular_velocity + alpha * dt,
    }
}
