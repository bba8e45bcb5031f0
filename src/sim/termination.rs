use crate::dynamics::state::BodyState;

/// Half-width of the recoverable zone around the pad, m.
pub const DEFAULT_ZONE_HALF_WIDTH: f64 = 150.0;

/// Body reference point at or below the ground plane.
pub fn touchdown(state: &BodyState) -> bool {
    state.position.y <= 0.0
}

/// Touchdown, or drifted more than `half_width` from the pad.
pub fn landing_zone(half_width: f64) -> impl Fn(&BodyState) -> bool {
    move |state| touchdown(state) || state.position.x.abs() > half_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touchdown_at_ground_plane() {
        assert!(touchdown(&BodyState::at_rest(0.0, 0.0)));
        assert!(touchdown(&BodyState::at_rest(0.0, -0.1)));
        assert!(!touchdown(&BodyState::at_rest(0.0, 0.1)));
    }

    #[test]
    fn zone_exit_ends_run() {
        let done = landing_zone(DEFAULT_ZONE_HALF_WIDTH);
        assert!(done(&BodyState::at_rest(151.0, 300.0)));
        assert!(done(&BodyState::at_rest(-151.0, 300.0)));
        assert!(!done(&BodyState::at_rest(149.0, 300.0)));
    }
}
