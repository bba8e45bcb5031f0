use nalgebra::Vector2;

use starship_sim::dynamics::{BodyState, CompositeBody, SimConfig, WorldState, DEFAULT_DT, EARTH_GRAVITY};
use starship_sim::gnc::{
    ActuatorCommand, ControlStep, NeuralLanding, NullController, PidLanding, ScriptedLanding, SensorView,
};
use starship_sim::sim::{self, Outcome, Phase, Simulation};
use starship_sim::vehicle::{presets, Actuator, BodyBuilder};

fn never(_: &BodyState) -> bool {
    false
}

fn starship() -> CompositeBody {
    CompositeBody::from_config(&presets::starship()).unwrap()
}

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

#[test]
fn free_fall_matches_n_dt_g() {
    let cfg = BodyBuilder::new("Ballast").dry_mass(250.0).fuel(10.0).position(0.0, 1.0e6).build();
    let config = SimConfig { dt: 0.01, max_time: None, ..SimConfig::default() };
    let mut sim = Simulation::new(CompositeBody::from_config(&cfg).unwrap(), &config).unwrap();

    let n = 500;
    for _ in 0..n {
        sim.tick(&mut NullController, &never);
    }
    let vy = sim.body().state().velocity.y;
    let expected = n as f64 * 0.01 * EARTH_GRAVITY;
    assert!((vy - expected).abs() < 1e-9, "vy {} vs {}", vy, expected);
    assert_eq!(sim.body().state().velocity.x, 0.0);
    assert_eq!(sim.body().fuel_remaining(), 10.0, "no actuators, no burn");
}

#[test]
fn fuel_never_negative_and_mass_tracks_fuel() {
    let engine = Actuator::main_engine("Main", Vector2::new(0.0, -3.0), 50_000.0, 0.3, 0.2, 2e-3);
    let rcs = Actuator::rcs("Side", Vector2::new(1.0, 2.0), 500.0, Vector2::new(-1.0, 0.0), 1e-3);
    let mut body = CompositeBody::new("Hopper", 2000.0, 3.0, 40.0, vec![engine, rcs], BodyState::at_rest(0.0, 100.0))
        .unwrap();
    let world = WorldState::new(Vector2::new(0.0, EARTH_GRAVITY), 0.05).unwrap();

    let powers = [1.0, f64::NAN, 7.5, -3.0, 0.6, 1.0, 0.0, 1.0];
    let mut ran_dry = false;
    for i in 0..400 {
        let mut cmd = ActuatorCommand::new();
        cmd.set("Main", powers[i % powers.len()], (i as f64 * 0.37).sin());
        cmd.set_power("Side", powers[(i + 3) % powers.len()]);
        body.apply_command(&cmd);
        let out = body.step(&world);

        assert!(body.fuel_remaining() >= 0.0, "tick {}: fuel {}", i, body.fuel_remaining());
        assert_eq!(body.mass(), body.dry_mass() + body.fuel_remaining());
        assert!(out.fuel_burned >= 0.0);

        if ran_dry {
            // Empty tank: gravity only, whatever was commanded
            assert_eq!(out.net_force, Vector2::new(0.0, EARTH_GRAVITY * body.mass()));
            assert_eq!(out.net_torque, 0.0);
        }
        ran_dry = body.fuel_remaining() == 0.0;
    }
    assert!(ran_dry, "test should exhaust the tank");
}

#[test]
fn gimbal_beyond_limit_uses_clamped_angle() {
    let limit = 0.1;
    let mut engine = Actuator::main_engine("Main", Vector2::new(0.0, -10.0), 1000.0, limit, 0.0, 0.0);
    engine.set_power(1.0);

    for (raw, clamped) in [(0.5, limit), (-2.0, -limit), (0.05, 0.05)] {
        engine.set_gimbal(raw);
        let f = engine.contribution(true).force;
        let dir = f.normalize();
        assert!((dir.x + clamped.sin()).abs() < 1e-12, "raw {}: {:?}", raw, dir);
        assert!((dir.y - clamped.cos()).abs() < 1e-12);
        assert!((f.norm() - 1000.0).abs() < 1e-9);
    }
}

#[test]
fn ignition_ramp_reaches_full_thrust_after_ignition_time() {
    // ignition over 1 s, stepped at 0.25 s: four ramp ticks, then full
    let engine = Actuator::main_engine("Main", Vector2::new(0.0, -1.0), 1000.0, 0.0, 1.0, 0.0);
    let mut body = CompositeBody::new("Test", 100.0, 1.0, 1.0, vec![engine], BodyState::default()).unwrap();
    let world = WorldState::new(Vector2::zeros(), 0.25).unwrap();

    let mut cmd = ActuatorCommand::new();
    cmd.set_power("Main", 1.0);
    let thrust: Vec<f64> = (0..8)
        .map(|_| {
            body.apply_command(&cmd);
            body.step(&world).net_force.norm()
        })
        .collect();

    let expected = [0.0, 250.0, 500.0, 750.0, 1000.0, 1000.0, 1000.0, 1000.0];
    for (got, want) in thrust.iter().zip(expected) {
        assert!((got - want).abs() < 1e-6, "thrust profile {:?}", thrust);
    }
    assert!(thrust.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn drop_from_ten_metres_stops_on_first_ground_contact() {
    let cfg = BodyBuilder::new("Drop").dry_mass(1.0).position(0.0, 10.0).build();
    let config = SimConfig::default();
    assert_eq!(config.dt, DEFAULT_DT);

    let results =
        sim::simulate_with(CompositeBody::from_config(&cfg).unwrap(), &config, &mut NullController, &sim::touchdown)
            .unwrap();

    assert_eq!(results.outcome(), Some(Outcome::PredicateMet));
    let samples = results.samples();
    let n = samples.len();
    assert!(n > 2);
    assert!(samples[n - 1].state.position.y <= 0.0);
    assert!(samples[n - 2].state.position.y > 0.0);

    for pair in samples.windows(2) {
        let gap = pair[1].time - pair[0].time;
        assert!((gap - DEFAULT_DT).abs() < 1e-9, "uneven spacing {}", gap);
    }
}

#[test]
fn identical_runs_are_bit_identical() {
    let run = || {
        let pure = |s: &SensorView, cmd: &mut ActuatorCommand, _: f64, _: f64| {
            let throttle = if s.position().y < 300.0 { 0.9 } else { 0.0 };
            cmd.set(presets::RAPTOR_LEFT, throttle, -0.3 * s.angle());
            cmd.set(presets::RAPTOR_RIGHT, throttle, 0.1);
        };
        let mut ctl = pure;
        sim::simulate_with(starship(), &SimConfig::default(), &mut ctl, &sim::landing_zone(150.0)).unwrap()
    };
    let a = run();
    let b = run();
    assert!(a.len() > 100);
    assert_eq!(a, b);
}

#[test]
fn top_left_rcs_spins_body_by_force_times_lever_arm() {
    let (force, dry, fuel, k_inertia, dt) = (100.0, 1000.0, 10.0, 2.0, 0.02);
    let rcs = Actuator::rcs("RCS TL", Vector2::new(-4.5, 20.0), force, Vector2::new(1.0, 0.0), 0.0);
    let mut engine = Actuator::main_engine("Main", Vector2::new(0.0, -20.0), 1.0e6, 0.2, 0.5, 0.0);
    engine.set_gimbal(0.2);
    let body = CompositeBody::new("Spinner", dry, k_inertia, fuel, vec![engine, rcs], BodyState::default()).unwrap();

    let config = SimConfig { dt, ..SimConfig::default() };
    let mut ctl = |_: &SensorView, cmd: &mut ActuatorCommand, _: f64, _: f64| {
        cmd.set("Main", 0.0, 0.2);
        cmd.set_power("RCS TL", 1.0);
    };
    let mut sim = Simulation::new(body, &config).unwrap();
    let k = 120;
    for _ in 0..k {
        sim.tick(&mut ctl, &never);
    }

    // Pushing +X from above the CG: clockwise
    let torque = -20.0 * force;
    let inertia = k_inertia * (dry + fuel);
    let expected = k as f64 * dt * torque / inertia;
    let omega = sim.body().state().angular_velocity;
    assert!((omega - expected).abs() < 1e-12, "omega {} vs {}", omega, expected);
    assert!(omega < 0.0);
}

#[test]
fn time_limit_outcome_when_predicate_never_holds() {
    let config = SimConfig { max_time: Some(2.0), ..SimConfig::default() };
    let results = sim::simulate_with(starship(), &config, &mut NullController, &never).unwrap();
    assert_eq!(results.outcome(), Some(Outcome::TimeLimit));
    let last = results.last().unwrap();
    assert!((last.time - 2.0).abs() < 1e-9, "stopped at {}", last.time);
}

#[test]
fn stepping_manually_matches_run() {
    let config = SimConfig::default();
    let reference = sim::simulate_with(starship(), &config, &mut ScriptedLanding::new(), &sim::touchdown).unwrap();

    let mut ctl = ScriptedLanding::new();
    let mut sim = Simulation::new(starship(), &config).unwrap();
    while !matches!(sim.tick(&mut ctl, &sim::touchdown), Phase::Finished(_)) {}
    assert_eq!(sim.results(), &reference);
}

#[test]
fn pid_landing_arrives_slower_than_ballistic() {
    let config = SimConfig::default();
    let ballistic = sim::simulate_with(starship(), &config, &mut NullController, &sim::touchdown).unwrap();
    let flown = sim::simulate_with(starship(), &config, &mut PidLanding::new(), &sim::touchdown).unwrap();

    let impact = |r: &sim::SimulationResults| r.last().unwrap().state.velocity.y.abs();
    assert_eq!(flown.outcome(), Some(Outcome::PredicateMet));
    assert!(
        impact(&flown) < 0.5 * impact(&ballistic),
        "flown {} vs ballistic {}",
        impact(&flown),
        impact(&ballistic)
    );
    assert!(flown.iter().all(|s| s.fuel >= 0.0));
}

#[test]
fn untrained_network_flies_symmetric_mid_throttle() {
    // All-zero weights: every output is 0, so all RCS fire, both Raptors sit
    // at mid throttle with centred gimbals.
    let params = vec![0.0; NeuralLanding::parameter_count()];
    let config = SimConfig { max_time: Some(5.0), ..SimConfig::default() };
    let run = || {
        let mut net = NeuralLanding::from_flat_weights(&params).unwrap();
        sim::simulate_with(starship(), &config, &mut net, &sim::touchdown).unwrap()
    };
    let results = run();

    assert_eq!(results.outcome(), Some(Outcome::TimeLimit));
    let first = results.first().unwrap();
    let last = results.last().unwrap();
    assert!((last.command.get(presets::RAPTOR_LEFT).unwrap().power - 0.7).abs() < 1e-12);
    assert!(last.state.angle.abs() < 1e-9, "opposed pairs cancel, angle {}", last.state.angle);
    assert!(last.state.velocity.y > first.state.velocity.y, "thrust above weight brakes the fall");
    assert!(last.fuel < first.fuel);
    assert_eq!(results, run());
}

#[test]
fn concurrent_runs_do_not_interfere() {
    let config = SimConfig::default();
    let expected = sim::simulate_with(starship(), &config, &mut PidLanding::new(), &sim::touchdown).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let config = config.clone();
            std::thread::spawn(move || {
                let mut ctl: Box<dyn ControlStep> = if i % 2 == 0 {
                    Box::new(PidLanding::new())
                } else {
                    Box::new(ScriptedLanding::new())
                };
                sim::simulate_with(starship(), &config, ctl.as_mut(), &sim::touchdown).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results[0], expected);
    assert_eq!(results[2], expected);
    assert_eq!(results[1], results[3]);
}
