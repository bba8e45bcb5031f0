use starship_sim::dynamics::{CompositeBody, SimConfig};
use starship_sim::gnc::{ActuatorCommand, ControlStep, SensorView};
use starship_sim::io::LandingSummary;
use starship_sim::sim;
use starship_sim::vehicle::presets::{self, RAPTOR_LEFT, RAPTOR_RIGHT};

/// Bang-bang suicide burn: coast until the stopping distance at full
/// throttle catches up with altitude, then burn until the sink rate is gone.
struct SuicideBurn {
    margin: f64, // m
    burning: bool,
}

impl ControlStep for SuicideBurn {
    fn compute(&mut self, sensors: &SensorView, cmd: &mut ActuatorCommand, fuel: f64, _dt: f64) {
        let y = sensors.position().y;
        let vy = sensors.velocity().y;

        // Full thrust of both Raptors on a fully loaded ship, minus gravity
        let decel = 2.0 * 2.2e6 / (100_000.0 + fuel) - 9.81;
        let stopping = vy * vy / (2.0 * decel);

        if !self.burning && vy < 0.0 && y <= stopping + self.margin {
            self.burning = true;
        }
        if self.burning && vy > -1.0 {
            self.burning = false;
        }

        let power = if self.burning { 1.0 } else { 0.0 };
        cmd.set(RAPTOR_LEFT, power, 0.0);
        cmd.set(RAPTOR_RIGHT, power, 0.0);
    }

    fn reset(&mut self) {
        self.burning = false;
    }

    fn name(&self) -> &str {
        "SuicideBurn"
    }
}

fn main() {
    let config = presets::starship();
    let body = CompositeBody::from_config(&config).expect("preset is valid");

    let mut controller = SuicideBurn { margin: 40.0, burning: false };

    println!("Simulating with {} controller...", controller.name());
    let results = sim::simulate_with(body, &SimConfig::default(), &mut controller, &sim::touchdown)
        .expect("default config is valid");
    let summary = LandingSummary::from_results(&config.name, &results).expect("at least one sample");

    println!("Flight time: {:.1} s", summary.flight_time_s);
    println!("Touchdown:   vx={:.2} m/s  vy={:.2} m/s", summary.vx_ms, summary.vy_ms);
    println!("Fuel used:   {:.0} kg", summary.fuel_used_kg);
    println!("Points:      {:.2} ({})", summary.points, if summary.success { "landed" } else { "crashed" });
    println!("Samples:     {}", results.len());
}
