use std::thread;

use starship_sim::dynamics::{CompositeBody, SimConfig};
use starship_sim::gnc::ScriptedLanding;
use starship_sim::io::LandingSummary;
use starship_sim::sim;
use starship_sim::vehicle::presets;

/// Score one candidate trigger height. The score lives out here, not in the
/// simulation: each candidate gets a fresh body and controller.
fn evaluate(trigger_height: f64) -> (f64, LandingSummary) {
    let config = presets::starship();
    let body = CompositeBody::from_config(&config).expect("preset is valid");
    let mut controller = ScriptedLanding::new();
    controller.trigger_height = trigger_height;

    let results = sim::simulate_with(body, &SimConfig::default(), &mut controller, &sim::landing_zone(150.0))
        .expect("default config is valid");
    let summary = LandingSummary::from_results(&config.name, &results).expect("at least one sample");

    // Missing the ground entirely (zone exit, time limit) scores worst
    let fitness = if summary.touched_down { summary.points } else { f64::NEG_INFINITY };
    (fitness, summary)
}

fn main() {
    let candidates: Vec<f64> = (0..8).map(|i| 200.0 + 25.0 * i as f64).collect();

    let handles: Vec<_> = candidates
        .iter()
        .map(|&h| thread::spawn(move || (h, evaluate(h))))
        .collect();

    println!("  {:>9}  {:>9}  {:>8}  {:>8}  {:>8}", "trigger", "fitness", "x (m)", "vy (m/s)", "ang(deg)");
    println!("  {}", "─".repeat(50));

    let mut best: Option<(f64, f64)> = None;
    for handle in handles {
        let (h, (fitness, s)) = handle.join().expect("worker panicked");
        println!("  {:>9.0}  {:>9.2}  {:>8.1}  {:>8.2}  {:>8.1}", h, fitness, s.x_m, s.vy_ms, s.angle_deg);
        if best.map_or(true, |(_, f)| fitness > f) {
            best = Some((h, fitness));
        }
    }

    if let Some((h, fitness)) = best {
        println!();
        println!("  Best trigger height: {h:.0} m (fitness {fitness:.2})");
    }
}
