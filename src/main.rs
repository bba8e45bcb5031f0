use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use starship_sim::dynamics::{CompositeBody, SimConfig};
use starship_sim::gnc::{ControlStep, NeuralLanding, NullController, PidLanding, ScriptedLanding};
use starship_sim::io::{self, LandingSummary};
use starship_sim::sim::{self, EventKind, DEFAULT_ZONE_HALF_WIDTH};
use starship_sim::vehicle::{presets, ActuatorKind, BodyConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerChoice {
    /// No commands; ballistic fall
    Null,
    /// Altitude-triggered flip-and-burn script
    Scripted,
    /// PID attitude hold with descent-rate throttle
    Pid,
    /// Feed-forward network; needs --weights
    Neural,
}

/// Simulate a 2D Starship landing.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Body config JSON; the Starship preset when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "pid")]
    controller: ControllerChoice,

    /// Network parameters as a JSON array (neural controller)
    #[arg(long, required_if_eq("controller", "neural"))]
    weights: Option<PathBuf>,

    /// Fixed time step, s
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Simulated-time ceiling, s (0 disables)
    #[arg(long, default_value_t = 300.0)]
    max_time: f64,

    /// Half-width of the landing zone, m
    #[arg(long, default_value_t = DEFAULT_ZONE_HALF_WIDTH)]
    zone: f64,

    /// Write the trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the landing summary as JSON
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let body_config = match &args.config {
        Some(path) => BodyConfig::from_json_file(path)
            .with_context(|| format!("loading body config {}", path.display()))?,
        None => presets::starship(),
    };
    let body = CompositeBody::from_config(&body_config).context("building body")?;

    let config = SimConfig {
        dt: args.dt,
        max_time: (args.max_time > 0.0).then_some(args.max_time),
        ..SimConfig::default()
    };

    let mut controller: Box<dyn ControlStep> = match args.controller {
        ControllerChoice::Null => Box::new(NullController),
        ControllerChoice::Scripted => Box::new(ScriptedLanding::new()),
        ControllerChoice::Pid => Box::new(PidLanding::new()),
        ControllerChoice::Neural => {
            let path = args.weights.as_ref().context("--controller neural needs --weights")?;
            let net = NeuralLanding::from_json_file(path)
                .with_context(|| format!("loading network weights {}", path.display()))?;
            Box::new(net)
        }
    };

    print_vehicle(&body);

    let finished = sim::landing_zone(args.zone);
    let results = sim::simulate_with(body, &config, controller.as_mut(), &finished)?;
    let summary = LandingSummary::from_results(&body_config.name, &results)
        .context("simulation produced no samples")?;

    print_events(&results);
    print_summary(&summary, controller.name());
    print_trajectory(&results);

    if let Some(path) = &args.csv {
        io::csv::write_results_file(path, &results)?;
        println!("  Trajectory CSV written to {}", path.display());
    }
    if let Some(path) = &args.json {
        io::json::write_results_file(path, &results)?;
        println!("  Results JSON written to {}", path.display());
    }
    if let Some(path) = &args.summary {
        io::json::write_summary_file(path, &summary)?;
        println!("  Summary JSON written to {}", path.display());
    }
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

const RULE: &str = "  ──────────────────────────────────────────────────────────────────";

fn print_vehicle(body: &CompositeBody) {
    let s = body.state();
    println!();
    println!("====================================================================");
    println!("  LANDING SIMULATION — {}", body.name());
    println!("====================================================================");
    println!();
    println!("  Vehicle");
    println!("{RULE}");
    println!(
        "  Dry mass:      {:>10.0} kg    Fuel:         {:>10.0} kg",
        body.dry_mass(),
        body.fuel_remaining()
    );
    println!(
        "  Inertia:       {:>10.3e} kg m^2",
        body.inertia()
    );
    println!(
        "  Start:         x={:.1} m  y={:.1} m  vx={:.1} m/s  vy={:.1} m/s  angle={:.1} deg",
        s.position.x,
        s.position.y,
        s.velocity.x,
        s.velocity.y,
        s.angle.to_degrees()
    );
    for a in body.actuators() {
        let kind = match a.kind() {
            ActuatorKind::MainEngine { gimbal_limit, .. } => {
                format!("engine  gimbal ±{:.0} deg", gimbal_limit.to_degrees())
            }
            ActuatorKind::Rcs { .. } => "rcs".to_owned(),
        };
        println!(
            "  {:<10} {:>10.0} N   at ({:>5.1}, {:>5.1}) m   {}",
            a.name(),
            a.max_output(),
            a.offset().x,
            a.offset().y,
            kind
        );
    }
    println!();
}

fn print_events(results: &sim::SimulationResults) {
    println!("  Flight Events");
    println!("{RULE}");
    for event in sim::flight_events(results) {
        let label = match &event.kind {
            EventKind::EngineStart { actuator } => format!("START     {actuator}"),
            EventKind::EngineCutoff { actuator } => format!("CUTOFF    {actuator}"),
            EventKind::FuelExhausted => "FUEL OUT".to_owned(),
            EventKind::Touchdown => "TOUCHDOWN".to_owned(),
            EventKind::Custom(msg) => msg.clone(),
        };
        println!("  t={:>7.2}s   {}", event.time, label);
    }
    println!();
}

fn print_summary(s: &LandingSummary, controller: &str) {
    println!("  Landing Summary ({controller})");
    println!("{RULE}");
    println!("  Outcome:       {:?}", s.outcome);
    println!("  Flight time:   {:>8.2} s   ({} ticks)", s.flight_time_s, s.ticks);
    println!("  Position:      {:>8.2} m", s.x_m);
    println!("  Velocity:      vx={:.2} m/s  vy={:.2} m/s", s.vx_ms, s.vy_ms);
    println!("  Attitude:      {:>8.2} deg", s.angle_deg);
    println!(
        "  Fuel used:     {:>8.0} kg  ({:.0} kg left)",
        s.fuel_used_kg, s.fuel_remaining_kg
    );
    println!(
        "  Result:        {}   points {:.2}",
        if s.success {
            "LANDED"
        } else if s.touched_down {
            "CRASHED"
        } else {
            "DID NOT LAND"
        },
        s.points
    );
    println!();
}

fn print_trajectory(results: &sim::SimulationResults) {
    println!("  Trajectory");
    println!("{RULE}");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>8}  {:>9}",
        "t (s)", "x (m)", "y (m)", "vx (m/s)", "vy (m/s)", "ang(deg)", "fuel (kg)"
    );
    println!("  {}", "─".repeat(66));

    let interval = (results.len() / 30).max(1);
    for (i, s) in results.iter().enumerate() {
        if i % interval != 0 && i != results.len() - 1 {
            continue;
        }
        let st = &s.state;
        println!(
            "  {:>7.2}  {:>8.1}  {:>8.1}  {:>8.2}  {:>8.2}  {:>8.2}  {:>9.0}",
            s.time,
            st.position.x,
            st.position.y,
            st.velocity.x,
            st.velocity.y,
            st.angle.to_degrees(),
            s.fuel
        );
    }
    println!();
}
