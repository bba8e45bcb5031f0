use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::sim::{Outcome, SimulationResults};

// Landing envelope
pub const MAX_TOUCHDOWN_ANGLE_DEG: f64 = 5.0;
pub const MAX_TOUCHDOWN_OFFSET: f64 = 20.0; // m from the pad centre
pub const MAX_TOUCHDOWN_SPEED: f64 = 1.0; // m/s, per axis

/// Descriptive summary of how a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingSummary {
    pub body: String,
    pub outcome: Option<Outcome>,
    pub flight_time_s: f64,
    pub ticks: usize,
    pub touched_down: bool,
    pub x_m: f64,
    pub vx_ms: f64,
    pub vy_ms: f64,
    pub angle_deg: f64,
    pub fuel_used_kg: f64,
    pub fuel_remaining_kg: f64,
    /// Touched down inside the landing envelope.
    pub success: bool,
    /// 20 - |x| - 10|vx| - 10|vy| - |angle deg|; only meaningful on touchdown.
    pub points: f64,
}

impl LandingSummary {
    /// Summarize from the final sample. `None` for an empty result set.
    pub fn from_results(body: impl Into<String>, results: &SimulationResults) -> Option<Self> {
        let first = results.first()?;
        let last = results.last()?;
        let s = &last.state;

        let angle_deg = s.angle.to_degrees();
        let touched_down = s.position.y <= 0.0;
        let success = touched_down
            && angle_deg.abs() <= MAX_TOUCHDOWN_ANGLE_DEG
            && s.position.x.abs() <= MAX_TOUCHDOWN_OFFSET
            && s.velocity.x.abs() <= MAX_TOUCHDOWN_SPEED
            && s.velocity.y.abs() <= MAX_TOUCHDOWN_SPEED;
        let points = 20.0
            - s.position.x.abs()
            - 10.0 * s.velocity.x.abs()
            - 10.0 * s.velocity.y.abs()
            - angle_deg.abs();

        Some(Self {
            body: body.into(),
            outcome: results.outcome(),
            flight_time_s: last.time - first.time,
            ticks: results.len() - 1,
            touched_down,
            x_m: s.position.x,
            vx_ms: s.velocity.x,
            vy_ms: s.velocity.y,
            angle_deg,
            fuel_used_kg: first.fuel - last.fuel,
            fuel_remaining_kg: last.fuel,
            success,
            points,
        })
    }
}

/// Write a landing summary as pretty JSON.
pub fn write_summary<W: Write>(writer: &mut W, summary: &LandingSummary) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_summary_file(path: impl AsRef<Path>, summary: &LandingSummary) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_summary(&mut file, summary)?;
    file.flush()?;
    Ok(())
}

/// Write the full sample series as JSON.
pub fn write_results_file(path: impl AsRef<Path>, results: &SimulationResults) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    results.write_json(&mut file)?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::{CompositeBody, SimConfig};
    use crate::gnc::NullController;
    use crate::sim::{simulate_with, touchdown};
    use crate::vehicle::BodyBuilder;

    fn drop_test(x: f64, y: f64) -> SimulationResults {
        let cfg = BodyBuilder::new("Drop").dry_mass(5.0).fuel(2.0).position(x, y).build();
        let body = CompositeBody::from_config(&cfg).unwrap();
        simulate_with(body, &SimConfig::default(), &mut NullController, &touchdown).unwrap()
    }

    #[test]
    fn gentle_touchdown_is_a_success() {
        // Two ticks of free fall, arriving at ~0.33 m/s
        let r = drop_test(3.0, 0.0001);
        let s = LandingSummary::from_results("Drop", &r).unwrap();
        assert!(s.touched_down);
        assert!(s.success, "{s:?}");
        assert_eq!(s.outcome, Some(Outcome::PredicateMet));
        assert_eq!(s.fuel_used_kg, 0.0);
        assert!((s.points - (20.0 - 3.0 - 10.0 * s.vy_ms.abs())).abs() < 1e-9);
    }

    #[test]
    fn hard_impact_fails_envelope() {
        let r = drop_test(0.0, 100.0);
        let s = LandingSummary::from_results("Drop", &r).unwrap();
        assert!(s.touched_down);
        assert!(!s.success);
        assert!(s.vy_ms < -40.0, "free fall from 100 m, got {}", s.vy_ms);
        assert!(s.points < 0.0);
    }

    #[test]
    fn json_summary_is_valid() {
        let r = drop_test(0.0, 1.0);
        let summary = LandingSummary::from_results("Drop", &r).unwrap();
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["body"], "Drop");
        assert_eq!(v["outcome"], "PredicateMet");
        assert!(v["points"].is_number());
    }
}
