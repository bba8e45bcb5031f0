use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::sim::SimulationResults;

/// Write a run's trajectory as CSV.
///
/// Columns: time, x, y, vx, vy, angle_deg, omega_deg_s, fuel, followed by a
/// `<name>_power,<name>_gimbal_deg` pair for every actuator that appears in
/// any recorded command. Actuators missing from a sample's command read as 0.
pub fn write_results<W: Write>(writer: &mut W, results: &SimulationResults) -> Result<()> {
    let names: BTreeSet<&str> = results
        .iter()
        .flat_map(|s| s.command.iter().map(|(name, _)| name))
        .collect();

    write!(writer, "time,x,y,vx,vy,angle_deg,omega_deg_s,fuel")?;
    for name in &names {
        write!(writer, ",{name}_power,{name}_gimbal_deg")?;
    }
    writeln!(writer)?;

    for s in results {
        let st = &s.state;
        write!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.3},{:.3},{:.3}",
            s.time,
            st.position.x, st.position.y,
            st.velocity.x, st.velocity.y,
            st.angle.to_degrees(),
            st.angular_velocity.to_degrees(),
            s.fuel,
        )?;
        for name in &names {
            let (power, gimbal) = s.command.get(name).map_or((0.0, 0.0), |sp| (sp.power, sp.gimbal));
            write!(writer, ",{:.3},{:.2}", power, gimbal.to_degrees())?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write the trajectory CSV to a file at `path`.
pub fn write_results_file(path: impl AsRef<Path>, results: &SimulationResults) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_results(&mut file, results)?;
    file.flush()?;
    Ok(())
}
