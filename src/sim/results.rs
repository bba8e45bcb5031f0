use std::io::Write;

use serde::Serialize;

use crate::dynamics::state::BodyState;
use crate::error::{Result, SimError};
use crate::gnc::ActuatorCommand;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The termination predicate held.
    PredicateMet,
    /// The simulated-time ceiling was reached first.
    TimeLimit,
}

/// One recorded tick. `state` and `command` are owned copies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub time: f64,
    pub state: BodyState,
    pub command: ActuatorCommand,
    pub fuel: f64, // kg remaining after the tick
}

/// Scalar state properties that can be interpolated from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    X,
    Y,
    Vx,
    Vy,
    Angle,
    AngularVelocity,
    Fuel,
}

impl Property {
    pub fn of(self, sample: &Sample) -> f64 {
        let s = &sample.state;
        match self {
            Property::X => s.position.x,
            Property::Y => s.position.y,
            Property::Vx => s.velocity.x,
            Property::Vy => s.velocity.y,
            Property::Angle => s.angle,
            Property::AngularVelocity => s.angular_velocity,
            Property::Fuel => sample.fuel,
        }
    }
}

// ---------------------------------------------------------------------------
// Results buffer
// ---------------------------------------------------------------------------

/// Append-only time series produced by one run, in strictly increasing time
/// order with fixed spacing `dt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResults {
    dt: f64,
    outcome: Option<Outcome>,
    samples: Vec<Sample>,
}

impl SimulationResults {
    pub(crate) fn new(dt: f64) -> Self {
        Self { dt, outcome: None, samples: Vec::new() }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// `None` while the run is still in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn states(&self) -> impl Iterator<Item = &BodyState> + '_ {
        self.samples.iter().map(|s| &s.state)
    }

    /// Linear interpolation of `property` at time `t`.
    pub fn interpolate(&self, property: Property, t: f64) -> Result<f64> {
        let (start, end) = match (self.samples.first(), self.samples.last()) {
            (Some(a), Some(b)) => (a.time, b.time),
            _ => return Err(SimError::OutOfRange { time: t, start: 0.0, end: 0.0 }),
        };
        if !(start..=end).contains(&t) {
            return Err(SimError::OutOfRange { time: t, start, end });
        }

        // First sample strictly after t; clamp so [i-1, i] brackets t
        let i = self.samples.partition_point(|s| s.time <= t).clamp(1, self.samples.len());
        if i == self.samples.len() {
            return Ok(property.of(&self.samples[i - 1]));
        }
        let (a, b) = (&self.samples[i - 1], &self.samples[i]);
        let (va, vb) = (property.of(a), property.of(b));
        Ok(va + (vb - va) * ((t - a.time) / (b.time - a.time)))
    }

    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SimulationResults {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
