use tracing::{info, trace};

use crate::dynamics::body::CompositeBody;
use crate::dynamics::state::{BodyState, SimConfig, WorldState};
use crate::error::Result;
use crate::gnc::{ActuatorCommand, ControlStep};
use super::results::{Outcome, Sample, SimulationResults};

// ---------------------------------------------------------------------------
// Simulation loop state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Running,
    Finished(Outcome),
}

/// One body, one clock, one results buffer.
///
/// Each tick: check the termination predicate, snapshot sensors, run the
/// controller, latch its command, step the body, advance the clock, record.
/// The tick whose resulting state satisfies the predicate is the last one
/// recorded.
#[derive(Debug)]
pub struct Simulation {
    world: WorldState,
    body: CompositeBody,
    command: ActuatorCommand,
    results: SimulationResults,
    phase: Phase,
    max_time: Option<f64>,
    ticks: u64,
}

impl Simulation {
    /// Build a run at t = 0. The initial state is recorded as the first sample.
    pub fn new(body: CompositeBody, config: &SimConfig) -> Result<Self> {
        let world = WorldState::from_config(config)?;
        let mut results = SimulationResults::new(world.dt());
        results.push(Sample {
            time: world.time(),
            state: body.state(),
            command: ActuatorCommand::new(),
            fuel: body.fuel_remaining(),
        });

        Ok(Self {
            world,
            body,
            command: ActuatorCommand::new(),
            results,
            phase: Phase::Initialized,
            max_time: config.max_time,
            ticks: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn body(&self) -> &CompositeBody {
        &self.body
    }

    pub fn command(&self) -> &ActuatorCommand {
        &self.command
    }

    pub fn results(&self) -> &SimulationResults {
        &self.results
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one loop iteration. A finished simulation stays finished.
    pub fn tick<P>(&mut self, controller: &mut dyn ControlStep, finished: &P) -> Phase
    where
        P: Fn(&BodyState) -> bool + ?Sized,
    {
        match self.phase {
            Phase::Finished(_) => return self.phase,
            Phase::Initialized => {
                info!(
                    body = %self.body.name(),
                    controller = controller.name(),
                    dt = self.world.dt(),
                    mass = self.body.mass(),
                    fuel = self.body.fuel_remaining(),
                    "simulation started"
                );
                self.phase = Phase::Running;
            }
            Phase::Running => {}
        }

        if finished(&self.body.state()) {
            return self.finish(Outcome::PredicateMet);
        }
        if let Some(max_time) = self.max_time {
            if self.world.time() + 0.5 * self.world.dt() > max_time {
                return self.finish(Outcome::TimeLimit);
            }
        }

        let dt = self.world.dt();
        let sensors = self.body.sensor_view();
        controller.compute(&sensors, &mut self.command, self.body.fuel_remaining(), dt);
        self.body.apply_command(&self.command);
        let out = self.body.step(&self.world);
        self.world.advance();
        self.ticks += 1;

        let state = self.body.state();
        trace!(
            t = self.world.time(),
            x = state.position.x,
            y = state.position.y,
            angle = state.angle,
            fx = out.net_force.x,
            fy = out.net_force.y,
            torque = out.net_torque,
            fuel = self.body.fuel_remaining(),
            "tick"
        );

        self.results.push(Sample {
            time: self.world.time(),
            state,
            command: self.command.clone(),
            fuel: self.body.fuel_remaining(),
        });
        self.phase
    }

    /// Drive ticks until Finished and hand back the frozen results.
    pub fn run<P>(mut self, controller: &mut dyn ControlStep, finished: &P) -> SimulationResults
    where
        P: Fn(&BodyState) -> bool + ?Sized,
    {
        while !matches!(self.tick(controller, finished), Phase::Finished(_)) {}
        self.results
    }

    fn finish(&mut self, outcome: Outcome) -> Phase {
        let state = self.body.state();
        info!(
            ?outcome,
            ticks = self.ticks,
            t = self.world.time(),
            x = state.position.x,
            y = state.position.y,
            vx = state.velocity.x,
            vy = state.velocity.y,
            fuel = self.body.fuel_remaining(),
            "simulation finished"
        );
        self.results.finish(outcome);
        self.phase = Phase::Finished(outcome);
        self.phase
    }
}

/// Run `body` under `controller` until `finished` holds (or the time ceiling).
pub fn simulate_with<P>(
    body: CompositeBody,
    config: &SimConfig,
    controller: &mut dyn ControlStep,
    finished: &P,
) -> Result<SimulationResults>
where
    P: Fn(&BodyState) -> bool + ?Sized,
{
    Ok(Simulation::new(body, config)?.run(controller, finished))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
