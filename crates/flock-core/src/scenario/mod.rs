use crate::agent::Placement;
use crate::config::{ScenarioConfig, ScenarioConfigError, TopologyKind};
use crate::forces::Archetype;
use crate::frame::{snapshot_frame, Frame};
use crate::metric::MetricError;
use crate::rng::{create_rng, polar_velocity};
use crate::space::{SpaceError, Topology};
use crate::state::State;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use std::{error::Error, fmt};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioInitError {
    Config(ScenarioConfigError),
    Metric(MetricError),
    PopulationMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ScenarioInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioInitError::Config(e) => write!(f, "{}", e),
            ScenarioInitError::Metric(e) => write!(f, "{}", e),
            ScenarioInitError::PopulationMismatch { expected, actual } => write!(
                f,
                "placements.len() ({actual}) must match population ({expected})"
            ),
        }
    }
}

impl From<ScenarioConfigError> for ScenarioInitError {
    fn from(err: ScenarioConfigError) -> Self {
        ScenarioInitError::Config(err)
    }
}

impl From<MetricError> for ScenarioInitError {
    fn from(err: MetricError) -> Self {
        ScenarioInitError::Metric(err)
    }
}

impl Error for ScenarioInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScenarioInitError::Config(e) => Some(e),
            ScenarioInitError::Metric(e) => Some(e),
            ScenarioInitError::PopulationMismatch { .. } => None,
        }
    }
}

/// Failure inside one [`Scenario::evolve`]. The tick is abandoned and time does not advance.
#[derive(Debug, Clone, PartialEq)]
pub enum TickError {
    Space(SpaceError),
    NonFiniteAcceleration { agent: usize },
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickError::Space(e) => write!(f, "vector algebra failed during tick: {e}"),
            TickError::NonFiniteAcceleration { agent } => {
                write!(f, "agent {agent} produced a non-finite acceleration")
            }
        }
    }
}

impl From<SpaceError> for TickError {
    fn from(err: SpaceError) -> Self {
        TickError::Space(err)
    }
}

impl Error for TickError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TickError::Space(e) => Some(e),
            TickError::NonFiniteAcceleration { .. } => None,
        }
    }
}

/// Owns a [`State`] and the simulation clock, and drives the tick pipeline.
///
/// `evolve` takes `&mut self`, so one scenario has a single writer. Callers that tick from
/// another thread must serialize access themselves.
#[derive(Clone, Debug)]
pub struct Scenario {
    time: Duration,
    time_step: Duration,
    tick: u64,
    config: ScenarioConfig,
    topology: Topology,
    state: State,
}

/// Toroidal scenario of `width` by `height` with `population` randomly placed agents sharing
/// `archetype`. Every other setting takes its [`ScenarioConfig`] default, except that the
/// neighbourhood radius shrinks to fit a small world.
pub fn initialise_scenario(
    time_step: Duration,
    width: f64,
    height: f64,
    population: usize,
    archetype: Archetype,
) -> Result<Scenario, ScenarioInitError> {
    let mut config = ScenarioConfig {
        topology: TopologyKind::Toroidal,
        width,
        height,
        population,
        dt: time_step.as_secs_f64(),
        archetype,
        ..ScenarioConfig::default()
    };
    config.neighbourhood_radius = config
        .neighbourhood_radius
        .min(config.max_toroidal_radius());
    config.validate()?;
    let placements = random_placements(&config);
    Scenario::build(config, time_step, &placements)
}

/// Positions uniform over the world extent; velocities from [`polar_velocity`] when
/// randomised, otherwise at rest.
fn random_placements(config: &ScenarioConfig) -> Vec<Placement> {
    let mut rng = create_rng(config.seed);
    (0..config.population)
        .map(|_| {
            let position = [
                rng.random::<f64>() * config.width,
                rng.random::<f64>() * config.height,
            ];
            let velocity = if config.randomise_velocities {
                polar_velocity(&mut rng, config.max_speed)
            } else {
                [0.0, 0.0]
            };
            Placement { position, velocity }
        })
        .collect()
}

impl Scenario {
    /// Scenario with agents placed from `config.seed`.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioInitError> {
        config.validate()?;
        let time_step = config.time_step()?;
        let placements = random_placements(&config);
        Self::build(config, time_step, &placements)
    }

    /// Scenario with explicit initial kinematics, one placement per agent.
    pub fn from_placements(
        config: ScenarioConfig,
        placements: &[Placement],
    ) -> Result<Self, ScenarioInitError> {
        config.validate()?;
        let time_step = config.time_step()?;
        Self::build(config, time_step, placements)
    }

    fn build(
        config: ScenarioConfig,
        time_step: Duration,
        placements: &[Placement],
    ) -> Result<Self, ScenarioInitError> {
        if placements.len() != config.population {
            return Err(ScenarioInitError::PopulationMismatch {
                expected: config.population,
                actual: placements.len(),
            });
        }

        let mut topology = Topology::new();
        let positions = match config.topology {
            TopologyKind::Toroidal => topology.euclidean_toroid(config.width, config.height)?,
            TopologyKind::Planar => topology.euclidean_plane(),
        };
        let velocities = topology.euclidean_plane();
        let state = State::new(
            positions,
            velocities,
            placements,
            Arc::new(config.archetype),
            config.neighbourhood_radius,
        );

        info!(
            population = config.population,
            topology = ?config.topology,
            width = config.width,
            height = config.height,
            dt = time_step.as_secs_f64(),
            "scenario initialised"
        );

        Ok(Self {
            time: Duration::ZERO,
            time_step,
            tick: 0,
            config,
            topology,
            state,
        })
    }

    /// Model time elapsed over all completed ticks.
    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn time_step(&self) -> Duration {
        self.time_step
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Advance one tick: cache warm-up, forces, force integration, constraints, position
    /// integration, then time.
    pub fn evolve(&mut self) -> Result<(), TickError> {
        if let Err(err) = self.run_tick_phases() {
            warn!(tick = self.tick, error = %err, "tick failed; time not advanced");
            return Err(err);
        }
        self.time += self.time_step;
        self.tick += 1;
        debug!(
            tick = self.tick,
            time = self.time.as_secs_f64(),
            "tick complete"
        );
        Ok(())
    }

    fn run_tick_phases(&mut self) -> Result<(), TickError> {
        self.step_cache_phase()?;
        self.step_force_phase()?;
        self.step_force_integration_phase()?;
        self.step_constraint_phase()?;
        self.step_position_integration_phase()?;
        Ok(())
    }

    /// Render-ready positions of the current state.
    pub fn frame(&self) -> Frame {
        snapshot_frame(&self.state)
    }

    /// Evolve once, then snapshot.
    pub fn next_frame(&mut self) -> Result<Frame, TickError> {
        self.evolve()?;
        Ok(self.frame())
    }
}

mod phases;
