use crate::forces::Archetype;
use crate::neighbourhood::Neighbourhood;
use crate::space::{MetricSpace2D, Vector};
use std::sync::Arc;

/// Initial kinematics of one agent, in raw world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Placement {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
}

impl Placement {
    pub fn at_rest(x: f64, y: f64) -> Self {
        Self {
            position: [x, y],
            velocity: [0.0, 0.0],
        }
    }
}

/// A single boid. `position` lives in the position space; `velocity` and `acceleration` in the
/// velocity space of the owning [`crate::state::State`].
#[derive(Clone, Debug)]
pub struct Agent {
    pub(crate) index: usize,
    pub(crate) position: Vector,
    pub(crate) velocity: Vector,
    pub(crate) acceleration: Vector,
    pub(crate) archetype: Arc<Archetype>,
    pub(crate) neighbourhood: Neighbourhood,
}

impl Agent {
    pub(crate) fn new(
        index: usize,
        placement: &Placement,
        positions: &MetricSpace2D,
        velocities: &MetricSpace2D,
        archetype: Arc<Archetype>,
        neighbourhood: Neighbourhood,
    ) -> Self {
        let [px, py] = placement.position;
        let [vx, vy] = placement.velocity;
        Self {
            index,
            position: positions.vector(px, py),
            velocity: velocities.vector(vx, vy),
            acceleration: velocities.zero(),
            archetype,
            neighbourhood,
        }
    }

    /// Position of this agent in the population, stable for the life of the scenario.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> &Vector {
        &self.position
    }

    pub fn velocity(&self) -> &Vector {
        &self.velocity
    }

    /// Acceleration computed by the most recent tick.
    pub fn acceleration(&self) -> &Vector {
        &self.acceleration
    }

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    pub fn neighbourhood(&self) -> &Neighbourhood {
        &self.neighbourhood
    }
}
