//! Population snapshot plus the per-tick pairwise caches.
//!
//! The displacement and distance matrices are flat row-major `n * n` buffers allocated once.
//! Entry `(i, j)` of the displacement matrix is `position[i] - position[j]` along the geodesic.
//! Only the strict lower triangle is computed; the upper triangle is its negation and the
//! diagonal is zero.

use crate::agent::{Agent, Placement};
use crate::forces::Archetype;
use crate::neighbourhood::Neighbourhood;
use crate::space::{MetricSpace2D, SpaceError, Vector};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct State {
    positions: MetricSpace2D,
    velocities: MetricSpace2D,
    agents: Vec<Agent>,
    displacements: Vec<Vector>,
    distances: Vec<f64>,
    velocity_snapshot: Vec<Vector>,
}

impl State {
    /// Build one agent per placement, all sharing `archetype` and the same neighbourhood radius.
    pub fn new(
        positions: MetricSpace2D,
        velocities: MetricSpace2D,
        placements: &[Placement],
        archetype: Arc<Archetype>,
        neighbourhood_radius: f64,
    ) -> Self {
        let n = placements.len();
        let agents = placements
            .iter()
            .enumerate()
            .map(|(i, placement)| {
                Agent::new(
                    i,
                    placement,
                    &positions,
                    &velocities,
                    Arc::clone(&archetype),
                    Neighbourhood::new(i, n, neighbourhood_radius),
                )
            })
            .collect();
        Self {
            positions,
            velocities,
            agents,
            displacements: vec![positions.zero(); n * n],
            distances: vec![0.0; n * n],
            velocity_snapshot: Vec::with_capacity(n),
        }
    }

    pub fn positions(&self) -> &MetricSpace2D {
        &self.positions
    }

    pub fn velocities(&self) -> &MetricSpace2D {
        &self.velocities
    }

    pub fn population(&self) -> usize {
        self.agents.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// `position[i] - position[j]` as of the last [`State::calculate_displacements`].
    pub fn displacement(&self, i: usize, j: usize) -> &Vector {
        &self.displacements[i * self.population() + j]
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i * self.population() + j]
    }

    pub fn displacement_row(&self, i: usize) -> &[Vector] {
        let n = self.population();
        &self.displacements[i * n..(i + 1) * n]
    }

    pub fn distance_row(&self, i: usize) -> &[f64] {
        let n = self.population();
        &self.distances[i * n..(i + 1) * n]
    }

    pub fn calculate_displacements(&mut self) -> Result<(), SpaceError> {
        let n = self.agents.len();
        let space = &self.positions;
        for i in 0..n {
            self.displacements[i * n + i] = space.zero();
            for j in 0..i {
                let d = self.agents[i]
                    .position
                    .minus(space, &self.agents[j].position)?;
                // An exact antipode negates to itself; the radius cap keeps such pairs apart.
                self.displacements[j * n + i] = d.negated(space)?;
                self.displacements[i * n + j] = d;
            }
        }
        Ok(())
    }

    /// Magnitudes of the cached displacements. Requires a fresh displacement matrix.
    pub fn calculate_distances(&mut self) -> Result<(), SpaceError> {
        let n = self.agents.len();
        for i in 0..n {
            self.distances[i * n + i] = 0.0;
            for j in 0..i {
                let distance = self.displacements[i * n + j].magnitude(&self.positions)?;
                self.distances[i * n + j] = distance;
                self.distances[j * n + i] = distance;
            }
        }
        Ok(())
    }

    /// Rebuild every agent's neighbourhood from the cached matrices and current velocities.
    pub fn calculate_neighbourhoods(&mut self) {
        let n = self.agents.len();
        let Self {
            agents,
            displacements,
            distances,
            velocity_snapshot,
            ..
        } = self;

        velocity_snapshot.clear();
        velocity_snapshot.extend(agents.iter().map(|agent| agent.velocity));

        for agent in agents.iter_mut() {
            let row = agent.index * n..(agent.index + 1) * n;
            agent.neighbourhood.calculate_displacements(
                &displacements[row.clone()],
                &distances[row],
                velocity_snapshot.as_slice(),
            );
        }
    }
}
