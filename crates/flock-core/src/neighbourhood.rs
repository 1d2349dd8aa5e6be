use crate::space::Vector;

/// Every other agent within the interaction radius of one owner, rebuilt each tick from the
/// owner's row of the shared displacement and distance matrices.
///
/// The owner is referenced by index only. Buffers are sized to the population once and reused.
#[derive(Clone, Debug)]
pub struct Neighbourhood {
    owner: usize,
    radius: f64,
    /// `position[owner] - position[j]` for each neighbour `j`, in ascending `j` order.
    displacements: Vec<Vector>,
    velocities: Vec<Vector>,
    own_velocity: Option<Vector>,
}

impl Neighbourhood {
    pub fn new(owner: usize, population: usize, radius: f64) -> Self {
        let capacity = population.saturating_sub(1);
        Self {
            owner,
            radius,
            displacements: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            own_velocity: None,
        }
    }

    /// Rebuild from the owner's matrix rows and the current velocity of every agent.
    ///
    /// A neighbour qualifies when its distance is strictly less than the radius; the owner
    /// itself never does.
    pub fn calculate_displacements(
        &mut self,
        displacements: &[Vector],
        distances: &[f64],
        velocities: &[Vector],
    ) {
        debug_assert_eq!(displacements.len(), distances.len());
        debug_assert_eq!(displacements.len(), velocities.len());

        self.displacements.clear();
        self.velocities.clear();
        for (j, ((displacement, &distance), velocity)) in displacements
            .iter()
            .zip(distances)
            .zip(velocities)
            .enumerate()
        {
            if j == self.owner || !(distance < self.radius) {
                continue;
            }
            self.displacements.push(*displacement);
            self.velocities.push(*velocity);
        }
        self.own_velocity = velocities.get(self.owner).copied();
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of neighbours found by the last recalculation.
    pub fn population(&self) -> usize {
        self.displacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }

    pub fn displacements(&self) -> &[Vector] {
        &self.displacements
    }

    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    /// The owner's velocity at the last recalculation, `None` before the first one.
    pub fn own_velocity(&self) -> Option<&Vector> {
        self.own_velocity.as_ref()
    }
}
