use super::super::Scenario;
use crate::scenario::TickError;

impl Scenario {
    /// Reset each acceleration and let the agent's archetype act on its neighbourhood.
    pub(in crate::scenario) fn step_force_phase(&mut self) -> Result<(), TickError> {
        let velocities = *self.state.velocities();
        for agent in self.state.agents_mut() {
            agent.acceleration = velocities.zero();
            agent
                .archetype
                .act(&velocities, &mut agent.acceleration, &agent.neighbourhood)?;

            let [ax, ay] = agent.acceleration.components();
            if !(ax.is_finite() && ay.is_finite()) {
                return Err(TickError::NonFiniteAcceleration { agent: agent.index });
            }
        }
        Ok(())
    }
}
