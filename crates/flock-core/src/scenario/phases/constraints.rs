use super::super::Scenario;
use crate::scenario::TickError;

impl Scenario {
    /// Hard speed clamp: velocities faster than `max_speed` are rescaled onto it, direction kept.
    pub(in crate::scenario) fn step_constraint_phase(&mut self) -> Result<(), TickError> {
        let max_speed = self.config.max_speed;
        let velocities = *self.state.velocities();
        for agent in self.state.agents_mut() {
            let speed = agent.velocity.magnitude(&velocities)?;
            if speed > max_speed {
                agent.velocity.scale(&velocities, max_speed / speed)?;
            }
        }
        Ok(())
    }
}
