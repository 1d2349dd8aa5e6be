use super::super::Scenario;
use crate::scenario::TickError;

impl Scenario {
    /// Semi-implicit Euler, first half: `v += a * dt`.
    pub(in crate::scenario) fn step_force_integration_phase(&mut self) -> Result<(), TickError> {
        let dt = self.time_step.as_secs_f64();
        let velocities = *self.state.velocities();
        for agent in self.state.agents_mut() {
            let dv = agent.acceleration.times(&velocities, dt)?;
            agent.velocity.accumulate(&velocities, &[dv])?;
        }
        Ok(())
    }

    /// `p += v * dt` in the position space. Periodic axes wrap through the axis sum.
    pub(in crate::scenario) fn step_position_integration_phase(&mut self) -> Result<(), TickError> {
        let dt = self.time_step.as_secs_f64();
        let positions = *self.state.positions();
        let velocities = *self.state.velocities();
        for agent in self.state.agents_mut() {
            let dp = positions.rebase(&agent.velocity.times(&velocities, dt)?);
            agent.position.accumulate(&positions, &[dp])?;
        }
        Ok(())
    }
}
