use super::super::Scenario;
use crate::scenario::TickError;

impl Scenario {
    /// Refresh the pairwise matrices, then every neighbourhood from them.
    pub(in crate::scenario) fn step_cache_phase(&mut self) -> Result<(), TickError> {
        self.state.calculate_displacements()?;
        self.state.calculate_distances()?;
        self.state.calculate_neighbourhoods();
        Ok(())
    }
}
