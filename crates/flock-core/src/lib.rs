pub mod agent;
pub mod charges;
pub mod config;
pub mod constants;
pub mod forces;
pub mod frame;
pub mod metric;
pub mod neighbourhood;
pub mod rng;
pub mod scenario;
pub mod space;
pub mod state;

pub use agent::{Agent, Placement};
pub use charges::{Charge, Charges, Field};
pub use config::{ScenarioConfig, ScenarioConfigError, TopologyKind};
pub use constants::{MAX_POPULATION, MAX_WORLD_EXTENT};
pub use forces::{Action, Archetype, Force, Forces};
pub use frame::{snapshot_frame, Coords, Frame};
pub use metric::{Circle, MetricError, MetricSpace1D};
pub use neighbourhood::Neighbourhood;
pub use scenario::{initialise_scenario, Scenario, ScenarioInitError, TickError};
pub use space::{MetricSpace2D, SpaceError, SpaceId, Topology, Vector};
pub use state::State;
