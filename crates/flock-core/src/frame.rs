use crate::state::State;
use serde::{Deserialize, Serialize};

/// One agent's render-ready position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub x: f64,
    pub y: f64,
}

/// Positions of every agent, in agent index order.
pub type Frame = Vec<Coords>;

/// Periodic axes report `[0, C)`; unbounded axes report the raw coordinate.
pub fn snapshot_frame(state: &State) -> Frame {
    let space = state.positions();
    state
        .agents()
        .iter()
        .map(|agent| {
            let [x, y] = agent.position().components();
            Coords {
                x: space.x_axis().canonical(x),
                y: space.y_axis().canonical(y),
            }
        })
        .collect()
}
