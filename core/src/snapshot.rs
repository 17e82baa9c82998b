use rkyv::{Archive, Deserialize, Serialize};

use crate::ladder::Ladder;
use crate::layout::LadderLayout;
use crate::rung_id::RungId;
use crate::state::RoundState;

pub const ROUND_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub version: u32,
    pub seed: u32,
    pub layout: LadderLayout,
    pub ladder: Ladder,
    pub active: Vec<RungId>,
}

impl RoundSnapshot {
    pub fn from_state(state: &RoundState) -> Self {
        Self {
            version: ROUND_SNAPSHOT_VERSION,
            seed: state.seed,
            layout: state.layout,
            ladder: state.ladder.clone(),
            active: state.active.iter().collect(),
        }
    }

    pub fn into_state(self) -> RoundState {
        RoundState {
            seed: self.seed,
            layout: self.layout,
            ladder: self.ladder,
            active: self.active.into_iter().collect(),
        }
    }
}
