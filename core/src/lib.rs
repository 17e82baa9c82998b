pub mod action;
pub mod active;
pub mod codec;
pub mod ladder;
pub mod layout;
pub mod resolve;
pub mod rung_id;
pub mod snapshot;
pub mod state;

pub use action::RoundAction;
pub use active::ActiveSet;
pub use codec::{decode, encode, CodecError};
pub use ladder::{generate_ladder, Ladder, Lane, Rung};
pub use layout::{
    goal_label, is_valid_lane_count, player_label, rung_count_for, LadderLayout,
    DEFAULT_LANE_COUNT, LANE_COUNT_MAX, LANE_COUNT_MIN,
};
pub use resolve::{ordered_active_rungs, resolve_paths, Resolution};
pub use rung_id::{RungId, RungIdError};
pub use snapshot::{RoundSnapshot, ROUND_SNAPSHOT_VERSION};
pub use state::RoundState;
