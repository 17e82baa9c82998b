use rkyv::{Archive, Deserialize, Serialize};
use tracing::debug;

use crate::layout::{rung_count_for, LadderLayout};
use crate::rung_id::RungId;

pub type Lane = u32;

const RUNG_Y_SALT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize)]
pub struct Rung {
    pub id: RungId,
    pub left_lane: Lane,
    pub y: f32,
}

impl Rung {
    pub fn new(id: RungId, y: f32) -> Self {
        Self {
            id,
            left_lane: id.left_lane,
            y,
        }
    }

    pub fn right_lane(&self) -> Lane {
        self.left_lane + 1
    }

    /// Where a path standing on `lane` ends up after crossing this rung.
    pub fn cross(&self, lane: Lane) -> Lane {
        if lane == self.left_lane {
            self.right_lane()
        } else if lane == self.right_lane() {
            self.left_lane
        } else {
            lane
        }
    }
}

/// Lane count plus every candidate rung, kept in generation order.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Ladder {
    lane_count: u32,
    rungs: Vec<Rung>,
}

impl Ladder {
    pub fn new(lane_count: u32, rungs: Vec<Rung>) -> Self {
        Self { lane_count, rungs }
    }

    pub fn lane_count(&self) -> u32 {
        self.lane_count
    }

    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    pub fn rung(&self, id: RungId) -> Option<&Rung> {
        self.rungs.iter().find(|rung| rung.id == id)
    }

    pub fn contains(&self, id: RungId) -> bool {
        self.rung(id).is_some()
    }
}

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Uniform value in `[0, 1)`.
pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}

/// Builds a ladder with `floor(lane_count * 1.5)` rungs placed at random
/// adjacent lane pairs and heights inside the layout's rung band.
///
/// Rungs are not deduplicated: two rungs may share a lane pair and land at
/// nearly the same height. With fewer than two lanes there is no adjacent
/// pair and the ladder has no rungs.
pub fn generate_ladder(lane_count: u32, seed: u32, layout: &LadderLayout) -> Ladder {
    if lane_count < 2 {
        return Ladder::new(lane_count, Vec::new());
    }
    let pairs = lane_count - 1;
    let (band_min, band_max) = layout.rung_band();
    let count = rung_count_for(lane_count);
    let mut rungs = Vec::with_capacity(count as usize);
    for seq in 0..count {
        let salt = seq << 1;
        let left_lane = ((rand_unit(seed, salt) * pairs as f32) as u32).min(pairs - 1);
        let y = rand_range(seed, salt + RUNG_Y_SALT, band_min, band_max);
        rungs.push(Rung::new(RungId::new(left_lane, seq), y));
    }
    debug!(lane_count, seed, rungs = rungs.len(), "generated ladder");
    Ladder::new(lane_count, rungs)
}
