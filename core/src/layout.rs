use rkyv::{Archive, Deserialize, Serialize};

pub const LANE_COUNT_MIN: u32 = 2;
pub const LANE_COUNT_MAX: u32 = 10;
pub const DEFAULT_LANE_COUNT: u32 = 4;

/// Rungs per lane, floored when multiplied out.
pub const RUNGS_PER_LANE_NUM: u32 = 3;
pub const RUNGS_PER_LANE_DEN: u32 = 2;

pub const LANE_END_MARGIN: f32 = 20.0;
pub const RUNG_BAND_MARGIN: f32 = 50.0;

pub const DEFAULT_BOARD_WIDTH: f32 = 760.0;
pub const DEFAULT_BOARD_HEIGHT: f32 = 460.0;

#[derive(Clone, Copy, Debug, PartialEq, Archive, Serialize, Deserialize)]
pub struct LadderLayout {
    pub width: f32,
    pub height: f32,
}

impl LadderLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn lane_spacing(&self, lane_count: u32) -> f32 {
        self.width / (lane_count as f32 + 1.0)
    }

    pub fn lane_x(&self, lane: u32, lane_count: u32) -> f32 {
        self.lane_spacing(lane_count) * (lane as f32 + 1.0)
    }

    pub fn lane_top(&self) -> f32 {
        LANE_END_MARGIN
    }

    pub fn lane_bottom(&self) -> f32 {
        (self.height - LANE_END_MARGIN).max(LANE_END_MARGIN)
    }

    /// Vertical band rungs are drawn from, as `(min, max)`. Collapses to a
    /// single line on boards shorter than twice the margin.
    pub fn rung_band(&self) -> (f32, f32) {
        let span = (self.height - RUNG_BAND_MARGIN * 2.0).max(0.0);
        (RUNG_BAND_MARGIN, RUNG_BAND_MARGIN + span)
    }
}

impl Default for LadderLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_WIDTH, DEFAULT_BOARD_HEIGHT)
    }
}

pub fn is_valid_lane_count(lane_count: u32) -> bool {
    (LANE_COUNT_MIN..=LANE_COUNT_MAX).contains(&lane_count)
}

pub fn rung_count_for(lane_count: u32) -> u32 {
    lane_count * RUNGS_PER_LANE_NUM / RUNGS_PER_LANE_DEN
}

pub fn player_label(lane: u32) -> String {
    format!("Player {}", lane + 1)
}

pub fn goal_label(lane: u32) -> String {
    format!("Goal {}", lane + 1)
}
