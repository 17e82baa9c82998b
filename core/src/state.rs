use crate::action::RoundAction;
use crate::active::ActiveSet;
use crate::ladder::{generate_ladder, Ladder};
use crate::layout::LadderLayout;
use crate::resolve::{resolve_paths, Resolution};
use crate::rung_id::RungId;

/// One round of play: the generated ladder and the rungs drawn on it.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundState {
    pub seed: u32,
    pub layout: LadderLayout,
    pub ladder: Ladder,
    pub active: ActiveSet,
}

impl RoundState {
    pub fn generate(lane_count: u32, seed: u32, layout: LadderLayout) -> Self {
        Self {
            seed,
            layout,
            ladder: generate_ladder(lane_count, seed, &layout),
            active: ActiveSet::new(),
        }
    }

    pub fn lane_count(&self) -> u32 {
        self.ladder.lane_count()
    }

    pub fn toggle(&mut self, id: RungId) -> bool {
        self.active.toggle(id)
    }

    pub fn clear_lines(&mut self) {
        self.active.clear();
    }

    /// Throws away the ladder and drawn rungs, keeping lane count and layout.
    pub fn regenerate(&mut self, seed: u32) {
        *self = Self::generate(self.lane_count(), seed, self.layout);
    }

    pub fn resolve(&self) -> Resolution {
        resolve_paths(&self.ladder, &self.active)
    }

    /// Active ids that name a rung on this ladder.
    pub fn drawn_rungs(&self) -> impl Iterator<Item = RungId> + '_ {
        self.active.iter().filter(|id| self.ladder.contains(*id))
    }

    pub fn apply(&mut self, action: &RoundAction) {
        match action {
            RoundAction::Toggle { rung_id } => {
                self.toggle(*rung_id);
            }
            RoundAction::ClearLines => self.clear_lines(),
            RoundAction::Regenerate { seed } => self.regenerate(*seed),
        }
    }
}
