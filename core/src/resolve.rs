use tracing::trace;

use crate::active::ActiveSet;
use crate::ladder::{Ladder, Lane, Rung};

/// Final lane for every starting lane; index is the start lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    ends: Vec<Lane>,
}

impl Resolution {
    pub fn identity(lane_count: u32) -> Self {
        Self {
            ends: (0..lane_count).collect(),
        }
    }

    pub fn lane_count(&self) -> u32 {
        self.ends.len() as u32
    }

    pub fn end_of(&self, start: Lane) -> Option<Lane> {
        self.ends.get(start as usize).copied()
    }

    pub fn start_for_end(&self, end: Lane) -> Option<Lane> {
        self.ends
            .iter()
            .position(|&lane| lane == end)
            .map(|start| start as Lane)
    }

    pub fn ends(&self) -> &[Lane] {
        &self.ends
    }

    /// `(start, end)` pairs in start order.
    pub fn pairs(&self) -> impl Iterator<Item = (Lane, Lane)> + '_ {
        self.ends
            .iter()
            .enumerate()
            .map(|(start, &end)| (start as Lane, end))
    }

    pub fn is_identity(&self) -> bool {
        self.pairs().all(|(start, end)| start == end)
    }

    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.ends.len()];
        for &end in &self.ends {
            match seen.get_mut(end as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

/// Active rungs of `ladder`, sorted top to bottom. The sort is stable, so
/// rungs at the same height keep generation order.
pub fn ordered_active_rungs<'a>(ladder: &'a Ladder, active: &ActiveSet) -> Vec<&'a Rung> {
    let mut rungs: Vec<&Rung> = ladder
        .rungs()
        .iter()
        .filter(|rung| active.contains(rung.id))
        .collect();
    rungs.sort_by(|a, b| a.y.total_cmp(&b.y));
    rungs
}

pub fn resolve_paths(ladder: &Ladder, active: &ActiveSet) -> Resolution {
    let rungs = ordered_active_rungs(ladder, active);
    let ends = (0..ladder.lane_count())
        .map(|start| rungs.iter().fold(start, |current, rung| rung.cross(current)))
        .collect();
    trace!(
        lane_count = ladder.lane_count(),
        active_rungs = rungs.len(),
        "resolved paths"
    );
    Resolution { ends }
}
