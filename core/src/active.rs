use std::collections::BTreeSet;

use crate::rung_id::RungId;

/// Rungs the player has drawn. Membership is not checked against any ladder;
/// ids that match no rung are simply never consulted by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSet {
    ids: BTreeSet<RungId>,
}

impl ActiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id` and returns whether it is now drawn.
    pub fn toggle(&mut self, id: RungId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: RungId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RungId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<RungId> for ActiveSet {
    fn from_iter<I: IntoIterator<Item = RungId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
