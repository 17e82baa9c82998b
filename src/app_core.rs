use amidakuji_core::{
    is_valid_lane_count, LadderLayout, Resolution, RoundAction, RoundState, RungId,
};
use chrono::Utc;
use rand::Rng;
use tracing::info;

use crate::error::{AppError, Result};
use crate::persisted_store::{load_round, load_tasks, save_round, save_tasks};
use crate::store::KeyValueStore;
use crate::tasks::{Priority, Task, TaskList};

/// Application state behind the command handlers. Constructed with its store
/// and handed to each handler; every mutation is written back before return.
pub(crate) struct AppCore<S: KeyValueStore> {
    store: S,
    round: Option<RoundState>,
    tasks: TaskList,
}

pub(crate) fn fresh_seed() -> u32 {
    rand::rng().random()
}

impl<S: KeyValueStore> AppCore<S> {
    pub(crate) fn open(store: S) -> Result<Self> {
        let round = load_round(&store)?;
        let tasks = load_tasks(&store)?;
        Ok(Self {
            store,
            round,
            tasks,
        })
    }

    pub(crate) fn round(&self) -> Result<&RoundState> {
        self.round.as_ref().ok_or(AppError::NoRound)
    }

    /// Starts a new round, replacing any ladder and drawn rungs.
    pub(crate) fn new_round(
        &mut self,
        lane_count: u32,
        seed: Option<u32>,
        layout: LadderLayout,
    ) -> Result<&RoundState> {
        if !is_valid_lane_count(lane_count) {
            return Err(AppError::InvalidLaneCount(lane_count));
        }
        let seed = seed.unwrap_or_else(fresh_seed);
        let round = RoundState::generate(lane_count, seed, layout);
        info!(lane_count, seed, rungs = round.ladder.rungs().len(), "new round");
        save_round(&mut self.store, Some(&round))?;
        Ok(&*self.round.insert(round))
    }

    pub(crate) fn dispatch(&mut self, action: RoundAction) -> Result<&RoundState> {
        let round = self.round.as_mut().ok_or(AppError::NoRound)?;
        round.apply(&action);
        info!(?action, drawn = round.active.len(), "applied round action");
        save_round(&mut self.store, Some(&*round))?;
        Ok(&*round)
    }

    /// Returns whether the rung is drawn afterwards.
    pub(crate) fn toggle_rung(&mut self, rung_id: RungId) -> Result<bool> {
        let round = self.dispatch(RoundAction::Toggle { rung_id })?;
        Ok(round.active.contains(rung_id))
    }

    pub(crate) fn clear_lines(&mut self) -> Result<()> {
        self.dispatch(RoundAction::ClearLines)?;
        Ok(())
    }

    pub(crate) fn reset_round(&mut self, seed: Option<u32>) -> Result<&RoundState> {
        let seed = seed.unwrap_or_else(fresh_seed);
        self.dispatch(RoundAction::Regenerate { seed })
    }

    pub(crate) fn results(&self) -> Result<Resolution> {
        Ok(self.round()?.resolve())
    }

    pub(crate) fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub(crate) fn add_task(&mut self, text: &str, priority: Priority) -> Result<Task> {
        let task = self.tasks.add(text, priority, Utc::now())?.clone();
        save_tasks(&mut self.store, &self.tasks)?;
        info!(id = task.id, priority = priority.label(), "added task");
        Ok(task)
    }

    pub(crate) fn toggle_task(&mut self, id: u64) -> Result<bool> {
        let completed = self.tasks.toggle(id)?;
        save_tasks(&mut self.store, &self.tasks)?;
        Ok(completed)
    }

    pub(crate) fn delete_task(&mut self, id: u64) -> Result<Task> {
        let task = self.tasks.delete(id)?;
        save_tasks(&mut self.store, &self.tasks)?;
        Ok(task)
    }

    pub(crate) fn clear_completed_tasks(&mut self) -> Result<usize> {
        let removed = self.tasks.clear_completed();
        if removed > 0 {
            save_tasks(&mut self.store, &self.tasks)?;
        }
        Ok(removed)
    }

    #[cfg(test)]
    pub(crate) fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::tasks::{TaskError, TaskFilter};

    fn app() -> AppCore<MemoryStore> {
        AppCore::open(MemoryStore::default()).expect("open")
    }

    #[test]
    fn lane_count_is_checked_before_generation() {
        let mut app = app();
        for bad in [0, 1, 11] {
            assert!(matches!(
                app.new_round(bad, Some(1), LadderLayout::default()),
                Err(AppError::InvalidLaneCount(n)) if n == bad
            ));
        }
        assert!(matches!(app.round(), Err(AppError::NoRound)));
        assert!(matches!(app.results(), Err(AppError::NoRound)));
        assert!(matches!(app.clear_lines(), Err(AppError::NoRound)));
    }

    #[test]
    fn round_persists_across_reopen() {
        let mut app = app();
        let first = app
            .new_round(5, Some(0xABCD), LadderLayout::default())
            .expect("new")
            .ladder
            .rungs()[0]
            .id;
        assert!(app.toggle_rung(first).expect("toggle"));
        let expected = app.results().expect("results");

        let reopened = AppCore::open(app.into_store()).expect("reopen");
        assert_eq!(reopened.round().expect("round").seed, 0xABCD);
        assert!(reopened.round().expect("round").active.contains(first));
        assert_eq!(reopened.results().expect("results"), expected);
    }

    #[test]
    fn new_round_replaces_drawn_rungs() {
        let mut app = app();
        let id = app
            .new_round(4, Some(3), LadderLayout::default())
            .expect("new")
            .ladder
            .rungs()[0]
            .id;
        app.toggle_rung(id).expect("toggle");
        let round = app.new_round(6, Some(4), LadderLayout::default()).expect("new");
        assert_eq!(round.lane_count(), 6);
        assert!(round.active.is_empty());
    }

    #[test]
    fn clear_and_reset() {
        let mut app = app();
        let ids: Vec<RungId> = app
            .new_round(3, Some(8), LadderLayout::default())
            .expect("new")
            .ladder
            .rungs()
            .iter()
            .map(|rung| rung.id)
            .collect();
        for id in &ids {
            app.toggle_rung(*id).expect("toggle");
        }
        app.clear_lines().expect("clear");
        assert!(app.results().expect("results").is_identity());
        assert_eq!(app.round().expect("round").ladder.rungs().len(), ids.len());

        app.toggle_rung(ids[0]).expect("toggle");
        let round = app.reset_round(Some(99)).expect("reset");
        assert_eq!(round.seed, 99);
        assert_eq!(round.lane_count(), 3);
        assert!(round.active.is_empty());
    }

    #[test]
    fn task_flow_persists() {
        let mut app = app();
        let a = app.add_task("draft", Priority::High).expect("add");
        let b = app.add_task("review", Priority::Low).expect("add");
        assert!(matches!(
            app.add_task("  ", Priority::Low),
            Err(AppError::Task(TaskError::EmptyText))
        ));
        assert!(app.toggle_task(a.id).expect("toggle"));
        assert_eq!(app.clear_completed_tasks().expect("clear"), 1);
        assert_eq!(app.clear_completed_tasks().expect("clear"), 0);

        let mut app = AppCore::open(app.into_store()).expect("reopen");
        let pending: Vec<u64> = app.tasks().filtered(TaskFilter::Pending).map(|t| t.id).collect();
        assert_eq!(pending, vec![b.id]);
        assert_eq!(app.delete_task(b.id).expect("delete").text, "review");
        assert!(matches!(
            app.toggle_task(b.id),
            Err(AppError::Task(TaskError::NotFound(_)))
        ));
        let c = app.add_task("ship", Priority::Medium).expect("add");
        assert_eq!(c.id, 2);
    }
}
