use amidakuji_core::{decode, encode, RoundSnapshot, RoundState, ROUND_SNAPSHOT_VERSION};
use tracing::{debug, warn};

use crate::error::Result;
use crate::persisted::{ROUND_KEY, TASKS_KEY, TASK_ID_COUNTER_KEY};
use crate::store::{KeyValueStore, StoreError};
use crate::tasks::{Task, TaskList};

/// Stale or undecodable snapshots read back as no round at all.
pub(crate) fn load_round<S: KeyValueStore>(store: &S) -> Result<Option<RoundState>> {
    let Some(bytes) = store.get_bytes(ROUND_KEY)? else {
        return Ok(None);
    };
    let snapshot = match decode::<RoundSnapshot>(&bytes) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(%err, "discarding unreadable round snapshot");
            return Ok(None);
        }
    };
    if snapshot.version != ROUND_SNAPSHOT_VERSION {
        warn!(
            found = snapshot.version,
            expected = ROUND_SNAPSHOT_VERSION,
            "discarding round snapshot with stale version"
        );
        return Ok(None);
    }
    Ok(Some(snapshot.into_state()))
}

pub(crate) fn save_round<S: KeyValueStore>(store: &mut S, round: Option<&RoundState>) -> Result<()> {
    match round {
        Some(round) => {
            let bytes = encode(&RoundSnapshot::from_state(round))?;
            store.put_bytes(ROUND_KEY, &bytes)?;
            debug!(lanes = round.lane_count(), drawn = round.active.len(), "saved round");
        }
        None => store.delete_key(ROUND_KEY)?,
    }
    Ok(())
}

/// Task records that are not text read back as absent.
fn get_task_string<S: KeyValueStore>(store: &S, key: &str) -> Result<Option<String>> {
    match store.get_string(key) {
        Ok(raw) => Ok(raw),
        Err(StoreError::NotUtf8(key)) => {
            warn!(key, "ignoring task record that is not UTF-8");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn load_tasks<S: KeyValueStore>(store: &S) -> Result<TaskList> {
    let tasks = match get_task_string(store, TASKS_KEY)? {
        Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(%err, "ignoring malformed task list");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    let next_id = get_task_string(store, TASK_ID_COUNTER_KEY)?
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(%err, raw = raw.trim(), "ignoring malformed task id counter");
                None
            }
        });
    Ok(TaskList::from_parts(tasks, next_id))
}

pub(crate) fn save_tasks<S: KeyValueStore>(store: &mut S, tasks: &TaskList) -> Result<()> {
    let json = serde_json::to_string(tasks.tasks())?;
    store.put_string(TASKS_KEY, &json)?;
    store.put_string(TASK_ID_COUNTER_KEY, &tasks.next_id().to_string())?;
    debug!(count = tasks.tasks().len(), next_id = tasks.next_id(), "saved tasks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use amidakuji_core::{LadderLayout, RungId};
    use chrono::Utc;

    use super::*;
    use crate::store::MemoryStore;
    use crate::tasks::Priority;

    #[test]
    fn round_survives_a_save_load_cycle() {
        let mut store = MemoryStore::default();
        let mut round = RoundState::generate(4, 11, LadderLayout::default());
        let id = round.ladder.rungs()[1].id;
        round.toggle(id);
        round.toggle(RungId::new(9, 90));
        save_round(&mut store, Some(&round)).expect("save");
        let loaded = load_round(&store).expect("load").expect("round");
        assert_eq!(loaded, round);
        save_round(&mut store, None).expect("clear");
        assert!(load_round(&store).expect("load").is_none());
    }

    #[test]
    fn stale_snapshot_is_ignored() {
        let mut store = MemoryStore::default();
        let round = RoundState::generate(3, 5, LadderLayout::default());
        let mut snapshot = RoundSnapshot::from_state(&round);
        snapshot.version = ROUND_SNAPSHOT_VERSION + 1;
        store
            .put_bytes(ROUND_KEY, &encode(&snapshot).expect("encode"))
            .expect("put");
        assert!(load_round(&store).expect("load").is_none());
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let mut store = MemoryStore::default();
        store.put_bytes(ROUND_KEY, b"not a snapshot").expect("put");
        assert!(load_round(&store).expect("load").is_none());
    }

    #[test]
    fn tasks_and_counter_round_trip() {
        let mut store = MemoryStore::default();
        let mut tasks = TaskList::default();
        tasks.add("one", Priority::High, Utc::now()).expect("add");
        tasks.add("two", Priority::Low, Utc::now()).expect("add");
        tasks.delete(1).expect("delete");
        save_tasks(&mut store, &tasks).expect("save");
        let loaded = load_tasks(&store).expect("load");
        assert_eq!(loaded, tasks);
        assert_eq!(loaded.next_id(), 2);
    }

    #[test]
    fn malformed_task_records_fall_back_to_empty() {
        let mut store = MemoryStore::default();
        store.put_string(TASKS_KEY, "{not json").expect("put");
        store.put_string(TASK_ID_COUNTER_KEY, "seven").expect("put");
        let loaded = load_tasks(&store).expect("load");
        assert!(loaded.tasks().is_empty());
        assert_eq!(loaded.next_id(), 0);
    }

    #[test]
    fn binary_task_records_fall_back_to_empty() {
        let mut store = MemoryStore::default();
        store.put_bytes(TASKS_KEY, &[0xFF, 0xFE, b'[', b']']).expect("put");
        store.put_bytes(TASK_ID_COUNTER_KEY, &[0xC0, b'7']).expect("put");
        let loaded = load_tasks(&store).expect("load");
        assert!(loaded.tasks().is_empty());
        assert_eq!(loaded.next_id(), 0);
    }

    #[test]
    fn binary_task_records_leave_the_round_loadable() {
        let mut store = MemoryStore::default();
        let round = RoundState::generate(3, 21, LadderLayout::default());
        save_round(&mut store, Some(&round)).expect("save");
        store.put_bytes(TASKS_KEY, &[0xFF, 0xFE, b'[', b']']).expect("put");
        let app = crate::app_core::AppCore::open(store).expect("open");
        assert_eq!(app.round().expect("round"), &round);
        assert!(app.tasks().tasks().is_empty());
    }
}
