pub(crate) const ROUND_KEY: &str = "round.v1";
pub(crate) const TASKS_KEY: &str = "tasks";
pub(crate) const TASK_ID_COUNTER_KEY: &str = "tasks.next_id";
