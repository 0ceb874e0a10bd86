//! Delay detection: in-progress tasks running past their estimate.
//!
//! The scan latches `delay_notified` so each in-progress episode produces at
//! most one alert. Re-entering InProgress clears the latch (see lifecycle).

use chrono::{DateTime, Utc};

use crate::store::TaskStore;
use crate::task::TaskStatus;
use crate::time::minutes_between;

#[derive(Debug, Clone, PartialEq)]
pub struct DelayedTask {
    pub id: String,
    pub name: String,
    pub elapsed_minutes: f64,
    pub estimated_minutes: u32,
}

/// Find newly delayed tasks and latch them. Status is never changed.
pub fn scan_delays(store: &mut TaskStore, now: DateTime<Utc>) -> Vec<DelayedTask> {
    let mut out = Vec::new();

    for task in store.tasks_mut() {
        if task.status != TaskStatus::InProgress || task.delay_notified {
            continue;
        }
        let Some(started) = task.started_at else { continue };

        let elapsed = minutes_between(started, now);
        if elapsed > f64::from(task.estimated_minutes) {
            task.delay_notified = true;
            out.push(DelayedTask {
                id: task.id.clone(),
                name: task.name.clone(),
                elapsed_minutes: elapsed,
                estimated_minutes: task.estimated_minutes,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Difficulty;
    use chrono::Duration;

    #[test]
    fn fires_once_per_episode() {
        let now = Utc::now();
        let mut s = TaskStore::new();
        s.create("deploy", 10, Difficulty::Medium).unwrap();
        s.transition("task-1", TaskStatus::InProgress, now - Duration::minutes(11))
            .unwrap();

        let first = scan_delays(&mut s, now);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "task-1");
        assert_eq!(first[0].estimated_minutes, 10);

        assert!(scan_delays(&mut s, now + Duration::minutes(5)).is_empty());
        assert!(scan_delays(&mut s, now + Duration::minutes(10)).is_empty());
        assert!(s.get("task-1").unwrap().delay_notified);
    }

    #[test]
    fn re_entering_in_progress_rearms() {
        let now = Utc::now();
        let mut s = TaskStore::new();
        s.create("deploy", 10, Difficulty::Medium).unwrap();
        s.transition("task-1", TaskStatus::InProgress, now - Duration::minutes(11))
            .unwrap();
        assert_eq!(scan_delays(&mut s, now).len(), 1);

        // Done -> InProgress keeps the old start, so the task is still late.
        s.transition("task-1", TaskStatus::Done, now).unwrap();
        s.transition("task-1", TaskStatus::InProgress, now).unwrap();
        assert_eq!(scan_delays(&mut s, now + Duration::minutes(1)).len(), 1);
    }

    #[test]
    fn within_estimate_or_not_started_is_quiet() {
        let now = Utc::now();
        let mut s = TaskStore::new();
        s.create("short", 10, Difficulty::Low).unwrap();
        s.create("idle", 1, Difficulty::Low).unwrap();
        s.transition("task-1", TaskStatus::InProgress, now - Duration::minutes(10))
            .unwrap();

        // Exactly at the estimate is not late yet.
        assert!(scan_delays(&mut s, now).is_empty());
        assert_eq!(s.get("task-1").unwrap().status, TaskStatus::InProgress);
    }
}
