//! TaskStore — the board's single in-memory collection.
//!
//! Tasks are kept in insertion order and looked up by linear scan. Ids are
//! `task-<n>` with `n` drawn from a counter that starts at 1 and is never
//! reused, even after deletes.

use chrono::{DateTime, Duration, Utc};

use crate::error::{BoardError, Result};
use crate::lifecycle::{self, Transition};
use crate::task::{Difficulty, Task, TaskStatus};

/// A status change as seen by the caller: the updated task plus what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub task: Task,
    pub transition: Transition,
}

#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Board preloaded with the demonstration tasks, built through the
    /// regular create/transition path, so seed data obeys the same rules.
    pub fn demo(now: DateTime<Utc>) -> Result<Self> {
        let mut store = Self::new();
        let seed = [
            ("Design alpha prototype", 480, Difficulty::Medium),
            ("UX market research", 720, Difficulty::High),
            ("Project K kick-off meeting", 60, Difficulty::Low),
            ("Set up dev environment", 240, Difficulty::Low),
        ];
        for (name, minutes, difficulty) in seed {
            store.create(name, minutes, difficulty)?;
        }
        store.transition("task-3", TaskStatus::InProgress, now - Duration::minutes(25))?;
        store.transition("task-4", TaskStatus::InProgress, now - Duration::minutes(250))?;
        store.transition("task-4", TaskStatus::Done, now)?;
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Validate and insert a new Todo task. Nothing is inserted on error.
    pub fn create(&mut self, name: &str, estimated_minutes: i64, difficulty: Difficulty) -> Result<Task> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoardError::validation("name", "must not be empty"));
        }
        if estimated_minutes <= 0 {
            return Err(BoardError::validation(
                "estimated_minutes",
                format!("must be positive, got {estimated_minutes}"),
            ));
        }
        let minutes = u32::try_from(estimated_minutes).map_err(|_| {
            BoardError::validation("estimated_minutes", format!("too large: {estimated_minutes}"))
        })?;

        let task = Task::new(format!("task-{}", self.next_id), name, minutes, difficulty);
        self.next_id += 1;
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn get(&self, id: &str) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))
    }

    /// All tasks in insertion order.
    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    /// One board column, insertion order.
    pub fn list_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(pos))
    }

    /// Move a task to `target` through the lifecycle engine.
    pub fn transition(&mut self, id: &str, target: TaskStatus, now: DateTime<Utc>) -> Result<TransitionOutcome> {
        let task = self.get_mut(id)?;
        let transition = lifecycle::transition(task, target, now);
        Ok(TransitionOutcome {
            task: task.clone(),
            transition,
        })
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))
    }

    pub(crate) fn tasks_mut(&mut self) -> impl Iterator<Item = &mut Task> {
        self.tasks.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_and_not_reused() {
        let mut s = TaskStore::new();
        let a = s.create("a", 10, Difficulty::Low).unwrap();
        let b = s.create("b", 10, Difficulty::Low).unwrap();
        assert_eq!(a.id, "task-1");
        assert_eq!(b.id, "task-2");

        s.delete("task-2").unwrap();
        let c = s.create("c", 10, Difficulty::Low).unwrap();
        assert_eq!(c.id, "task-3");
    }

    #[test]
    fn create_trims_name_and_starts_in_todo() {
        let mut s = TaskStore::new();
        let t = s.create("  plan sprint  ", 45, Difficulty::High).unwrap();
        assert_eq!(t.name, "plan sprint");
        assert_eq!(t.status, TaskStatus::Todo);
        assert!(t.started_at.is_none() && t.completed_at.is_none() && t.efficiency.is_none());
        assert!(!t.delay_notified);
    }

    #[test]
    fn rejected_create_leaves_store_untouched() {
        let mut s = TaskStore::new();
        assert!(matches!(
            s.create("   ", 10, Difficulty::Low),
            Err(BoardError::Validation { field: "name", .. })
        ));
        assert!(matches!(
            s.create("x", 0, Difficulty::Low),
            Err(BoardError::Validation { field: "estimated_minutes", .. })
        ));
        assert!(matches!(
            s.create("x", -5, Difficulty::Low),
            Err(BoardError::Validation { field: "estimated_minutes", .. })
        ));
        assert!(s.is_empty());

        // Failed creates don't burn ids.
        assert_eq!(s.create("ok", 5, Difficulty::Low).unwrap().id, "task-1");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut s = TaskStore::new();
        s.create("a", 10, Difficulty::Low).unwrap();
        assert_eq!(s.delete("task-9"), Err(BoardError::TaskNotFound("task-9".into())));
        assert!(matches!(
            s.transition("task-9", TaskStatus::Done, Utc::now()),
            Err(BoardError::TaskNotFound(_))
        ));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn demo_board_has_one_task_per_column_at_least() {
        let s = TaskStore::demo(Utc::now()).unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.list_by_status(TaskStatus::Todo).len(), 2);
        assert_eq!(s.list_by_status(TaskStatus::InProgress).len(), 1);
        let done = s.list_by_status(TaskStatus::Done);
        assert_eq!(done.len(), 1);
        assert!(done[0].efficiency_label().unwrap().starts_with("On time"));
        assert_eq!(done[0].id, "task-4");
    }

    #[test]
    fn demo_seed_goes_through_validation() {
        let mut s = TaskStore::demo(Utc::now()).unwrap();
        let ids: Vec<&str> = s.list_all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["task-1", "task-2", "task-3", "task-4"]);
        assert_eq!(s.create("Next", 30, Difficulty::Low).unwrap().id, "task-5");
    }
}
