//! Suggested work order: easiest first, then shortest.

use crate::store::TaskStore;
use crate::task::Task;

/// Open tasks (Todo or InProgress) ordered by difficulty rank, then estimate.
///
/// The sort is stable, so exact ties keep insertion order.
pub fn suggest_order(store: &TaskStore) -> Vec<Task> {
    let mut open: Vec<Task> = store
        .list_all()
        .iter()
        .filter(|t| t.status.is_open())
        .cloned()
        .collect();
    open.sort_by_key(|t| (t.difficulty.rank(), t.estimated_minutes));
    open
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Difficulty, TaskStatus};
    use chrono::Utc;

    #[test]
    fn skips_done_tasks() {
        let mut s = TaskStore::new();
        s.create("a", 10, Difficulty::Low).unwrap();
        s.create("b", 5, Difficulty::Low).unwrap();
        s.transition("task-2", TaskStatus::Done, Utc::now()).unwrap();

        let order = suggest_order(&s);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].id, "task-1");
    }

    #[test]
    fn empty_board_gives_empty_order() {
        assert!(suggest_order(&TaskStore::new()).is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut s = TaskStore::new();
        s.create("first", 30, Difficulty::Medium).unwrap();
        s.create("second", 30, Difficulty::Medium).unwrap();
        s.create("third", 30, Difficulty::Medium).unwrap();
        s.transition("task-1", TaskStatus::InProgress, Utc::now()).unwrap();

        let names: Vec<_> = suggest_order(&s).into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }
}
