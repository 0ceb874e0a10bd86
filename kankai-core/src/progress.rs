//! Progress summary: counts per status and the completion percentage.

use serde::{Deserialize, Serialize};

use crate::store::TaskStore;
use crate::task::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub done: usize,
    pub in_progress: usize,
    /// Not started: `total - done - in_progress`.
    pub pending: usize,
    pub total: usize,
    /// 0..=100, one decimal. 0 on an empty board.
    pub done_percentage: f64,
}

impl ProgressSummary {
    /// Chart categories in display order.
    pub fn distribution(&self) -> [(&'static str, usize); 3] {
        [
            (TaskStatus::Done.label(), self.done),
            (TaskStatus::InProgress.label(), self.in_progress),
            ("Pending", self.pending),
        ]
    }
}

pub fn summarize(store: &TaskStore) -> ProgressSummary {
    let tasks = store.list_all();
    let total = tasks.len();
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    let in_progress = tasks.iter().filter(|t| t.status == TaskStatus::InProgress).count();

    let done_percentage = if total == 0 {
        0.0
    } else {
        (done as f64 / total as f64 * 1000.0).round() / 10.0
    };

    ProgressSummary {
        done,
        in_progress,
        pending: total - done - in_progress,
        total,
        done_percentage,
    }
}
