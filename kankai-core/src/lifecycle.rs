//! Task lifecycle state machine.
//!
//! Any status may move to any other status. Entering a status applies the
//! same field rules regardless of where the task came from; only a move to
//! the current status is special (a no-op).
//!
//! - -> Todo: clear start/completion/efficiency and the delay latch
//! - -> InProgress: stamp `started_at` unless already set, clear completion/efficiency and the latch
//! - -> Done: stamp `completed_at`, score efficiency from `started_at` (or mark untracked)

use chrono::{DateTime, Utc};

use crate::task::{Efficiency, EfficiencyClass, Task, TaskStatus};
use crate::time::{format_minutes, minutes_between};

/// Result of applying a status change to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Task was already in the requested status; nothing changed.
    Unchanged,
    Changed { from: TaskStatus, to: TaskStatus },
}

impl Transition {
    pub fn is_changed(self) -> bool {
        matches!(self, Transition::Changed { .. })
    }
}

pub fn transition(task: &mut Task, target: TaskStatus, now: DateTime<Utc>) -> Transition {
    if task.status == target {
        return Transition::Unchanged;
    }

    let from = task.status;
    match target {
        TaskStatus::Todo => {
            task.started_at = None;
            task.completed_at = None;
            task.efficiency = None;
        }
        TaskStatus::InProgress => {
            if task.started_at.is_none() {
                task.started_at = Some(now);
            }
            task.completed_at = None;
            task.efficiency = None;
        }
        TaskStatus::Done => {
            task.completed_at = Some(now);
            task.efficiency = Some(match task.started_at {
                Some(started) => efficiency(minutes_between(started, now), f64::from(task.estimated_minutes)),
                None => Efficiency::untracked(),
            });
        }
    }
    // The latch only lives inside an in-progress episode.
    task.delay_notified = false;
    task.status = target;

    Transition::Changed { from, to: target }
}

/// Score time taken against the estimate with a 10% tolerance band.
pub fn efficiency(taken_minutes: f64, estimated_minutes: f64) -> Efficiency {
    let margin = estimated_minutes * 0.10;
    let difference = taken_minutes - estimated_minutes;
    let detail = format!(
        "({}/{})",
        format_minutes(taken_minutes),
        format_minutes(estimated_minutes)
    );

    if difference < -margin {
        Efficiency {
            label: format!("Early {detail}"),
            class: EfficiencyClass::Good,
        }
    } else if difference > margin {
        Efficiency {
            label: format!("Late {detail}"),
            class: EfficiencyClass::Bad,
        }
    } else {
        Efficiency {
            label: format!("On time {detail}"),
            class: EfficiencyClass::Neutral,
        }
    }
}
