//! Board events and the notification text each one produces.

use crate::delay::DelayedTask;
use crate::lifecycle::Transition;
use crate::store::TransitionOutcome;
use crate::task::{Task, TaskStatus};
use crate::time::format_minutes;

#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Created {
        id: String,
        name: String,
        estimated_minutes: u32,
    },
    Moved {
        id: String,
        name: String,
        from: TaskStatus,
        to: TaskStatus,
        efficiency: Option<String>,
    },
    Deleted {
        id: String,
        name: String,
    },
    Delayed {
        id: String,
        name: String,
        elapsed_minutes: f64,
        estimated_minutes: u32,
    },
}

impl BoardEvent {
    pub fn created(task: &Task) -> Self {
        BoardEvent::Created {
            id: task.id.clone(),
            name: task.name.clone(),
            estimated_minutes: task.estimated_minutes,
        }
    }

    /// `None` for a no-op transition: those never notify.
    pub fn moved(outcome: &TransitionOutcome) -> Option<Self> {
        let Transition::Changed { from, to } = outcome.transition else {
            return None;
        };
        let efficiency = match to {
            TaskStatus::Done => outcome.task.efficiency_label().map(str::to_string),
            _ => None,
        };
        Some(BoardEvent::Moved {
            id: outcome.task.id.clone(),
            name: outcome.task.name.clone(),
            from,
            to,
            efficiency,
        })
    }

    pub fn deleted(task: &Task) -> Self {
        BoardEvent::Deleted {
            id: task.id.clone(),
            name: task.name.clone(),
        }
    }

    pub fn delayed(d: DelayedTask) -> Self {
        BoardEvent::Delayed {
            id: d.id,
            name: d.name,
            elapsed_minutes: d.elapsed_minutes,
            estimated_minutes: d.estimated_minutes,
        }
    }

    pub fn task_id(&self) -> &str {
        match self {
            BoardEvent::Created { id, .. }
            | BoardEvent::Moved { id, .. }
            | BoardEvent::Deleted { id, .. }
            | BoardEvent::Delayed { id, .. } => id,
        }
    }

    /// Human-readable message handed to the notification gateway.
    pub fn message(&self) -> String {
        match self {
            BoardEvent::Created {
                name,
                estimated_minutes,
                ..
            } => format!(
                "New task created: '{name}' (est. {})",
                format_minutes(f64::from(*estimated_minutes))
            ),
            BoardEvent::Moved {
                name,
                from,
                to,
                efficiency,
                ..
            } => {
                let mut msg = format!("Task '{name}' moved from {} to {}", from.label(), to.label());
                if let Some(eff) = efficiency {
                    msg.push_str(" - ");
                    msg.push_str(eff);
                }
                msg
            }
            BoardEvent::Deleted { name, .. } => format!("Task '{name}' deleted"),
            BoardEvent::Delayed {
                name,
                elapsed_minutes,
                estimated_minutes,
                ..
            } => format!(
                "Task '{name}' is delayed: {} elapsed vs {} estimated",
                format_minutes(*elapsed_minutes),
                format_minutes(f64::from(*estimated_minutes))
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::task::Difficulty;
    use chrono::{Duration, Utc};

    #[test]
    fn created_message() {
        let mut s = TaskStore::new();
        let t = s.create("Write report", 90, Difficulty::Low).unwrap();
        assert_eq!(
            BoardEvent::created(&t).message(),
            "New task created: 'Write report' (est. 1h 30m)"
        );
    }

    #[test]
    fn done_message_carries_efficiency() {
        let now = Utc::now();
        let mut s = TaskStore::new();
        s.create("Review", 60, Difficulty::Low).unwrap();
        s.transition("task-1", TaskStatus::InProgress, now - Duration::minutes(30))
            .unwrap();
        let out = s.transition("task-1", TaskStatus::Done, now).unwrap();

        let ev = BoardEvent::moved(&out).unwrap();
        assert_eq!(
            ev.message(),
            "Task 'Review' moved from In progress to Done - Early (30m/1h)"
        );
    }

    #[test]
    fn noop_move_has_no_event() {
        let mut s = TaskStore::new();
        s.create("Review", 60, Difficulty::Low).unwrap();
        let out = s.transition("task-1", TaskStatus::Todo, Utc::now()).unwrap();
        assert!(BoardEvent::moved(&out).is_none());
    }

    #[test]
    fn delayed_message() {
        let ev = BoardEvent::delayed(DelayedTask {
            id: "task-2".into(),
            name: "Deploy".into(),
            elapsed_minutes: 75.0,
            estimated_minutes: 60,
        });
        assert_eq!(ev.task_id(), "task-2");
        assert_eq!(ev.message(), "Task 'Deploy' is delayed: 1h 15m elapsed vs 1h estimated");
    }
}
