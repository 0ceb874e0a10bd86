//! Task model for the board: status, difficulty and efficiency descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;
use crate::time::format_minutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
        }
    }

    /// Board column title.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Todo and InProgress tasks are still pending work.
    pub fn is_open(self) -> bool {
        !matches!(self, TaskStatus::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "inprogress" | "in_progress" | "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(BoardError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Difficulty {
    /// Sort rank used by the suggested order.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Low => "Low",
            Difficulty::Medium => "Medium",
            Difficulty::High => "High",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "low" => Ok(Difficulty::Low),
            "2" | "medium" => Ok(Difficulty::Medium),
            "3" | "high" => Ok(Difficulty::High),
            other => Err(BoardError::validation(
                "difficulty",
                format!("unknown level '{other}' (expected low, medium or high)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EfficiencyClass {
    Good,
    Neutral,
    Bad,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Efficiency {
    pub label: String,
    pub class: EfficiencyClass,
}

impl Efficiency {
    /// Completed without a recorded start time.
    pub fn untracked() -> Self {
        Self {
            label: "Completed (no time tracked)".to_string(),
            class: EfficiencyClass::Neutral,
        }
    }
}

/// Core task record.
///
/// Status-dependent fields (`started_at`, `completed_at`, `efficiency`,
/// `delay_notified`) change only through [`crate::lifecycle::transition`]
/// and the delay scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,

    /// Minutes, always > 0.
    pub estimated_minutes: u32,
    pub difficulty: Difficulty,
    pub status: TaskStatus,

    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub efficiency: Option<Efficiency>,

    /// Latched once a delay alert fired for the current in-progress episode.
    pub delay_notified: bool,
}

impl Task {
    pub(crate) fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        estimated_minutes: u32,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            estimated_minutes,
            difficulty,
            status: TaskStatus::Todo,
            started_at: None,
            completed_at: None,
            efficiency: None,
            delay_notified: false,
        }
    }

    /// Estimate rendered as "Xh Ym".
    pub fn estimate_label(&self) -> String {
        format_minutes(f64::from(self.estimated_minutes))
    }

    pub fn efficiency_label(&self) -> Option<&str> {
        self.efficiency.as_ref().map(|e| e.label.as_str())
    }
}
