//! kankai-core: task model, lifecycle engine and read projections for the Kankai board

pub mod delay;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod planner;
pub mod progress;
pub mod store;
pub mod task;
pub mod time;

pub use delay::{scan_delays, DelayedTask};
pub use error::{BoardError, Result};
pub use events::BoardEvent;
pub use lifecycle::{efficiency, transition, Transition};
pub use planner::suggest_order;
pub use progress::{summarize, ProgressSummary};
pub use store::{TaskStore, TransitionOutcome};
pub use task::{Difficulty, Efficiency, EfficiencyClass, Task, TaskStatus};
pub use time::{format_minutes, minutes_between};
