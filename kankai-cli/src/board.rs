//! Shared board handle used by the shell and the delay monitor.
//!
//! The store sits behind one mutex. Every read-modify-write (create, move,
//! delete, delay latch) runs entirely under the lock; read projections copy
//! what they need and release it before doing any further work. Events are
//! queued for the dispatcher after the lock is released.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use kankai_core::{
    scan_delays, suggest_order, summarize, BoardEvent, Difficulty, ProgressSummary, Result, Task,
    TaskStatus, TaskStore, TransitionOutcome,
};
use kankai_report::ReportError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::notify::EventSender;

#[derive(Clone)]
pub struct Board {
    store: Arc<Mutex<TaskStore>>,
    events: EventSender,
}

impl Board {
    pub fn new(store: TaskStore, events: EventSender) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            events,
        }
    }

    pub fn create_task(&self, name: &str, estimated_minutes: i64, difficulty: &str) -> Result<Task> {
        let difficulty: Difficulty = difficulty.parse()?;
        let task = self.store.lock().create(name, estimated_minutes, difficulty)?;
        debug!(task_id = %task.id, "task created");
        self.emit(BoardEvent::created(&task));
        Ok(task)
    }

    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store.lock().get(id).cloned()
    }

    pub fn update_status(&self, id: &str, status: &str) -> Result<TransitionOutcome> {
        self.update_status_at(id, status, Utc::now())
    }

    pub fn update_status_at(&self, id: &str, status: &str, now: DateTime<Utc>) -> Result<TransitionOutcome> {
        let target: TaskStatus = status.parse()?;
        let outcome = self.store.lock().transition(id, target, now)?;
        match BoardEvent::moved(&outcome) {
            Some(event) => {
                debug!(task_id = %id, to = %target, "task moved");
                self.emit(event);
            }
            None => debug!(task_id = %id, status = %target, "task already in requested status"),
        }
        Ok(outcome)
    }

    pub fn delete_task(&self, id: &str) -> Result<Task> {
        let task = self.store.lock().delete(id)?;
        debug!(task_id = %id, "task deleted");
        self.emit(BoardEvent::deleted(&task));
        Ok(task)
    }

    pub fn suggest_order(&self) -> Vec<Task> {
        suggest_order(&self.store.lock())
    }

    pub fn progress(&self) -> ProgressSummary {
        summarize(&self.store.lock())
    }

    /// Consistent copy of the store for reporting.
    pub fn snapshot(&self) -> TaskStore {
        self.store.lock().clone()
    }

    pub fn export_xlsx(&self, tz: Tz) -> std::result::Result<Vec<u8>, ReportError> {
        let snapshot = self.snapshot();
        kankai_report::xlsx_report(snapshot.list_all(), &summarize(&snapshot), tz)
    }

    pub fn export_csv<W: std::io::Write>(&self, tz: Tz, writer: W) -> std::result::Result<(), ReportError> {
        let snapshot = self.snapshot();
        kankai_report::write_csv(snapshot.list_all(), tz, writer)
    }

    /// One delay-monitor tick: latch late tasks and queue their alerts.
    pub fn check_delays(&self, now: DateTime<Utc>) -> usize {
        let delayed = scan_delays(&mut self.store.lock(), now);
        let count = delayed.len();
        for d in delayed {
            self.emit(BoardEvent::delayed(d));
        }
        count
    }

    /// True once the dispatcher has gone away.
    pub fn events_closed(&self) -> bool {
        self.events.is_closed()
    }

    fn emit(&self, event: BoardEvent) {
        if self.events.send(event).is_err() {
            debug!("notification dispatcher stopped; event dropped");
        }
    }
}
