//! Outbound notifications: the gateway seam and the background dispatcher.
//!
//! Board operations push [`BoardEvent`]s into an unbounded channel and return
//! immediately. A single dispatcher task drains the channel and hands each
//! message to the gateway. Delivery failures are logged and dropped; they
//! never reach the operation that produced the event.

use kankai_core::BoardEvent;
use std::future::Future;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Best-effort message delivery. Returns `false` on any failure.
pub trait Notifier: Send + Sync + 'static {
    fn send(&self, text: &str) -> impl Future<Output = bool> + Send;
}

pub type EventSender = mpsc::UnboundedSender<BoardEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<BoardEvent>;

pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Run until every sender is dropped. Returns the number of delivered messages.
pub async fn run_dispatcher<N: Notifier>(mut rx: EventReceiver, notifier: N) -> usize {
    let mut delivered = 0usize;

    while let Some(event) = rx.recv().await {
        let text = event.message();
        if notifier.send(&text).await {
            delivered += 1;
            info!(task_id = event.task_id(), "notification sent");
        } else {
            warn!(task_id = event.task_id(), message = %text, "notification not delivered");
        }
    }

    delivered
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Notifier;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Records every message; succeeds or fails on demand.
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        pub sent: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn messages(&self) -> Vec<String> {
            self.sent.lock().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> bool {
            self.sent.lock().push(text.to_string());
            !self.fail
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingNotifier;
    use super::*;
    use kankai_core::{Difficulty, TaskStore};

    #[tokio::test]
    async fn delivers_in_order_until_senders_drop() {
        let mut store = TaskStore::new();
        let a = store.create("first", 10, Difficulty::Low).unwrap();
        let b = store.create("second", 20, Difficulty::Low).unwrap();

        let (tx, rx) = event_channel();
        tx.send(BoardEvent::created(&a)).unwrap();
        tx.send(BoardEvent::deleted(&b)).unwrap();
        drop(tx);

        let notifier = RecordingNotifier::default();
        let delivered = run_dispatcher(rx, notifier.clone()).await;

        assert_eq!(delivered, 2);
        assert_eq!(
            notifier.messages(),
            vec![
                "New task created: 'first' (est. 10m)".to_string(),
                "Task 'second' deleted".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let mut store = TaskStore::new();
        let a = store.create("first", 10, Difficulty::Low).unwrap();

        let (tx, rx) = event_channel();
        tx.send(BoardEvent::created(&a)).unwrap();
        drop(tx);

        let notifier = RecordingNotifier::failing();
        assert_eq!(run_dispatcher(rx, notifier.clone()).await, 0);
        assert_eq!(notifier.messages().len(), 1);
    }
}
