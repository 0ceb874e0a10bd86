use chrono::Utc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::board::Board;

/// Periodically scan the board for in-progress tasks past their estimate.
///
/// The first scan runs immediately. Stops once the notification dispatcher
/// is gone, since alerts would have nowhere to go.
pub async fn run_monitor(board: Board, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if board.events_closed() {
            debug!("event channel closed; delay monitor stopping");
            break;
        }

        let delayed = board.check_delays(Utc::now());
        if delayed > 0 {
            info!(delayed, "delay monitor flagged late tasks");
        } else {
            debug!("delay monitor tick: nothing late");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::event_channel;
    use kankai_core::{BoardEvent, TaskStore};

    #[tokio::test(start_paused = true)]
    async fn alerts_once_across_many_ticks() {
        let (tx, mut rx) = event_channel();
        let board = Board::new(TaskStore::new(), tx);
        board.create_task("Deploy", 10, "high").unwrap();
        board
            .update_status_at("task-1", "inprogress", Utc::now() - chrono::Duration::minutes(11))
            .unwrap();
        while rx.try_recv().is_ok() {}

        let handle = tokio::spawn(run_monitor(board.clone(), Duration::from_secs(60)));
        tokio::time::sleep(Duration::from_secs(60 * 5 + 1)).await;
        handle.abort();

        let mut delayed = 0;
        while let Ok(ev) = rx.try_recv() {
            if matches!(ev, BoardEvent::Delayed { .. }) {
                delayed += 1;
            }
        }
        assert_eq!(delayed, 1);
        assert!(board.get_task("task-1").unwrap().delay_notified);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_dispatcher_is_gone() {
        let (tx, rx) = event_channel();
        let board = Board::new(TaskStore::new(), tx);
        drop(rx);

        let handle = tokio::spawn(run_monitor(board, Duration::from_secs(1)));
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor should exit")
            .unwrap();
    }
}
