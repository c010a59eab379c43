//! Bounded queue between request handlers and the dispatch worker.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use agora_core::events::NotificationEvent;

use crate::metrics::RealtimeMetrics;
use crate::notification::NotificationDispatcher;

use super::sink::NotificationSink;

/// Producer side of the dispatch queue.
#[derive(Debug, Clone)]
pub struct EventBridge {
    tx: mpsc::Sender<NotificationEvent>,
    metrics: Arc<RealtimeMetrics>,
}

impl EventBridge {
    /// Creates the bridge and the receiver its worker drains.
    pub fn new(
        capacity: usize,
        metrics: Arc<RealtimeMetrics>,
    ) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, metrics }, rx)
    }
}

impl NotificationSink for EventBridge {
    fn publish(&self, event: NotificationEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(actor = %event.actor(), "Dispatch queue full, dropping event");
                self.metrics.event_dropped();
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                warn!(actor = %event.actor(), "Dispatch worker stopped, dropping event");
                self.metrics.event_dropped();
                false
            }
        }
    }
}

/// Spawns the worker that feeds queued events to the dispatcher.
///
/// On shutdown the worker stops accepting new events and dispatches
/// whatever is already queued before exiting.
pub fn spawn_worker(
    mut rx: mpsc::Receiver<NotificationEvent>,
    dispatcher: Arc<NotificationDispatcher>,
    metrics: Arc<RealtimeMetrics>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
                _ = shutdown.cancelled() => break,
            };
            dispatch_logged(&dispatcher, &metrics, &event).await;
        }

        rx.close();
        let mut drained = 0usize;
        while let Some(event) = rx.recv().await {
            dispatch_logged(&dispatcher, &metrics, &event).await;
            drained += 1;
        }
        info!(drained, "Dispatch worker stopped");
    })
}

async fn dispatch_logged(
    dispatcher: &NotificationDispatcher,
    metrics: &RealtimeMetrics,
    event: &NotificationEvent,
) {
    let outcome = dispatcher.dispatch(event).await;
    metrics.event_dispatched();
    debug!(
        actor = %event.actor(),
        recipients = outcome.recipients.len(),
        persisted = outcome.persisted_count(),
        delivered = outcome.delivered_count(),
        "Event dispatched"
    );
}
