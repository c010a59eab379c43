//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RealtimeMetrics {
    connections_total: AtomicU64,
    connections_active: AtomicU64,
    connections_evicted: AtomicU64,
    pushes_sent: AtomicU64,
    pushes_dropped: AtomicU64,
    notifications_persisted: AtomicU64,
    persist_failures: AtomicU64,
    recipients_unresolved: AtomicU64,
    chat_relayed: AtomicU64,
    inbound_rejected: AtomicU64,
    events_dispatched: AtomicU64,
    events_dropped: AtomicU64,
}

impl RealtimeMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// A connection reached `Open`.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// A connection finished teardown.
    pub fn connection_closed(&self) {
        // Never wraps below zero.
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
    }

    /// The oldest connection of a user was evicted to make room.
    pub fn connection_evicted(&self) {
        self.connections_evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Frames queued onto live connections.
    pub fn pushes_sent(&self, count: u64) {
        self.pushes_sent.fetch_add(count, Ordering::Relaxed);
    }

    /// A frame could not be queued.
    pub fn push_dropped(&self) {
        self.pushes_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// A durable notification row was written.
    pub fn notification_persisted(&self) {
        self.notifications_persisted.fetch_add(1, Ordering::Relaxed);
    }

    /// A durable write or unread count failed.
    pub fn persist_failed(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A recipient could not be resolved.
    pub fn recipient_unresolved(&self) {
        self.recipients_unresolved.fetch_add(1, Ordering::Relaxed);
    }

    /// A direct message was stored and relayed.
    pub fn chat_relayed(&self) {
        self.chat_relayed.fetch_add(1, Ordering::Relaxed);
    }

    /// An inbound frame was malformed or invalid.
    pub fn inbound_rejected(&self) {
        self.inbound_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// The dispatch worker finished an event.
    pub fn event_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    /// An event was dropped before reaching the worker.
    pub fn event_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_evicted: self.connections_evicted.load(Ordering::Relaxed),
            pushes_sent: self.pushes_sent.load(Ordering::Relaxed),
            pushes_dropped: self.pushes_dropped.load(Ordering::Relaxed),
            notifications_persisted: self.notifications_persisted.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
            recipients_unresolved: self.recipients_unresolved.load(Ordering::Relaxed),
            chat_relayed: self.chat_relayed.load(Ordering::Relaxed),
            inbound_rejected: self.inbound_rejected.load(Ordering::Relaxed),
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Connections ever opened
    pub connections_total: u64,
    /// Currently open connections
    pub connections_active: u64,
    /// Connections evicted by the per-user limit
    pub connections_evicted: u64,
    /// Frames queued onto live connections
    pub pushes_sent: u64,
    /// Frames that could not be queued
    pub pushes_dropped: u64,
    /// Durable notification rows written
    pub notifications_persisted: u64,
    /// Durable writes that failed
    pub persist_failures: u64,
    /// Recipients skipped as unresolvable
    pub recipients_unresolved: u64,
    /// Direct messages relayed
    pub chat_relayed: u64,
    /// Malformed or invalid inbound frames
    pub inbound_rejected: u64,
    /// Events processed by the dispatch worker
    pub events_dispatched: u64,
    /// Events dropped at the queue
    pub events_dropped: u64,
}
