//! Ping/pong heartbeat for WebSocket keepalive.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::handle::{ConnectionHandle, Frame};

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// How long a ping may go unanswered
    pub ping_timeout: Duration,
}

impl From<&agora_core::config::RealtimeConfig> for HeartbeatConfig {
    fn from(config: &agora_core::config::RealtimeConfig) -> Self {
        Self {
            ping_interval: config.ping_interval(),
            ping_timeout: config.ping_timeout(),
        }
    }
}

/// Run heartbeat loop for a connection.
///
/// Sends a ping every interval and waits up to the timeout for a pong
/// recorded after it. A missed pong or a failed send cancels the
/// connection task, which then runs the normal teardown. Returns when the
/// connection is cancelled.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let cancel = handle.cancellation();
    let mut interval = time::interval_at(Instant::now() + config.ping_interval, config.ping_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let sent_at = Utc::now();
        if !handle.send(Frame::Ping) {
            tracing::debug!(conn_id = %handle.id, "Ping send failed, closing connection");
            handle.cancel();
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = time::sleep(config.ping_timeout) => {}
        }

        if handle.last_pong().await < sent_at {
            tracing::warn!(
                conn_id = %handle.id,
                user_id = %handle.user_id,
                timeout = ?config.ping_timeout,
                "Heartbeat timeout, closing connection"
            );
            handle.cancel();
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
