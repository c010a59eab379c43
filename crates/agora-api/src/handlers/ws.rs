//! WebSocket upgrade handlers for the notification and chat endpoints.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use agora_core::error::AppError;
use agora_realtime::{AuthenticatedUser, ConnectionKind, Frame, run_heartbeat};

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: Option<String>,
}

/// GET /ws/notifications?token={jwt}
pub async fn notifications_ws(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    upgrade(state, query, ws, ConnectionKind::Notifications).await
}

/// GET /ws/chat?token={jwt}
pub async fn chat_ws(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    upgrade(state, query, ws, ConnectionKind::Chat).await
}

/// Authenticates before the upgrade so an unknown caller never gets a socket.
async fn upgrade(
    state: AppState,
    query: WsQuery,
    ws: WebSocketUpgrade,
    kind: ConnectionKind,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .ok_or_else(|| AppError::authentication("Missing token query parameter"))?;
    let identity = state.identity.resolve(&token).await?;

    Ok(ws.on_upgrade(move |socket| run_connection(state, kind, identity, socket)))
}

/// Drives one established connection until either side stops it.
async fn run_connection(
    state: AppState,
    kind: ConnectionKind,
    identity: AuthenticatedUser,
    socket: WebSocket,
) {
    let user_id = identity.user_id;
    let mut lifecycle = state.realtime.lifecycle(kind);
    let outbound = match lifecycle.accept(Some(identity)) {
        Ok(rx) => rx,
        Err(e) => {
            warn!(user_id = %user_id, error = %e, "Connection not accepted");
            return;
        }
    };
    let (Some(handle), Some(cancel)) = (lifecycle.handle().cloned(), lifecycle.cancellation())
    else {
        return;
    };
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %user_id, kind = ?kind, "WebSocket connection established");

    let heartbeat = tokio::spawn(run_heartbeat(handle, lifecycle.heartbeat_config()));

    let (ws_tx, mut ws_rx) = socket.split();

    let writer = tokio::spawn(write_frames(ws_tx, outbound, cancel.clone()));

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            next = ws_rx.next() => next,
        };
        match next {
            Some(Ok(Message::Text(text))) => lifecycle.on_text(text.as_str()).await,
            Some(Ok(Message::Pong(_))) => lifecycle.on_pong().await,
            Some(Ok(Message::Close(_))) | None => break,
            // Pings are answered by the transport.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                debug!(conn_id = %conn_id, error = %e, "WebSocket read error");
                break;
            }
        }
    }

    lifecycle.close();
    let _ = writer.await;
    let _ = heartbeat.await;

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connection closed");
}

/// Forwards queued frames to the socket until cancelled, then sends Close.
///
/// Cancellation is checked first, so frames still buffered at teardown are
/// dropped rather than written after close.
async fn write_frames<S>(mut sink: S, mut outbound: mpsc::Receiver<Frame>, cancel: CancellationToken)
where
    S: Sink<Message> + Unpin,
{
    loop {
        let frame = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            frame = outbound.recv() => match frame {
                Some(frame) => frame,
                None => break,
            },
        };
        let message = match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Ping => Message::Ping(Bytes::new()),
        };
        if sink.send(message).await.is_err() {
            break;
        }
    }
    let _ = sink.send(Message::Close(None)).await;
    cancel.cancel();
}
