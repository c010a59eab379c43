//! Producer intake: accepts an event and queues it for dispatch.
//!
//! The response never depends on delivery. A well-formed event is
//! always `202 Accepted`; `queued` reports whether it reached the queue.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;
use validator::Validate;

use agora_core::error::AppError;
use agora_core::events::NotificationEvent;

use crate::error::ApiError;
use crate::dto::request::PublishEventRequest;
use crate::dto::response::{ApiResponse, EventAcceptedResponse};
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/events
pub async fn publish_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<PublishEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventAcceptedResponse>>), ApiError> {
    req.validate()?;

    // Acting on one's own content never notifies.
    if req.target_id == Some(auth.user_id) {
        debug!(user_id = %auth.user_id, "Self-targeted event skipped");
        return Ok(accepted(false));
    }

    let event = match (req.kind, req.message) {
        (Some(kind), _) => {
            let actor = state
                .collaborators
                .users
                .find_user(auth.user_id)
                .await?
                .ok_or_else(|| AppError::not_found("Caller has no profile"))?;
            NotificationEvent::for_kind(kind, &actor.user, req.target_id, req.post_id)?
        }
        (None, Some(message)) => {
            NotificationEvent::new(auth.user_id, message, req.target_id, req.post_id)?
        }
        (None, None) => {
            return Err(AppError::validation("Either kind or message is required").into());
        }
    };

    Ok(accepted(state.sink.publish(event)))
}

fn accepted(queued: bool) -> (StatusCode, Json<ApiResponse<EventAcceptedResponse>>) {
    (
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(EventAcceptedResponse { queued })),
    )
}
