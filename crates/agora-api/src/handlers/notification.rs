//! Notification handlers.

use axum::Json;
use axum::extract::{Query, State};
use tracing::{debug, warn};

use agora_core::types::PageResponse;
use agora_realtime::message::builder::build_result;

use crate::error::ApiError;
use crate::dto::response::{ApiResponse, MarkedResponse, NotificationListResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<NotificationListResponse>>, ApiError> {
    let page_request = params.into_page_request();
    let store = &state.collaborators.notifications;
    let page = store.list_for_user(auth.user_id, &page_request).await?;
    let unread = store.count_unread(auth.user_id).await?;

    let mut items = Vec::with_capacity(page.items.len());
    for row in &page.items {
        let Some(actor) = state.collaborators.users.find_user(row.user_id).await? else {
            debug!(notification_id = %row.id, "Actor gone, omitting notification");
            continue;
        };
        let post = match row.post_id {
            Some(post_id) => match state.collaborators.posts.find_post(post_id, auth.user_id).await {
                Ok(post) => post,
                Err(e) => {
                    warn!(post_id = %post_id, error = %e, "Post lookup failed, listing without it");
                    None
                }
            },
            None => None,
        };
        items.push(build_result(row, &actor, post));
    }

    Ok(Json(ApiResponse::ok(NotificationListResponse {
        notifications_count: unread,
        results: PageResponse::new(items, page.page, page.page_size, page.total_items),
    })))
}

/// POST /api/notifications/read
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    let marked = state
        .collaborators
        .notifications
        .mark_all_read(auth.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}
