//! Discussion handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use tracing::debug;

use agora_core::error::AppError;
use agora_core::types::{PageResponse, UserId};

use crate::error::ApiError;
use crate::dto::response::{ApiResponse, DiscussionPartnerItem, DiscussionResponse, MarkedResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/messages
pub async fn list_partners(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<DiscussionPartnerItem>>>, ApiError> {
    let page = state
        .collaborators
        .messages
        .list_partners(auth.user_id, &params.into_page_request())
        .await?;

    let mut items = Vec::with_capacity(page.items.len());
    for partner in &page.items {
        let Some(profile) = state.collaborators.users.find_user(partner.user_id).await? else {
            debug!(partner = %partner.user_id, "Partner gone, omitting discussion");
            continue;
        };
        items.push(DiscussionPartnerItem {
            id: profile.id,
            username: profile.user.username,
            avatar: profile.avatar,
            unread_count: partner.unread_count,
            last_message_at: partner.last_message_at,
        });
    }

    Ok(Json(ApiResponse::ok(PageResponse::new(
        items,
        page.page,
        page.page_size,
        page.total_items,
    ))))
}

/// GET /api/messages/{user_id}
pub async fn list_discussion(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other): Path<UserId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<DiscussionResponse>>, ApiError> {
    ensure_user_exists(&state, other).await?;
    let messages = &state.collaborators.messages;
    let results = messages
        .list_discussion(auth.user_id, other, &params.into_page_request())
        .await?;
    let unread_count = messages.count_unread_from(auth.user_id, other).await?;

    Ok(Json(ApiResponse::ok(DiscussionResponse {
        unread_count,
        results,
    })))
}

/// POST /api/messages/{user_id}/seen
pub async fn mark_seen(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(other): Path<UserId>,
) -> Result<Json<ApiResponse<MarkedResponse>>, ApiError> {
    ensure_user_exists(&state, other).await?;
    let marked = state
        .collaborators
        .messages
        .mark_discussion_read(auth.user_id, other)
        .await?;
    Ok(Json(ApiResponse::ok(MarkedResponse { marked })))
}

async fn ensure_user_exists(state: &AppState, user: UserId) -> Result<(), AppError> {
    state
        .collaborators
        .users
        .find_user(user)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found(format!("User {user} not found")))
}
