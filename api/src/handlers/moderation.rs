//! Moderation handlers
//!
//! The action endpoint plus the queue, stats, item and intake surfaces.
//! Every route here sits behind the API key middleware.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};

use moderation_core::wire::{ActionRequest, ActionResponse};
use moderation_core::ModerationError;

use crate::domain::entities::{
    Actor, ModerationFilter, ModerationQueueItem, ModerationStats, NewModerationItem,
};
use crate::error::AppError;
use crate::AppState;

/// POST /moderation/action/:item_id
///
/// Apply approve, deny or quarantine to a pending item.
pub async fn post_action(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(item_id): Path<String>,
    body: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Json<ActionResponse>, AppError> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let response = state
        .moderation_service
        .apply_action(&actor, &item_id, &body.action, body.reason)
        .await?;

    Ok(Json(response))
}

/// POST /moderation/action
///
/// The action route without an item id.
pub async fn missing_item_id() -> AppError {
    ModerationError::MissingItemId.into()
}

/// GET /moderation/queue
pub async fn list_queue(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    filter: Result<Query<ModerationFilter>, QueryRejection>,
) -> Result<Json<Vec<ModerationQueueItem>>, AppError> {
    let Query(filter) = filter.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let items = state.moderation_service.list(&actor, &filter).await?;
    Ok(Json(items))
}

/// GET /moderation/stats
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ModerationStats>, AppError> {
    Ok(Json(state.moderation_service.stats(&actor).await?))
}

/// GET /moderation/items/:item_id
pub async fn get_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(item_id): Path<String>,
) -> Result<Json<ModerationQueueItem>, AppError> {
    Ok(Json(state.moderation_service.get(&actor, &item_id).await?))
}

/// POST /moderation/items
///
/// Enqueue submitted content. Any authenticated actor may submit.
pub async fn submit_item(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<NewModerationItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ModerationQueueItem>), AppError> {
    let Json(new_item) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let item = state.moderation_service.submit(&actor, new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
