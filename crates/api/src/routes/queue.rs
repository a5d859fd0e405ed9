//! Queue endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CurrentServing, EntryStatus, JoinQueueRequest, JoinTicket, ListQueueQuery, QueueEntry,
    QueueListItem, QueueListing, QueueStats,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::ApiResponse;

/// Ids that do not parse cannot name an entry.
fn parse_entry_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Queue item not found".to_string()))
}

/// Join the queue.
///
/// POST /api/queue/join
pub async fn join_queue(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JoinQueueRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JoinTicket>>), ApiError> {
    let ticket = state.queue.join(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ticket,
            "Successfully joined the queue",
        )),
    ))
}

/// Status, position and estimate for one ticket.
///
/// GET /api/queue/status/:id
pub async fn get_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EntryStatus>>, ApiError> {
    let id = parse_entry_id(&id)?;
    Ok(Json(ApiResponse::data(state.queue.status(id).await?)))
}

/// GET /api/queue/current
pub async fn get_current(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Option<CurrentServing>>>, ApiError> {
    let response = match state.queue.current_serving().await? {
        Some(current) => ApiResponse::data(Some(current)),
        None => ApiResponse::with_message(None, "No one is currently being served"),
    };
    Ok(Json(response))
}

/// Ordered queue listing with optional `status` and `type` filters.
///
/// GET /api/queue/list
pub async fn list_queue(
    State(state): State<AppState>,
    Query(query): Query<ListQueueQuery>,
) -> Result<Json<ApiResponse<QueueListing>>, ApiError> {
    Ok(Json(ApiResponse::data(state.queue.list(&query).await?)))
}

/// PUT /api/queue/start/:id
pub async fn start_serving(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<QueueListItem>>, ApiError> {
    let id = parse_entry_id(&id)?;
    let entry = state.queue.start_serving(id).await?;
    tracing::info!(admin_id = %admin.user_id, entry_id = %id, "Admin started serving");
    Ok(Json(entry_response(&entry, "Started serving customer")))
}

/// PUT /api/queue/complete/:id
pub async fn complete_serving(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<QueueListItem>>, ApiError> {
    let id = parse_entry_id(&id)?;
    let entry = state.queue.complete_serving(id).await?;
    tracing::info!(admin_id = %admin.user_id, entry_id = %id, "Admin completed service");
    Ok(Json(entry_response(&entry, "Service completed")))
}

/// PUT /api/queue/priority/:id
pub async fn increase_priority(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<QueueListItem>>, ApiError> {
    let id = parse_entry_id(&id)?;
    let entry = state.queue.increase_priority(id).await?;
    tracing::info!(admin_id = %admin.user_id, entry_id = %id, "Admin increased priority");
    Ok(Json(entry_response(&entry, "Priority increased")))
}

/// Hard delete; the removed record is echoed back.
///
/// DELETE /api/queue/:id
pub async fn remove_entry(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<QueueListItem>>, ApiError> {
    let id = parse_entry_id(&id)?;
    let removed = state.queue.remove(id).await?;
    tracing::info!(admin_id = %admin.user_id, entry_id = %id, "Admin removed entry");
    Ok(Json(entry_response(&removed, "Customer removed from queue")))
}

/// GET /api/queue/stats
pub async fn get_stats(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<ApiResponse<QueueStats>>, ApiError> {
    Ok(Json(ApiResponse::data(state.queue.stats().await?)))
}

fn entry_response(entry: &QueueEntry, message: &str) -> ApiResponse<QueueListItem> {
    ApiResponse::with_message(QueueListItem::from(entry), message)
}
