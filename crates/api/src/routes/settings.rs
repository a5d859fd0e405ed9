//! Shop settings endpoint handlers.

use axum::{extract::State, Json};
use domain::models::{AdminSettings, PublicSettings, UpdateSettingsRequest};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson};
use crate::response::ApiResponse;

/// Pause, closed and maintenance flags for the customer app.
///
/// GET /api/settings/public
pub async fn get_public_settings(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PublicSettings>>, ApiError> {
    Ok(Json(ApiResponse::data(state.settings.public_flags().await?)))
}

/// GET /api/settings
pub async fn get_settings(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<Json<ApiResponse<AdminSettings>>, ApiError> {
    Ok(Json(ApiResponse::data(state.settings.get().await?)))
}

/// Partial update; omitted fields keep their values.
///
/// PUT /api/settings/update
pub async fn update_settings(
    State(state): State<AppState>,
    admin: AdminAuth,
    ApiJson(request): ApiJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<AdminSettings>>, ApiError> {
    let updated = state.settings.update(request).await?;
    tracing::info!(admin_id = %admin.user_id, "Admin updated shop settings");
    Ok(Json(ApiResponse::with_message(
        updated,
        "Settings updated successfully",
    )))
}
