//! Staff login.

use axum::{extract::State, Json};
use domain::models::{AdminUserView, LoginRequest};
use serde::Serialize;
use shared::password::verify_password;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ApiJson;
use crate::response::ApiResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: AdminUserView,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// Exchange email and password for a bearer token.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    request.validate()?;

    let user = state
        .admins
        .find_admin_by_email(request.email.trim())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(invalid_credentials)?;

    let matches = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !matches {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid_credentials());
    }

    let issued = state
        .jwt
        .issue(user.id, user.role.as_str())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, jti = %issued.jti, "Staff logged in");

    Ok(Json(ApiResponse::data(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
        user: AdminUserView::from(&user),
    })))
}
