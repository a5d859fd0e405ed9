//! Admin JWT gate.
//!
//! Validates the bearer token, loads the account it names and requires the
//! admin role. The authenticated admin is stored in request extensions for
//! the [`AdminAuth`](crate::extractors::AdminAuth) extractor.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::models::{AdminUser, UserRole};
use shared::jwt::{extract_subject, JwtError};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::trace_id::get_request_id;

/// Authenticated admin inserted by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AuthenticatedAdmin {
    pub user: AdminUser,
    pub jti: String,
}

/// Middleware for admin-only routes.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(&req) {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("Not authorized, no token provided".into())
                .into_response()
        }
    };

    match authenticate(&state, &token).await {
        Ok(admin) => {
            req.extensions_mut().insert(admin);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(
                request_id = %get_request_id(req.extensions()),
                error = %err,
                "Admin authentication rejected"
            );
            err.into_response()
        }
    }
}

fn bearer_token(req: &Request<Body>) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedAdmin, ApiError> {
    let claims = state.jwt.validate(token).map_err(|e| match e {
        JwtError::TokenExpired => ApiError::Unauthorized("Not authorized, token expired".into()),
        _ => ApiError::Unauthorized("Not authorized, invalid token".into()),
    })?;
    let user_id = extract_subject(&claims)
        .map_err(|_| ApiError::Unauthorized("Not authorized, invalid token".into()))?;

    let user = state
        .admins
        .find_admin_by_id(user_id)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    if user.role != UserRole::Admin {
        return Err(ApiError::Forbidden("Access denied. Admin only.".into()));
    }

    Ok(AuthenticatedAdmin {
        user,
        jti: claims.jti,
    })
}
