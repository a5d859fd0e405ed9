//! Admin extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::admin_auth::AuthenticatedAdmin;

/// Admin authenticated by the `require_admin` middleware.
///
/// Only valid on routes behind that middleware; elsewhere it rejects with 401.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub user_id: Uuid,
    pub email: String,
    pub jti: String,
}

impl From<&AuthenticatedAdmin> for AdminAuth {
    fn from(admin: &AuthenticatedAdmin) -> Self {
        Self {
            user_id: admin.user.id,
            email: admin.user.email.clone(),
            jti: admin.jti.clone(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAdmin>()
            .map(AdminAuth::from)
            .ok_or_else(|| ApiError::Unauthorized("Not authorized, no token".into()))
    }
}
