//! Request extractors.

pub mod admin_auth;
pub mod json;

pub use admin_auth::AdminAuth;
pub use json::ApiJson;
