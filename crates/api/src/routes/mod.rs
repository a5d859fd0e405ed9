//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod queue;
pub mod settings;
