//! Persistence layer for the Qyra queue backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain storage ports

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;

pub use repositories::{AdminUserRepository, QueueEntryRepository, ShopSettingsRepository};
