//! Domain layer for the Qyra queue backend.
//!
//! This crate contains:
//! - Domain models (QueueEntry, ShopSettings, AdminUser) and read models
//! - Storage ports and an in-memory implementation
//! - Queue ordering, lifecycle and token rules
//! - Domain error types

pub mod clock;
pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{QueueError, Result};
