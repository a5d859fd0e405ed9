//! Domain models.

pub mod admin_user;
pub mod queue_entry;
pub mod settings;
pub mod stats;

pub use admin_user::{AdminUser, AdminUserView, LoginRequest, UserRole};
pub use queue_entry::{
    CustomerType, JoinQueueRequest, ListQueueQuery, PriorityLevel, QueueEntry, QueueStatus,
    TOKEN_PREFIX,
};
pub use settings::{
    AdminSettings, PublicSettings, ShopSettings, UpdateSettingsRequest, DEFAULT_AVG_MINUTES,
};
pub use stats::{
    CurrentServing, EntryStatus, JoinTicket, Position, QueueListItem, QueueListing, QueueStats,
    ServingRef, TypeBreakdown, WaitEstimate,
};
