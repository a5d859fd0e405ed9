//! Persistence ports.
//!
//! The queue logic talks to storage only through these traits. PostgreSQL
//! repositories and the in-memory store both implement them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AdminUser, CustomerType, QueueEntry, QueueStatus, ShopSettings};

/// Storage failure as seen by the domain.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The token unique constraint rejected an insert.
    #[error("duplicate token number")]
    DuplicateToken,

    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Which statuses a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Everything except `Removed`.
    #[default]
    Active,
    Only(QueueStatus),
}

impl StatusFilter {
    pub fn matches(self, status: QueueStatus) -> bool {
        match self {
            StatusFilter::Active => status != QueueStatus::Removed,
            StatusFilter::Only(wanted) => status == wanted,
        }
    }
}

/// Filter for `QueueStore::find`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub status: StatusFilter,
    pub customer_type: Option<CustomerType>,
}

impl EntryFilter {
    pub fn waiting() -> Self {
        Self {
            status: StatusFilter::Only(QueueStatus::Waiting),
            customer_type: None,
        }
    }

    pub fn matches(&self, entry: &QueueEntry) -> bool {
        self.status.matches(entry.status)
            && self
                .customer_type
                .map_or(true, |t| t == entry.customer_type)
    }
}

/// Queue entry collection.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Inserts a new entry; fails with `DuplicateToken` on a token clash.
    async fn insert(&self, entry: &QueueEntry) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<QueueEntry>>;

    /// Entries matching the filter, in no guaranteed order.
    async fn find(&self, filter: &EntryFilter) -> StoreResult<Vec<QueueEntry>>;

    /// An entry with status `Serving`, most recently updated first.
    async fn find_serving(&self) -> StoreResult<Option<QueueEntry>>;

    /// Overwrites the mutable fields of an existing entry. Returns false if it vanished.
    async fn update(&self, entry: &QueueEntry) -> StoreResult<bool>;

    /// Hard delete, returning the removed record.
    async fn delete(&self, id: Uuid) -> StoreResult<Option<QueueEntry>>;

    /// Whether any entry, past or present, holds this token.
    async fn token_exists(&self, token: &str) -> StoreResult<bool>;

    /// Entries whose `completed_at` is at or after `since`, whatever their status.
    async fn completed_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<QueueEntry>>;

    /// Connectivity probe.
    async fn ping(&self) -> StoreResult<()>;
}

/// Singleton settings record.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Returns the record, creating it with `defaults` if none exists yet.
    async fn get_or_create(&self, defaults: &ShopSettings) -> StoreResult<ShopSettings>;

    async fn save(&self, settings: &ShopSettings) -> StoreResult<ShopSettings>;
}

/// Staff accounts.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin_by_id(&self, id: Uuid) -> StoreResult<Option<AdminUser>>;

    /// Case-insensitive email lookup.
    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>>;

    async fn insert_admin(&self, user: &AdminUser) -> StoreResult<()>;

    async fn any_admin(&self) -> StoreResult<bool>;
}
