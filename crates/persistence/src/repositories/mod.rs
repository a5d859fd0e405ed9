//! Repository implementations of the domain storage ports.

pub mod admin_user;
pub mod queue_entry;
pub mod shop_settings;

pub use admin_user::AdminUserRepository;
pub use queue_entry::QueueEntryRepository;
pub use shop_settings::ShopSettingsRepository;

use domain::ports::StoreError;

/// PostgreSQL error code for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION)
    )
}

/// Maps a driver error onto the domain storage error.
pub(crate) fn store_error(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}
