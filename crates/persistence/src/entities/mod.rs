//! Database entity definitions.

pub mod admin_user;
pub mod queue_entry;
pub mod shop_settings;

pub use admin_user::AdminUserEntity;
pub use queue_entry::QueueEntryEntity;
pub use shop_settings::ShopSettingsEntity;
