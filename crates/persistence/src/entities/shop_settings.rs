//! Shop settings entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::ShopSettings;
use sqlx::FromRow;

/// Database row mapping for the shop_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct ShopSettingsEntity {
    pub is_paused: bool,
    pub is_closed: bool,
    pub is_maintenance_mode: bool,
    pub avg_time_per_customer: Option<i32>,
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ShopSettingsEntity> for ShopSettings {
    fn from(entity: ShopSettingsEntity) -> Self {
        Self {
            is_paused: entity.is_paused,
            is_closed: entity.is_closed,
            is_maintenance_mode: entity.is_maintenance_mode,
            avg_time_per_customer: entity.avg_time_per_customer,
            dark_mode: entity.dark_mode,
            updated_at: entity.updated_at,
        }
    }
}
