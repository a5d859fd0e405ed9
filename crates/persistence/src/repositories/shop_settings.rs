//! Shop settings repository.

use async_trait::async_trait;
use domain::models::ShopSettings;
use domain::ports::{SettingsStore, StoreResult};
use sqlx::PgPool;

use super::store_error;
use crate::entities::ShopSettingsEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str =
    "is_paused, is_closed, is_maintenance_mode, avg_time_per_customer, dark_mode, updated_at";

/// Repository for the singleton shop_settings row.
#[derive(Clone)]
pub struct ShopSettingsRepository {
    pool: PgPool,
}

impl ShopSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for ShopSettingsRepository {
    async fn get_or_create(&self, defaults: &ShopSettings) -> StoreResult<ShopSettings> {
        let timer = QueryTimer::new("get_or_create_shop_settings");
        // The no-op update makes RETURNING yield the existing row on conflict.
        let result = sqlx::query_as::<_, ShopSettingsEntity>(&format!(
            r#"
            INSERT INTO shop_settings (id, is_paused, is_closed, is_maintenance_mode,
                                       avg_time_per_customer, dark_mode, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET id = shop_settings.id
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(defaults.is_paused)
        .bind(defaults.is_closed)
        .bind(defaults.is_maintenance_mode)
        .bind(defaults.avg_time_per_customer)
        .bind(defaults.dark_mode)
        .bind(defaults.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(store_error)?.into())
    }

    async fn save(&self, settings: &ShopSettings) -> StoreResult<ShopSettings> {
        let timer = QueryTimer::new("save_shop_settings");
        let result = sqlx::query_as::<_, ShopSettingsEntity>(&format!(
            r#"
            INSERT INTO shop_settings (id, is_paused, is_closed, is_maintenance_mode,
                                       avg_time_per_customer, dark_mode, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                is_paused = EXCLUDED.is_paused,
                is_closed = EXCLUDED.is_closed,
                is_maintenance_mode = EXCLUDED.is_maintenance_mode,
                avg_time_per_customer = EXCLUDED.avg_time_per_customer,
                dark_mode = EXCLUDED.dark_mode,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(settings.is_paused)
        .bind(settings.is_closed)
        .bind(settings.is_maintenance_mode)
        .bind(settings.avg_time_per_customer)
        .bind(settings.dark_mode)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(store_error)?.into())
    }
}
