//! Shop settings service.

use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::clock::Clock;
use crate::error::Result;
use crate::models::{AdminSettings, PublicSettings, ShopSettings, UpdateSettingsRequest};
use crate::ports::SettingsStore;

/// Reads and updates the singleton settings record.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    async fn current(&self) -> Result<ShopSettings> {
        let defaults = ShopSettings::defaults(self.clock.now());
        Ok(self.store.get_or_create(&defaults).await?)
    }

    pub async fn public_flags(&self) -> Result<PublicSettings> {
        Ok(self.current().await?.public_flags())
    }

    pub async fn get(&self) -> Result<AdminSettings> {
        Ok(AdminSettings::from(&self.current().await?))
    }

    /// Applies a partial update. Nothing is written if validation fails.
    pub async fn update(&self, request: UpdateSettingsRequest) -> Result<AdminSettings> {
        request.validate()?;

        let mut settings = self.current().await?;
        request.apply_to(&mut settings);
        settings.updated_at = self.clock.now();
        let saved = self.store.save(&settings).await?;

        info!(
            is_paused = saved.is_paused,
            is_closed = saved.is_closed,
            is_maintenance_mode = saved.is_maintenance_mode,
            avg_time_per_customer = saved.avg_minutes(),
            dark_mode = saved.dark_mode,
            "Shop settings updated"
        );
        Ok(AdminSettings::from(&saved))
    }
}
