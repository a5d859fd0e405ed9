//! Shop settings domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::validation::validate_avg_minutes;

/// Average service time used when none has been configured.
pub const DEFAULT_AVG_MINUTES: u32 = 10;

/// The singleton settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopSettings {
    pub is_paused: bool,
    pub is_closed: bool,
    pub is_maintenance_mode: bool,
    /// Minutes per customer; `None` means "use the default".
    pub avg_time_per_customer: Option<i32>,
    /// Admin dashboard theme.
    pub dark_mode: bool,
    pub updated_at: DateTime<Utc>,
}

impl ShopSettings {
    /// Record created on first read.
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            is_paused: false,
            is_closed: false,
            is_maintenance_mode: false,
            avg_time_per_customer: Some(DEFAULT_AVG_MINUTES as i32),
            dark_mode: false,
            updated_at: now,
        }
    }

    /// Average service time, defaulting when absent or non-positive.
    pub fn avg_minutes(&self) -> u32 {
        match self.avg_time_per_customer {
            Some(minutes) if minutes > 0 => minutes as u32,
            _ => DEFAULT_AVG_MINUTES,
        }
    }

    pub fn public_flags(&self) -> PublicSettings {
        PublicSettings {
            is_paused: self.is_paused,
            is_closed: self.is_closed,
            is_maintenance_mode: self.is_maintenance_mode,
        }
    }
}

/// Flags visible to customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSettings {
    pub is_paused: bool,
    pub is_closed: bool,
    pub is_maintenance_mode: bool,
}

/// Full settings view for admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    pub is_paused: bool,
    pub is_closed: bool,
    pub is_maintenance_mode: bool,
    pub avg_time_per_customer: u32,
    pub dark_mode: bool,
}

impl From<&ShopSettings> for AdminSettings {
    fn from(settings: &ShopSettings) -> Self {
        Self {
            is_paused: settings.is_paused,
            is_closed: settings.is_closed,
            is_maintenance_mode: settings.is_maintenance_mode,
            avg_time_per_customer: settings.avg_minutes(),
            dark_mode: settings.dark_mode,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub is_paused: Option<bool>,
    #[serde(default)]
    pub is_closed: Option<bool>,
    #[serde(default)]
    pub is_maintenance_mode: Option<bool>,
    #[serde(default)]
    #[validate(custom(function = "validate_avg_minutes"))]
    pub avg_time_per_customer: Option<i32>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
}

impl UpdateSettingsRequest {
    /// Applies the provided fields onto `settings`.
    pub fn apply_to(&self, settings: &mut ShopSettings) {
        if let Some(paused) = self.is_paused {
            settings.is_paused = paused;
        }
        if let Some(closed) = self.is_closed {
            settings.is_closed = closed;
        }
        if let Some(maintenance) = self.is_maintenance_mode {
            settings.is_maintenance_mode = maintenance;
        }
        if let Some(minutes) = self.avg_time_per_customer {
            settings.avg_time_per_customer = Some(minutes);
        }
        if let Some(dark_mode) = self.dark_mode {
            settings.dark_mode = dark_mode;
        }
    }
}
