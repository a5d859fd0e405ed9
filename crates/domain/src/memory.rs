//! In-process storage backend.
//!
//! Implements every storage port over tokio locks. Used when
//! `storage.backend = "memory"` and throughout the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AdminUser, QueueEntry, QueueStatus, ShopSettings, UserRole};
use crate::ports::{AdminStore, EntryFilter, QueueStore, SettingsStore, StoreError, StoreResult};

#[derive(Default)]
struct Entries {
    by_id: HashMap<Uuid, QueueEntry>,
    /// Every token ever issued, including deleted entries.
    tokens: HashMap<String, Uuid>,
}

/// Volatile store for queue entries, settings and staff accounts.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<Entries>,
    settings: RwLock<Option<ShopSettings>>,
    admins: RwLock<HashMap<Uuid, AdminUser>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QueueStore for InMemoryStore {
    async fn insert(&self, entry: &QueueEntry) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        if entries.tokens.contains_key(&entry.token_number) {
            return Err(StoreError::DuplicateToken);
        }
        if entries.by_id.contains_key(&entry.id) {
            return Err(StoreError::Backend(format!("entry {} already exists", entry.id)));
        }
        entries.tokens.insert(entry.token_number.clone(), entry.id);
        entries.by_id.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<QueueEntry>> {
        Ok(self.entries.read().await.by_id.get(&id).cloned())
    }

    async fn find(&self, filter: &EntryFilter) -> StoreResult<Vec<QueueEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .by_id
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn find_serving(&self) -> StoreResult<Option<QueueEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .by_id
            .values()
            .filter(|e| e.status == QueueStatus::Serving)
            .max_by_key(|e| (e.updated_at, e.id))
            .cloned())
    }

    async fn update(&self, entry: &QueueEntry) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        match entries.by_id.get_mut(&entry.id) {
            Some(stored) => {
                // Identity fields are immutable.
                stored.name = entry.name.clone();
                stored.phone = entry.phone.clone();
                stored.email = entry.email.clone();
                stored.customer_type = entry.customer_type;
                stored.priority_level = entry.priority_level;
                stored.status = entry.status;
                stored.updated_at = entry.updated_at;
                stored.completed_at = entry.completed_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<QueueEntry>> {
        Ok(self.entries.write().await.by_id.remove(&id))
    }

    async fn token_exists(&self, token: &str) -> StoreResult<bool> {
        Ok(self.entries.read().await.tokens.contains_key(token))
    }

    async fn completed_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<QueueEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .by_id
            .values()
            .filter(|e| e.completed_at.is_some_and(|at| at >= since))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for InMemoryStore {
    async fn get_or_create(&self, defaults: &ShopSettings) -> StoreResult<ShopSettings> {
        let mut settings = self.settings.write().await;
        Ok(settings.get_or_insert_with(|| defaults.clone()).clone())
    }

    async fn save(&self, updated: &ShopSettings) -> StoreResult<ShopSettings> {
        let mut settings = self.settings.write().await;
        *settings = Some(updated.clone());
        Ok(updated.clone())
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn find_admin_by_id(&self, id: Uuid) -> StoreResult<Option<AdminUser>> {
        Ok(self.admins.read().await.get(&id).cloned())
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>> {
        let admins = self.admins.read().await;
        Ok(admins
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_admin(&self, user: &AdminUser) -> StoreResult<()> {
        let mut admins = self.admins.write().await;
        if admins
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Backend(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        admins.insert(user.id, user.clone());
        Ok(())
    }

    async fn any_admin(&self) -> StoreResult<bool> {
        Ok(self
            .admins
            .read()
            .await
            .values()
            .any(|u| u.role == UserRole::Admin))
    }
}
