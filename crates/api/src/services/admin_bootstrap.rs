//! Admin bootstrap for initial setup.
//!
//! Creates the first admin account on startup when one is configured and no
//! admin exists yet.

use chrono::Utc;
use domain::models::{AdminUser, UserRole};
use domain::ports::{AdminStore, StoreError};
use shared::password::{hash_password, PasswordError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AdminBootstrapConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// What the bootstrap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    NotConfigured,
    AlreadyPresent,
    Created(Uuid),
}

/// Idempotent; call after migrations.
pub async fn bootstrap_admin(
    admins: &dyn AdminStore,
    config: &AdminBootstrapConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if !config.is_configured() {
        if !config.bootstrap_email.trim().is_empty() {
            warn!("Bootstrap email set without a password, skipping admin bootstrap");
        }
        return Ok(BootstrapOutcome::NotConfigured);
    }

    let email = config.bootstrap_email.trim().to_lowercase();
    if admins.any_admin().await? || admins.find_admin_by_email(&email).await?.is_some() {
        info!("Admin user or bootstrap email already exists - skipping bootstrap");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let user = AdminUser {
        id: Uuid::new_v4(),
        name: config.bootstrap_name.clone(),
        email,
        password_hash: hash_password(&config.bootstrap_password)?,
        role: UserRole::Admin,
        created_at: Utc::now(),
    };
    admins.insert_admin(&user).await?;

    info!(email = %user.email, user_id = %user.id, "Bootstrap admin user created");
    warn!("SECURITY: remove QY__ADMIN__BOOTSTRAP_PASSWORD once the admin has logged in");

    Ok(BootstrapOutcome::Created(user.id))
}
