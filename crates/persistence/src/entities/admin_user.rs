//! Admin user entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AdminUser, UserRole};
use domain::ports::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the admin_users table.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AdminUserEntity> for AdminUser {
    type Error = StoreError;

    fn try_from(entity: AdminUserEntity) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&entity.role)
            .ok_or_else(|| StoreError::Backend(format!("unknown role '{}'", entity.role)))?;
        Ok(Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            password_hash: entity.password_hash,
            role,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        let entity = AdminUserEntity {
            id: Uuid::new_v4(),
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "staff".to_string(),
            created_at: Utc::now(),
        };
        let user = AdminUser::try_from(entity.clone()).unwrap();
        assert_eq!(user.role, UserRole::Staff);

        let bad = AdminUserEntity {
            role: "root".to_string(),
            ..entity
        };
        assert!(AdminUser::try_from(bad).is_err());
    }
}
