//! Admin user repository.

use async_trait::async_trait;
use domain::models::AdminUser;
use domain::ports::{AdminStore, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_unique_violation, store_error};
use crate::entities::AdminUserEntity;
use crate::metrics::QueryTimer;

/// Repository for admin_users.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminStore for AdminUserRepository {
    async fn find_admin_by_id(&self, id: Uuid) -> StoreResult<Option<AdminUser>> {
        let timer = QueryTimer::new("find_admin_by_id");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM admin_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)?.map(AdminUser::try_from).transpose()
    }

    async fn find_admin_by_email(&self, email: &str) -> StoreResult<Option<AdminUser>> {
        let timer = QueryTimer::new("find_admin_by_email");
        let result = sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM admin_users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)?.map(AdminUser::try_from).transpose()
    }

    async fn insert_admin(&self, user: &AdminUser) -> StoreResult<()> {
        let timer = QueryTimer::new("insert_admin");
        let result = sqlx::query(
            r#"
            INSERT INTO admin_users (id, name, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.email.to_lowercase())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;
        timer.record();

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Backend(format!(
                "user with email {} already exists",
                user.email
            ))),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn any_admin(&self) -> StoreResult<bool> {
        let timer = QueryTimer::new("any_admin");
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM admin_users WHERE role = 'admin')",
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)
    }
}
