//! Queue entry repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::models::{QueueEntry, QueueStatus};
use domain::ports::{EntryFilter, QueueStore, StatusFilter, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::{is_unique_violation, store_error};
use crate::entities::QueueEntryEntity;
use crate::metrics::QueryTimer;

const COLUMNS: &str = "id, name, phone, email, customer_type, priority_level, token_number, \
                       status, created_at, updated_at, completed_at";

/// Repository for queue_entries.
#[derive(Clone)]
pub struct QueueEntryRepository {
    pool: PgPool,
}

impl QueueEntryRepository {
    /// Creates a new QueueEntryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_domain(rows: Vec<QueueEntryEntity>) -> StoreResult<Vec<QueueEntry>> {
    rows.into_iter().map(QueueEntry::try_from).collect()
}

#[async_trait]
impl QueueStore for QueueEntryRepository {
    async fn insert(&self, entry: &QueueEntry) -> StoreResult<()> {
        let timer = QueryTimer::new("insert_queue_entry");
        let mut tx = self.pool.begin().await.map_err(store_error)?;

        let result = async {
            sqlx::query("INSERT INTO issued_tokens (token_number, issued_at) VALUES ($1, $2)")
                .bind(&entry.token_number)
                .bind(entry.created_at)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO queue_entries (id, name, phone, email, customer_type,
                                           priority_level, token_number, status,
                                           created_at, updated_at, completed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(entry.id)
            .bind(&entry.name)
            .bind(&entry.phone)
            .bind(&entry.email)
            .bind(entry.customer_type.as_str())
            .bind(i16::from(entry.priority_level.value()))
            .bind(&entry.token_number)
            .bind(entry.status.as_str())
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .bind(entry.completed_at)
            .execute(&mut *tx)
            .await?;
            Ok::<_, sqlx::Error>(())
        }
        .await;

        let result = match result {
            Ok(()) => tx.commit().await,
            Err(err) => Err(err),
        };
        timer.record();

        match result {
            Ok(()) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateToken),
            Err(err) => Err(store_error(err)),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<QueueEntry>> {
        let timer = QueryTimer::new("find_queue_entry_by_id");
        let result = sqlx::query_as::<_, QueueEntryEntity>(&format!(
            "SELECT {} FROM queue_entries WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)?.map(QueueEntry::try_from).transpose()
    }

    async fn find(&self, filter: &EntryFilter) -> StoreResult<Vec<QueueEntry>> {
        let timer = QueryTimer::new("find_queue_entries");
        let (status_sql, status) = match filter.status {
            StatusFilter::Active => ("status <> $1", QueueStatus::Removed),
            StatusFilter::Only(status) => ("status = $1", status),
        };
        let result = sqlx::query_as::<_, QueueEntryEntity>(&format!(
            r#"
            SELECT {}
            FROM queue_entries
            WHERE {} AND ($2::text IS NULL OR customer_type = $2)
            ORDER BY priority_level DESC, created_at ASC, id ASC
            "#,
            COLUMNS, status_sql
        ))
        .bind(status.as_str())
        .bind(filter.customer_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await;
        timer.record();

        into_domain(result.map_err(store_error)?)
    }

    async fn find_serving(&self) -> StoreResult<Option<QueueEntry>> {
        let timer = QueryTimer::new("find_serving_entry");
        let result = sqlx::query_as::<_, QueueEntryEntity>(&format!(
            r#"
            SELECT {}
            FROM queue_entries
            WHERE status = 'serving'
            ORDER BY updated_at DESC, id DESC
            LIMIT 1
            "#,
            COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)?.map(QueueEntry::try_from).transpose()
    }

    async fn update(&self, entry: &QueueEntry) -> StoreResult<bool> {
        let timer = QueryTimer::new("update_queue_entry");
        let result = sqlx::query(
            r#"
            UPDATE queue_entries
            SET name = $2, phone = $3, email = $4, customer_type = $5, priority_level = $6,
                status = $7, updated_at = $8, completed_at = $9
            WHERE id = $1
            "#,
        )
        .bind(entry.id)
        .bind(&entry.name)
        .bind(&entry.phone)
        .bind(&entry.email)
        .bind(entry.customer_type.as_str())
        .bind(i16::from(entry.priority_level.value()))
        .bind(entry.status.as_str())
        .bind(entry.updated_at)
        .bind(entry.completed_at)
        .execute(&self.pool)
        .await;
        timer.record();

        Ok(result.map_err(store_error)?.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<Option<QueueEntry>> {
        let timer = QueryTimer::new("delete_queue_entry");
        let result = sqlx::query_as::<_, QueueEntryEntity>(&format!(
            "DELETE FROM queue_entries WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)?.map(QueueEntry::try_from).transpose()
    }

    async fn token_exists(&self, token: &str) -> StoreResult<bool> {
        let timer = QueryTimer::new("token_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM issued_tokens WHERE token_number = $1)
                OR EXISTS(SELECT 1 FROM queue_entries WHERE token_number = $1)
            "#,
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await;
        timer.record();

        result.map_err(store_error)
    }

    async fn completed_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<QueueEntry>> {
        let timer = QueryTimer::new("find_completed_since");
        let result = sqlx::query_as::<_, QueueEntryEntity>(&format!(
            "SELECT {} FROM queue_entries WHERE completed_at >= $1",
            COLUMNS
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        into_domain(result.map_err(store_error)?)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(store_error)
    }
}
