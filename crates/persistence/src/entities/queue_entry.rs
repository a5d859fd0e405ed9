//! Queue entry entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{CustomerType, PriorityLevel, QueueEntry, QueueStatus};
use domain::ports::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the queue_entries table.
#[derive(Debug, Clone, FromRow)]
pub struct QueueEntryEntity {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub customer_type: String,
    pub priority_level: i16,
    pub token_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<QueueEntryEntity> for QueueEntry {
    type Error = StoreError;

    fn try_from(entity: QueueEntryEntity) -> Result<Self, Self::Error> {
        let customer_type = CustomerType::parse(&entity.customer_type).ok_or_else(|| {
            StoreError::Backend(format!("unknown customer type '{}'", entity.customer_type))
        })?;
        let status = QueueStatus::parse(&entity.status)
            .ok_or_else(|| StoreError::Backend(format!("unknown status '{}'", entity.status)))?;
        let priority = u8::try_from(entity.priority_level).map_err(|_| {
            StoreError::Backend(format!("invalid priority {}", entity.priority_level))
        })?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            customer_type,
            priority_level: PriorityLevel::new(priority),
            token_number: entity.token_number,
            status,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            completed_at: entity.completed_at,
        })
    }
}
