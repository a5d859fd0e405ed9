//! Queue statistics and read models returned by the queue service.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::queue_entry::{CustomerType, PriorityLevel, QueueEntry, QueueStatus};

/// 1-based rank of a waiting entry under the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Position(u32);

impl Position {
    /// Front of the queue.
    pub const FIRST: Position = Position(1);

    /// Returns `None` for zero.
    pub fn new(position: u32) -> Option<Self> {
        (position >= 1).then_some(Self(position))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Number of entries ahead of this position.
    pub fn ahead(self) -> u32 {
        self.0 - 1
    }
}

/// Estimated wait derived from position and average service time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitEstimate {
    Next,
    Minutes(u32),
}

impl WaitEstimate {
    pub fn minutes(self) -> u32 {
        match self {
            WaitEstimate::Next => 0,
            WaitEstimate::Minutes(m) => m,
        }
    }
}

impl std::fmt::Display for WaitEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitEstimate::Next => f.write_str("You are next"),
            WaitEstimate::Minutes(m) => write!(f, "{} minutes", m),
        }
    }
}

impl Serialize for WaitEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of joining the queue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinTicket {
    pub id: Uuid,
    pub token_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub position: Position,
    pub estimated_wait: WaitEstimate,
}

/// Short reference to whoever is at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServingRef {
    pub token_number: String,
    pub name: String,
}

impl From<&QueueEntry> for ServingRef {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            token_number: entry.token_number.clone(),
            name: entry.name.clone(),
        }
    }
}

/// Status lookup for a single entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStatus {
    pub id: Uuid,
    pub token_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub status: QueueStatus,
    pub position: Option<Position>,
    pub estimated_wait: Option<WaitEstimate>,
    pub currently_serving: Option<ServingRef>,
}

/// Entry currently at the counter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentServing {
    pub id: Uuid,
    pub token_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl From<&QueueEntry> for CurrentServing {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id,
            token_number: entry.token_number.clone(),
            name: entry.name.clone(),
            customer_type: entry.customer_type,
            phone: entry.phone.clone(),
            email: entry.email.clone(),
            started_at: entry.updated_at,
        }
    }
}

/// Row in the admin queue list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueListItem {
    pub id: Uuid,
    pub token_number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub priority_level: PriorityLevel,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&QueueEntry> for QueueListItem {
    fn from(entry: &QueueEntry) -> Self {
        Self {
            id: entry.id,
            token_number: entry.token_number.clone(),
            name: entry.name.clone(),
            customer_type: entry.customer_type,
            phone: entry.phone.clone(),
            email: entry.email.clone(),
            priority_level: entry.priority_level,
            status: entry.status,
            created_at: entry.created_at,
            completed_at: entry.completed_at,
        }
    }
}

/// Ordered list plus the current server.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueListing {
    pub queue: Vec<QueueListItem>,
    pub currently_serving: Option<QueueListItem>,
}

/// Waiting entries per customer type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "Walk-in")]
    pub walk_in: u64,
    #[serde(rename = "VIP")]
    pub vip: u64,
    #[serde(rename = "Senior")]
    pub senior: u64,
}

impl TypeBreakdown {
    pub fn record(&mut self, customer_type: CustomerType) {
        match customer_type {
            CustomerType::WalkIn => self.walk_in += 1,
            CustomerType::Vip => self.vip += 1,
            CustomerType::Senior => self.senior += 1,
        }
    }
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    pub total_waiting: u64,
    pub served_today: u64,
    pub currently_serving: Option<ServingRef>,
    pub average_wait_minutes: u64,
    pub by_type: TypeBreakdown,
}
