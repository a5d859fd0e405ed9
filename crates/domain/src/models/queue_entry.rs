//! Queue entry domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_not_blank;

/// Prefix of every ticket code.
pub const TOKEN_PREFIX: &str = "QY-";

/// Kind of customer, which determines the starting priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CustomerType {
    #[default]
    #[serde(rename = "Walk-in")]
    WalkIn,
    #[serde(rename = "VIP")]
    Vip,
    #[serde(rename = "Senior")]
    Senior,
}

impl CustomerType {
    /// Parses a customer type, returning `None` for unrecognized input.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Walk-in" | "WalkIn" | "walk-in" | "walkin" | "walk_in" => Some(CustomerType::WalkIn),
            "VIP" | "Vip" | "vip" => Some(CustomerType::Vip),
            "Senior" | "senior" => Some(CustomerType::Senior),
            _ => None,
        }
    }

    /// Parses a customer type, falling back to walk-in for anything unrecognized.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    /// Priority an entry of this type starts with.
    pub fn initial_priority(self) -> PriorityLevel {
        match self {
            CustomerType::WalkIn => PriorityLevel::new(1),
            CustomerType::Senior => PriorityLevel::new(2),
            CustomerType::Vip => PriorityLevel::new(3),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CustomerType::WalkIn => "Walk-in",
            CustomerType::Vip => "VIP",
            CustomerType::Senior => "Senior",
        }
    }
}

impl std::fmt::Display for CustomerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a queue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Waiting,
    Serving,
    Completed,
    Removed,
}

impl QueueStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "waiting" => Some(QueueStatus::Waiting),
            "serving" => Some(QueueStatus::Serving),
            "completed" => Some(QueueStatus::Completed),
            "removed" => Some(QueueStatus::Removed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueueStatus::Waiting => "waiting",
            QueueStatus::Serving => "serving",
            QueueStatus::Completed => "completed",
            QueueStatus::Removed => "removed",
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority of an entry, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityLevel(u8);

impl PriorityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Level at which a non-VIP entry is promoted to VIP.
    pub const VIP_THRESHOLD: u8 = 3;

    /// Creates a level, clamping into range.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Next level up, saturating at `MAX`.
    pub fn bumped(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    pub fn is_max(self) -> bool {
        self.0 == Self::MAX
    }
}

/// One customer's ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: CustomerType,
    pub priority_level: PriorityLevel,
    pub token_number: String,
    pub status: QueueStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QueueEntry {
    /// Builds a new waiting entry.
    pub fn new_waiting(
        name: String,
        phone: Option<String>,
        email: Option<String>,
        customer_type: CustomerType,
        token_number: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            phone,
            email,
            customer_type,
            priority_level: customer_type.initial_priority(),
            token_number,
            status: QueueStatus::Waiting,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == QueueStatus::Waiting
    }
}

/// Request to join the queue.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JoinQueueRequest {
    #[serde(default)]
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 100, message = "Name must be at most 100 characters")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// Free-form type; unrecognized values become walk-in.
    #[serde(default, rename = "type")]
    pub customer_type: Option<String>,
}

impl JoinQueueRequest {
    /// Drops empty optional contact fields and normalizes the rest.
    pub fn normalized(self) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Self {
            name: self.name.trim().to_string(),
            phone: clean(self.phone),
            email: clean(self.email).map(|e| e.to_lowercase()),
            customer_type: self.customer_type,
        }
    }
}

/// Filters accepted by the list operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueueQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub customer_type: Option<String>,
}
