//! Queue entry state machine.
//!
//! ```text
//! Waiting ──start──▶ Serving ──complete──▶ Completed
//!    │                                        ▲
//!    └──────────────complete──────────────────┘
//! Waiting ──increase priority──▶ Waiting
//! any ──remove──▶ (deleted)
//! ```
//!
//! Transitions are checked against a freshly read copy of the entry. Only one
//! entry may be Serving; starting a new one hands the counter over by
//! completing the previous holder first.

use chrono::{DateTime, Utc};

use crate::error::{QueueError, Result};
use crate::models::{CustomerType, PriorityLevel, QueueEntry, QueueStatus};

/// Outcome of a priority bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityChange {
    pub from: PriorityLevel,
    pub to: PriorityLevel,
    pub promoted_to_vip: bool,
}

impl PriorityChange {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Waiting → Serving. Already serving is a no-op.
pub fn start_serving(entry: &mut QueueEntry, now: DateTime<Utc>) -> Result<()> {
    match entry.status {
        QueueStatus::Completed => Err(QueueError::AlreadyCompleted),
        QueueStatus::Removed => Err(QueueError::InvalidTransition(
            "This token has been removed from the queue".into(),
        )),
        QueueStatus::Serving => Ok(()),
        QueueStatus::Waiting => {
            entry.status = QueueStatus::Serving;
            entry.updated_at = now;
            Ok(())
        }
    }
}

/// Waiting/Serving → Completed, stamping `completed_at`.
pub fn complete(entry: &mut QueueEntry, now: DateTime<Utc>) -> Result<()> {
    match entry.status {
        QueueStatus::Completed => Err(QueueError::AlreadyCompleted),
        QueueStatus::Removed => Err(QueueError::InvalidTransition(
            "This token has been removed from the queue".into(),
        )),
        QueueStatus::Waiting | QueueStatus::Serving => {
            entry.status = QueueStatus::Completed;
            entry.completed_at = Some(now);
            entry.updated_at = now;
            Ok(())
        }
    }
}

/// Completes the entry currently at the counter so another can take its place.
///
/// Returns false if `current` is not serving, in which case it is left untouched.
pub fn hand_over(current: &mut QueueEntry, now: DateTime<Utc>) -> bool {
    if current.status != QueueStatus::Serving {
        return false;
    }
    current.status = QueueStatus::Completed;
    current.completed_at.get_or_insert(now);
    current.updated_at = now;
    true
}

/// Raises priority by one, saturating at the maximum.
///
/// Reaching the VIP threshold promotes the customer to VIP; nothing demotes.
pub fn increase_priority(entry: &mut QueueEntry, now: DateTime<Utc>) -> Result<PriorityChange> {
    if entry.status != QueueStatus::Waiting {
        return Err(QueueError::InvalidTransition(
            "Can only change priority for waiting items".into(),
        ));
    }

    let from = entry.priority_level;
    let to = from.bumped();
    let mut promoted_to_vip = false;

    if to != from {
        entry.priority_level = to;
        if to.value() >= PriorityLevel::VIP_THRESHOLD && entry.customer_type != CustomerType::Vip {
            entry.customer_type = CustomerType::Vip;
            promoted_to_vip = true;
        }
        entry.updated_at = now;
    }

    Ok(PriorityChange {
        from,
        to,
        promoted_to_vip,
    })
}
