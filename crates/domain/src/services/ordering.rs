//! Canonical queue ordering, positions and wait estimates.
//!
//! The order is recomputed from current state on every query and never
//! persisted: priorities change and entries come and go concurrently.

use std::cmp::Ordering;
use uuid::Uuid;

use crate::models::{Position, QueueEntry, WaitEstimate};

/// Priority descending, then join time ascending, then id.
///
/// The id only breaks exact timestamp ties so the order is total.
pub fn canonical_cmp(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    b.priority_level
        .cmp(&a.priority_level)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts entries in place by the canonical order.
pub fn sort_canonical(entries: &mut [QueueEntry]) {
    entries.sort_by(canonical_cmp);
}

/// Waiting entries only, in canonical order.
pub fn waiting_in_order(entries: &[QueueEntry]) -> Vec<&QueueEntry> {
    let mut waiting: Vec<&QueueEntry> = entries.iter().filter(|e| e.is_waiting()).collect();
    waiting.sort_by(|a, b| canonical_cmp(a, b));
    waiting
}

/// 1-based position of `target` among the waiting entries.
///
/// `None` if the target is absent or not waiting.
pub fn rank(entries: &[QueueEntry], target: Uuid) -> Option<Position> {
    waiting_in_order(entries)
        .iter()
        .position(|e| e.id == target)
        .and_then(|idx| Position::new(idx as u32 + 1))
}

/// Minutes until service for a position, given the average per customer.
pub fn estimate_wait(position: Position, avg_minutes_per_customer: u32) -> WaitEstimate {
    match position.ahead().saturating_mul(avg_minutes_per_customer) {
        0 => WaitEstimate::Next,
        minutes => WaitEstimate::Minutes(minutes),
    }
}
