//! Queue orchestration.
//!
//! Every operation re-reads current state from the store, computes positions
//! fresh, and writes back. There is no transaction around multi-step
//! operations: handing the counter over is "complete the current server" then
//! "mark the target serving", two separate writes. Two concurrent start calls
//! can therefore leave two entries serving for a moment.

use chrono::{DateTime, NaiveTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clock::Clock;
use crate::error::{QueueError, Result};
use crate::models::{
    CurrentServing, CustomerType, EntryStatus, JoinQueueRequest, JoinTicket, ListQueueQuery,
    Position, QueueEntry, QueueListItem, QueueListing, QueueStats, QueueStatus, ServingRef,
    ShopSettings, TypeBreakdown, WaitEstimate, DEFAULT_AVG_MINUTES,
};
use crate::ports::{EntryFilter, QueueStore, SettingsStore, StatusFilter};
use crate::services::lifecycle;
use crate::services::ordering::{estimate_wait, rank, sort_canonical};
use crate::services::token::TokenGenerator;

/// Queue operations over the storage ports.
#[derive(Clone)]
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    settings: Arc<dyn SettingsStore>,
    tokens: TokenGenerator,
    clock: Arc<dyn Clock>,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn QueueStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens: TokenGenerator::new(store.clone()),
            store,
            settings,
            clock,
        }
    }

    /// Adds a customer to the queue and reports where they landed.
    pub async fn join(&self, request: JoinQueueRequest) -> Result<JoinTicket> {
        let request = request.normalized();
        request.validate()?;

        let customer_type = CustomerType::parse_or_default(request.customer_type.as_deref());
        let now = self.clock.now();
        let token = self.tokens.generate(now).await;

        let entry = QueueEntry::new_waiting(
            request.name,
            request.phone,
            request.email,
            customer_type,
            token.code,
            now,
        );
        self.store.insert(&entry).await?;
        counter!("queue_tokens_issued_total", "type" => customer_type.as_str()).increment(1);

        // The entry is stored; from here on the ticket is always returned.
        let (position, estimated_wait) = self.placement(entry.id).await;

        info!(
            entry_id = %entry.id,
            token = %entry.token_number,
            customer_type = %customer_type,
            position = position.get(),
            "Customer joined queue"
        );

        Ok(JoinTicket {
            id: entry.id,
            token_number: entry.token_number,
            name: entry.name,
            customer_type,
            position,
            estimated_wait,
        })
    }

    /// Status, position and estimate for one entry.
    pub async fn status(&self, id: Uuid) -> Result<EntryStatus> {
        let entry = self.load(id).await?;
        let currently_serving = self.store.find_serving().await?;

        let (position, estimated_wait) = if entry.is_waiting() {
            let waiting = self.store.find(&EntryFilter::waiting()).await?;
            match rank(&waiting, entry.id) {
                Some(position) => {
                    let avg = self.avg_minutes().await?;
                    (Some(position), Some(estimate_wait(position, avg)))
                }
                // Changed status between the two reads.
                None => (None, None),
            }
        } else {
            (None, None)
        };

        Ok(EntryStatus {
            id: entry.id,
            token_number: entry.token_number,
            name: entry.name,
            customer_type: entry.customer_type,
            status: entry.status,
            position,
            estimated_wait,
            currently_serving: currently_serving.as_ref().map(ServingRef::from),
        })
    }

    pub async fn current_serving(&self) -> Result<Option<CurrentServing>> {
        Ok(self
            .store
            .find_serving()
            .await?
            .as_ref()
            .map(CurrentServing::from))
    }

    /// Entries matching the query in canonical order, plus the current server.
    pub async fn list(&self, query: &ListQueueQuery) -> Result<QueueListing> {
        let filter = parse_list_filter(query)?;

        let mut entries = self.store.find(&filter).await?;
        sort_canonical(&mut entries);
        let currently_serving = self.store.find_serving().await?;

        Ok(QueueListing {
            queue: entries.iter().map(QueueListItem::from).collect(),
            currently_serving: currently_serving.as_ref().map(QueueListItem::from),
        })
    }

    /// Moves an entry to the counter, completing whoever held it.
    pub async fn start_serving(&self, id: Uuid) -> Result<QueueEntry> {
        let mut entry = self.load(id).await?;
        let now = self.clock.now();

        // Validate before touching the current server.
        let mut candidate = entry.clone();
        lifecycle::start_serving(&mut candidate, now)?;

        if let Some(mut current) = self.store.find_serving().await? {
            if current.id != entry.id && lifecycle::hand_over(&mut current, now) {
                if self.store.update(&current).await? {
                    counter!("queue_entries_served_total").increment(1);
                    info!(
                        entry_id = %current.id,
                        token = %current.token_number,
                        "Previous customer completed on hand-over"
                    );
                } else {
                    warn!(entry_id = %current.id, "Serving entry vanished during hand-over");
                }
            }
        }

        lifecycle::start_serving(&mut entry, now)?;
        self.save(&entry).await?;

        info!(entry_id = %entry.id, token = %entry.token_number, "Started serving customer");
        Ok(entry)
    }

    pub async fn complete_serving(&self, id: Uuid) -> Result<QueueEntry> {
        let mut entry = self.load(id).await?;
        lifecycle::complete(&mut entry, self.clock.now())?;
        self.save(&entry).await?;

        counter!("queue_entries_served_total").increment(1);
        info!(entry_id = %entry.id, token = %entry.token_number, "Service completed");
        Ok(entry)
    }

    pub async fn increase_priority(&self, id: Uuid) -> Result<QueueEntry> {
        let mut entry = self.load(id).await?;
        let change = lifecycle::increase_priority(&mut entry, self.clock.now())?;

        if change.changed() {
            self.save(&entry).await?;
        }

        info!(
            entry_id = %entry.id,
            from = change.from.value(),
            to = change.to.value(),
            promoted_to_vip = change.promoted_to_vip,
            "Priority increased"
        );
        Ok(entry)
    }

    /// Hard delete from any status.
    pub async fn remove(&self, id: Uuid) -> Result<QueueEntry> {
        let removed = self.store.delete(id).await?.ok_or(QueueError::NotFound)?;
        info!(
            entry_id = %removed.id,
            token = %removed.token_number,
            status = %removed.status,
            "Customer removed from queue"
        );
        Ok(removed)
    }

    /// Dashboard counters for the current UTC day.
    pub async fn stats(&self) -> Result<QueueStats> {
        let now = self.clock.now();
        let waiting = self.store.find(&EntryFilter::waiting()).await?;
        let completed_today = self.store.completed_since(start_of_day(now)).await?;
        let currently_serving = self.store.find_serving().await?;

        let mut by_type = TypeBreakdown::default();
        for entry in &waiting {
            by_type.record(entry.customer_type);
        }

        Ok(QueueStats {
            total_waiting: waiting.len() as u64,
            served_today: completed_today.len() as u64,
            currently_serving: currently_serving.as_ref().map(ServingRef::from),
            average_wait_minutes: average_wait_minutes(&completed_today),
            by_type,
        })
    }

    async fn load(&self, id: Uuid) -> Result<QueueEntry> {
        self.store.find_by_id(id).await?.ok_or(QueueError::NotFound)
    }

    async fn save(&self, entry: &QueueEntry) -> Result<()> {
        if self.store.update(entry).await? {
            Ok(())
        } else {
            Err(QueueError::NotFound)
        }
    }

    /// Position and estimate for a freshly stored entry.
    ///
    /// An entry that already left the waiting set (started or removed by an
    /// admin in between) or a failed re-read is reported as next in line.
    async fn placement(&self, id: Uuid) -> (Position, WaitEstimate) {
        let next = (Position::FIRST, WaitEstimate::Next);
        let waiting = match self.store.find(&EntryFilter::waiting()).await {
            Ok(waiting) => waiting,
            Err(e) => {
                warn!(entry_id = %id, error = %e, "Could not rank new entry");
                return next;
            }
        };
        let Some(position) = rank(&waiting, id) else {
            warn!(entry_id = %id, "New entry left the waiting set before it was ranked");
            return next;
        };
        match self.avg_minutes().await {
            Ok(avg) => (position, estimate_wait(position, avg)),
            Err(e) => {
                warn!(entry_id = %id, error = %e, "Could not load average service time");
                (position, estimate_wait(position, DEFAULT_AVG_MINUTES))
            }
        }
    }

    async fn avg_minutes(&self) -> Result<u32> {
        let defaults = ShopSettings::defaults(self.clock.now());
        Ok(self.settings.get_or_create(&defaults).await?.avg_minutes())
    }
}

fn parse_list_filter(query: &ListQueueQuery) -> Result<EntryFilter> {
    let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => StatusFilter::Active,
        Some(raw) => StatusFilter::Only(
            QueueStatus::parse(raw)
                .ok_or_else(|| QueueError::Validation(format!("Unknown status: {}", raw)))?,
        ),
    };
    let customer_type = match query
        .customer_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        None => None,
        Some(raw) => Some(
            CustomerType::parse(raw)
                .ok_or_else(|| QueueError::Validation(format!("Unknown customer type: {}", raw)))?,
        ),
    };

    Ok(EntryFilter {
        status,
        customer_type,
    })
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Mean of positive join-to-completion durations, rounded to whole minutes.
fn average_wait_minutes(completed: &[QueueEntry]) -> u64 {
    let waits: Vec<f64> = completed
        .iter()
        .filter_map(|e| e.completed_at.map(|done| done - e.created_at))
        .map(|d| d.num_milliseconds() as f64 / 60_000.0)
        .filter(|minutes| *minutes > 0.0)
        .collect();

    if waits.is_empty() {
        return 0;
    }
    (waits.iter().sum::<f64>() / waits.len() as f64).round() as u64
}
