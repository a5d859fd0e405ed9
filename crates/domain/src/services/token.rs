//! Ticket code generation.
//!
//! Codes look like `QY-7K2P`. Uniqueness is checked against every entry ever
//! stored, so codes are never reused. The check-then-insert window is covered
//! by the store's unique constraint.

use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{error, warn};

use shared::crypto::{random_code, UPPER_ALPHANUMERIC};

use crate::models::TOKEN_PREFIX;
use crate::ports::QueueStore;

/// Random symbols after the prefix.
pub const CODE_LEN: usize = 4;
/// Random attempts before falling back to a timestamp suffix.
pub const MAX_ATTEMPTS: u32 = 100;

/// How a token was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// A random code that passed the uniqueness check.
    Random,
    /// Every random attempt collided; a timestamp suffix was appended.
    CollisionFallback,
    /// The uniqueness check itself failed; timestamp-only code.
    StorageFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedToken {
    pub code: String,
    pub source: TokenSource,
}

/// Builds unique ticket codes.
#[derive(Clone)]
pub struct TokenGenerator {
    store: Arc<dyn QueueStore>,
    max_attempts: u32,
}

impl TokenGenerator {
    pub fn new(store: Arc<dyn QueueStore>) -> Self {
        Self {
            store,
            max_attempts: MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Produces a token. Never fails: storage faults degrade to a timestamp code.
    pub async fn generate(&self, now: DateTime<Utc>) -> GeneratedToken {
        for _ in 0..self.max_attempts {
            let candidate = random_token();
            match self.store.token_exists(&candidate).await {
                Ok(false) => {
                    return GeneratedToken {
                        code: candidate,
                        source: TokenSource::Random,
                    }
                }
                Ok(true) => continue,
                Err(e) => {
                    error!(error = %e, "Token uniqueness check failed, using timestamp token");
                    counter!("queue_token_fallbacks_total", "reason" => "storage").increment(1);
                    return GeneratedToken {
                        code: format!("{}{}", TOKEN_PREFIX, last4_millis(now)),
                        source: TokenSource::StorageFallback,
                    };
                }
            }
        }

        warn!(
            attempts = self.max_attempts,
            "All random tokens collided, appending timestamp suffix"
        );
        counter!("queue_token_fallbacks_total", "reason" => "collision").increment(1);
        GeneratedToken {
            code: format!("{}-{}", random_token(), last4_millis(now)),
            source: TokenSource::CollisionFallback,
        }
    }
}

fn random_token() -> String {
    format!("{}{}", TOKEN_PREFIX, random_code(UPPER_ALPHANUMERIC, CODE_LEN))
}

/// Last four decimal digits of the epoch milliseconds, zero padded.
fn last4_millis(now: DateTime<Utc>) -> String {
    format!("{:04}", now.timestamp_millis().rem_euclid(10_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use crate::models::QueueEntry;
    use crate::ports::{EntryFilter, StoreError, StoreResult};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use regex::Regex;
    use std::collections::HashSet;
    use uuid::Uuid;

    /// Store whose uniqueness check always reports a clash or always fails.
    struct RiggedStore {
        fail: bool,
    }

    #[async_trait]
    impl QueueStore for RiggedStore {
        async fn insert(&self, _: &QueueEntry) -> StoreResult<()> {
            Ok(())
        }
        async fn find_by_id(&self, _: Uuid) -> StoreResult<Option<QueueEntry>> {
            Ok(None)
        }
        async fn find(&self, _: &EntryFilter) -> StoreResult<Vec<QueueEntry>> {
            Ok(vec![])
        }
        async fn find_serving(&self) -> StoreResult<Option<QueueEntry>> {
            Ok(None)
        }
        async fn update(&self, _: &QueueEntry) -> StoreResult<bool> {
            Ok(true)
        }
        async fn delete(&self, _: Uuid) -> StoreResult<Option<QueueEntry>> {
            Ok(None)
        }
        async fn token_exists(&self, _: &str) -> StoreResult<bool> {
            if self.fail {
                Err(StoreError::Backend("connection reset".into()))
            } else {
                Ok(true)
            }
        }
        async fn completed_since(&self, _: DateTime<Utc>) -> StoreResult<Vec<QueueEntry>> {
            Ok(vec![])
        }
        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_760_000_001_234).unwrap()
    }

    #[tokio::test]
    async fn test_tokens_match_format_and_are_distinct() {
        let generator = TokenGenerator::new(Arc::new(InMemoryStore::new()));
        let pattern = Regex::new(r"^QY-[A-Z0-9]{4}$").unwrap();

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let token = generator.generate(Utc::now()).await;
            assert_eq!(token.source, TokenSource::Random);
            assert!(pattern.is_match(&token.code), "bad token {}", token.code);
            seen.insert(token.code);
        }
        // Birthday bound over 36^4 codes makes a clash in 200 draws very unlikely.
        assert!(seen.len() >= 199);
    }

    #[tokio::test]
    async fn test_existing_tokens_are_not_reissued() {
        let store = Arc::new(InMemoryStore::new());
        let generator = TokenGenerator::new(store.clone());

        for _ in 0..50 {
            let token = generator.generate(Utc::now()).await;
            let entry = QueueEntry::new_waiting(
                "x".into(),
                None,
                None,
                Default::default(),
                token.code.clone(),
                Utc::now(),
            );
            store.insert(&entry).await.unwrap();
        }
        let all = store.find(&EntryFilter::default()).await.unwrap();
        let codes: HashSet<_> = all.iter().map(|e| e.token_number.clone()).collect();
        assert_eq!(codes.len(), 50);
    }

    #[tokio::test]
    async fn test_collision_fallback_appends_timestamp() {
        let generator =
            TokenGenerator::new(Arc::new(RiggedStore { fail: false })).with_max_attempts(5);
        let token = generator.generate(fixed_now()).await;

        assert_eq!(token.source, TokenSource::CollisionFallback);
        assert!(Regex::new(r"^QY-[A-Z0-9]{4}-1234$").unwrap().is_match(&token.code));
    }

    #[tokio::test]
    async fn test_storage_fault_falls_back_to_timestamp() {
        let generator = TokenGenerator::new(Arc::new(RiggedStore { fail: true }));
        let token = generator.generate(fixed_now()).await;

        assert_eq!(token.source, TokenSource::StorageFallback);
        assert_eq!(token.code, "QY-1234");
    }

    #[test]
    fn test_last4_pads_with_zeros() {
        let now = Utc.timestamp_millis_opt(1_760_000_000_042).unwrap();
        assert_eq!(last4_millis(now), "0042");
    }
}
