//! Rate limiting for the public join endpoint.
//!
//! A single process-wide bucket: the join endpoint is anonymous, so there is
//! no identity to key on.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use axum::response::IntoResponse;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovRateLimiter,
};
use std::num::NonZeroU32;

use crate::app::AppState;
use crate::error::ApiError;

type DirectRateLimiter = GovRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared join limiter.
pub struct RateLimiterState {
    limiter: DirectRateLimiter,
    clock: DefaultClock,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when the limit is 0 (disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: GovRateLimiter::direct(Quota::per_minute(per_minute)),
            clock: DefaultClock::default(),
            rate_limit_per_minute,
        })
    }

    /// `Err(retry_after_secs)` when the bucket is empty.
    pub fn check(&self) -> Result<(), u64> {
        self.limiter.check().map_err(|not_until| {
            not_until
                .wait_time_from(self.clock.now())
                .as_secs()
                .max(1)
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

/// Rejects joins beyond the configured per-minute budget with 429.
pub async fn join_rate_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(limiter) = state.join_limiter.as_deref() {
        if let Err(retry_after_secs) = limiter.check() {
            tracing::warn!(
                limit = limiter.rate_limit_per_minute(),
                retry_after_secs,
                "Join rate limit exceeded"
            );
            return ApiError::RateLimited { retry_after_secs }.into_response();
        }
    }

    next.run(req).await
}
