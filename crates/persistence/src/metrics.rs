//! Query timings and pool gauges.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Times one repository query into `database_query_duration_seconds{query}`.
pub struct QueryTimer {
    query: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query: &'static str) -> Self {
        Self {
            query,
            start: Instant::now(),
        }
    }

    /// Records and returns the elapsed time.
    pub fn record(self) -> Duration {
        let elapsed = self.start.elapsed();
        histogram!("database_query_duration_seconds", "query" => self.query)
            .record(elapsed.as_secs_f64());
        elapsed
    }
}

/// Connection counts at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub total: usize,
    pub idle: usize,
}

impl PoolSnapshot {
    pub fn of(pool: &PgPool) -> Self {
        Self {
            total: pool.size() as usize,
            idle: pool.num_idle(),
        }
    }

    /// Idle can briefly exceed size while connections are being reaped.
    pub fn active(self) -> usize {
        self.total.saturating_sub(self.idle)
    }
}

/// Publishes `database_connections_{active,idle,total}`.
pub fn record_pool_metrics(pool: &PgPool) {
    let snapshot = PoolSnapshot::of(pool);
    gauge!("database_connections_active").set(snapshot.active() as f64);
    gauge!("database_connections_idle").set(snapshot.idle as f64);
    gauge!("database_connections_total").set(snapshot.total as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_connections() {
        let snapshot = PoolSnapshot { total: 8, idle: 3 };
        assert_eq!(snapshot.active(), 5);
    }

    #[test]
    fn test_active_never_underflows() {
        let snapshot = PoolSnapshot { total: 2, idle: 4 };
        assert_eq!(snapshot.active(), 0);
    }

    #[test]
    fn test_timer_records_without_recorder() {
        let timer = QueryTimer::new("token_exists");
        assert_eq!(timer.query, "token_exists");
        let _ = timer.record();
    }
}
