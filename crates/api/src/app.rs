use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use domain::clock::Clock;
use domain::memory::InMemoryStore;
use domain::ports::{AdminStore, QueueStore, SettingsStore};
use domain::services::{QueueService, SettingsService};
use persistence::{AdminUserRepository, QueueEntryRepository, ShopSettingsRepository};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    join_rate_limit, metrics_handler, metrics_middleware, require_admin,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{auth, health, queue, settings};

/// Storage port implementations selected at startup.
#[derive(Clone)]
pub struct Stores {
    pub queue: Arc<dyn QueueStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub admins: Arc<dyn AdminStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            queue: Arc::new(QueueEntryRepository::new(pool.clone())),
            settings: Arc::new(ShopSettingsRepository::new(pool.clone())),
            admins: Arc::new(AdminUserRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            queue: store.clone(),
            settings: store.clone(),
            admins: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub queue: Arc<QueueService>,
    pub settings: Arc<SettingsService>,
    pub admins: Arc<dyn AdminStore>,
    /// Used by the health probe.
    pub store: Arc<dyn QueueStore>,
    pub jwt: Arc<JwtConfig>,
    pub join_limiter: Option<Arc<RateLimiterState>>,
}

impl AppState {
    pub fn new(config: Config, stores: Stores, clock: Arc<dyn Clock>) -> Result<Self, JwtError> {
        let jwt = JwtConfig::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.leeway_secs,
        )?;
        let join_limiter =
            RateLimiterState::new(config.security.join_rate_limit_per_minute).map(Arc::new);

        Ok(Self {
            queue: Arc::new(QueueService::new(
                stores.queue.clone(),
                stores.settings.clone(),
                clock.clone(),
            )),
            settings: Arc::new(SettingsService::new(stores.settings, clock)),
            admins: stores.admins,
            store: stores.queue,
            jwt: Arc::new(jwt),
            join_limiter,
            config: Arc::new(config),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let join_routes = Router::new()
        .route("/api/queue/join", post(queue::join_queue))
        .route_layer(middleware::from_fn_with_state(state.clone(), join_rate_limit));

    let public_routes = Router::new()
        .route("/api/queue/status/:id", get(queue::get_status))
        .route("/api/queue/current", get(queue::get_current))
        .route("/api/queue/list", get(queue::list_queue))
        .route("/api/settings/public", get(settings::get_public_settings))
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    let admin_routes = Router::new()
        .route("/api/queue/start/:id", put(queue::start_serving))
        .route("/api/queue/complete/:id", put(queue::complete_serving))
        .route("/api/queue/priority/:id", put(queue::increase_priority))
        .route("/api/queue/stats", get(queue::get_stats))
        .route("/api/queue/:id", delete(queue::remove_entry))
        .route("/api/settings", get(settings::get_settings))
        .route("/api/settings/update", put(settings::update_settings))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(join_routes)
        .merge(public_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
