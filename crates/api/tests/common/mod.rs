//! Common test utilities for integration tests.
//!
//! The router is built over the in-memory backend with a fixed clock, so the
//! suites need no database.

// Not every suite uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use chrono::{TimeZone, Utc};
use domain::clock::FixedClock;
use domain::memory::InMemoryStore;
use domain::models::{AdminUser, UserRole};
use domain::ports::AdminStore;
use qyra_api::app::{create_app, AppState, Stores};
use qyra_api::config::{
    AdminBootstrapConfig, Config, DatabaseConfig, JwtAuthConfig, LoggingConfig, SecurityConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
use serde_json::Value;
use shared::password::hash_password;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_PASSWORD: &str = "SecureP@ss123!";

/// Test configuration: memory backend, join limiter off.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            request_timeout_secs: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            join_rate_limit_per_minute: 0,
            hsts_enabled: false,
        },
        jwt: JwtAuthConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_secs: 3600,
            leeway_secs: 0,
        },
        admin: AdminBootstrapConfig::default(),
    }
}

/// Router plus handles on its storage and clock.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
        ));
        let stores = Stores {
            queue: store.clone(),
            settings: store.clone(),
            admins: store.clone(),
        };
        let state = AppState::new(config, stores, clock.clone()).expect("valid test config");
        Self {
            router: create_app(state.clone()),
            state,
            store,
            clock,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET and parse the JSON body.
    pub async fn get_json(&self, uri: &str, token: Option<&str>) -> Value {
        parse_response_body(self.send(request(Method::GET, uri, token)).await).await
    }

    /// Stores an account and returns it.
    pub async fn create_user(&self, email: &str, role: UserRole) -> AdminUser {
        let user = AdminUser {
            id: Uuid::new_v4(),
            name: "Test Staff".to_string(),
            email: email.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
            role,
            created_at: Utc::now(),
        };
        self.store.insert_admin(&user).await.unwrap();
        user
    }

    /// Bearer token for a freshly created account with the given role.
    pub async fn token_for(&self, role: UserRole) -> String {
        let email = format!("{}_{}@example.com", role, Uuid::new_v4());
        let user = self.create_user(&email, role).await;
        self.state
            .jwt
            .issue(user.id, user.role.as_str())
            .unwrap()
            .token
    }

    pub async fn admin_token(&self) -> String {
        self.token_for(UserRole::Admin).await
    }

    /// Joins the queue and returns the created entry's `data` object.
    pub async fn join(&self, name: &str, customer_type: Option<&str>) -> Value {
        let mut body = serde_json::json!({ "name": name });
        if let Some(t) = customer_type {
            body["type"] = Value::from(t);
        }
        let response = self
            .send(json_request(Method::POST, "/api/queue/join", body))
            .await;
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        self.clock.advance(chrono::Duration::minutes(1));
        parse_response_body(response).await["data"].clone()
    }
}

/// Helper to create a JSON request.
pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Request without a body, optionally authenticated.
pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Authenticated JSON request.
pub fn authed_json_request(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
