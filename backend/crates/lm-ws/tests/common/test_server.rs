#![allow(dead_code)]

use lm_auth::{JwtValidator, RateLimitConfig, RateLimiterFactory};
use lm_config::{DEFAULT_HEARTBEAT_INTERVAL_SECS, DEFAULT_HEARTBEAT_TIMEOUT_SECS};
use lm_db::EmployeeRepository;
use lm_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    NotificationDispatcher, Notifier, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Shared HS256 secret for all tests
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-integration-tests-min-32-bytes-long";

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub max_connections_total: usize,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub send_buffer_size: usize,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            max_connections_total: 100,
            rate_limit_max_requests: 100,
            rate_limit_window_secs: 60,
            send_buffer_size: 256,
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_INTERVAL_SECS,
            heartbeat_timeout_secs: DEFAULT_HEARTBEAT_TIMEOUT_SECS,
        }
    }
}

impl TestServerConfig {
    pub fn with_strict_limits() -> Self {
        Self {
            max_connections_total: 2,
            ..Default::default()
        }
    }

    /// Ping every second, give up after two silent seconds
    pub fn with_short_heartbeat() -> Self {
        Self {
            heartbeat_interval_secs: 1,
            heartbeat_timeout_secs: 2,
            ..Default::default()
        }
    }

    pub fn with_strict_rate_limits() -> Self {
        Self {
            rate_limit_max_requests: 3,
            rate_limit_window_secs: 60,
            ..Default::default()
        }
    }
}

/// Test server with access to AppState
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
}

impl TestServerWithState {
    /// Poll until the registry reaches `expected` members
    pub async fn wait_for_connections(&self, expected: usize) -> bool {
        for _ in 0..50 {
            if self.app_state.registry.total_count().await == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("../lm-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_department(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO departments (name, created_at) VALUES (?, ?)")
        .bind(name)
        .bind(Utc::now().timestamp())
        .execute(pool)
        .await
        .expect("Failed to create department")
        .last_insert_rowid()
}

pub async fn create_employee(
    pool: &SqlitePool,
    name: &str,
    department_id: Option<i64>,
    is_manager: bool,
) -> i64 {
    let slug = name.to_lowercase().replace(' ', ".");
    sqlx::query(
        r#"
        INSERT INTO employees (employee_code, name, email, department_id, is_manager, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(format!("EMP-{slug}"))
    .bind(name)
    .bind(format!("{slug}@example.com"))
    .bind(department_id)
    .bind(is_manager)
    .bind(Utc::now().timestamp())
    .execute(pool)
    .await
    .expect("Failed to create employee")
    .last_insert_rowid()
}

pub async fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default()).await
}

pub async fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state) = create_app(config).await;
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, app_state }
}

async fn create_app(config: TestServerConfig) -> (Router, AppState) {
    let pool = create_test_pool().await;
    let registry = ConnectionRegistry::new(ConnectionLimits {
        max_total: config.max_connections_total,
    });
    let metrics = Metrics::default();
    let shutdown = ShutdownCoordinator::new();

    let notifier = Notifier::new(
        registry.clone(),
        Arc::new(EmployeeRepository::new(pool.clone())),
        metrics.clone(),
    );
    let dispatcher = NotificationDispatcher::spawn(notifier.clone(), 2, &shutdown);

    let app_state = AppState {
        pool,
        jwt_validator: Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)),
        rate_limiter_factory: RateLimiterFactory::new(RateLimitConfig {
            max_requests: config.rate_limit_max_requests,
            window_secs: config.rate_limit_window_secs,
        }),
        registry,
        notifier,
        dispatcher,
        metrics,
        shutdown,
        config: ConnectionConfig {
            send_buffer_size: config.send_buffer_size,
            heartbeat_interval_secs: config.heartbeat_interval_secs,
            heartbeat_timeout_secs: config.heartbeat_timeout_secs,
        },
    };

    let router = Router::new()
        .route("/ws", get(lm_ws::handler))
        .with_state(app_state.clone());

    (router, app_state)
}
