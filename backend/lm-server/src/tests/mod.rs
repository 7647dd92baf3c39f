
use lm_auth::{JwtValidator, RateLimiterFactory};
use lm_db::EmployeeRepository;
use lm_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    NotificationDispatcher, Notifier, ShutdownCoordinator,
};

use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub(crate) const TEST_SECRET: &[u8] = b"unit-test-secret-key-that-is-at-least-32-bytes";

pub(crate) async fn create_test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(SqliteConnectOptions::new().filename(":memory:"))
        .await
        .expect("Failed to create test pool");

    sqlx::migrate!("../crates/lm-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let registry = ConnectionRegistry::new(ConnectionLimits { max_total: 100 });
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();
    let notifier = Notifier::new(
        registry.clone(),
        Arc::new(EmployeeRepository::new(pool.clone())),
        metrics.clone(),
    );
    let dispatcher = NotificationDispatcher::spawn(notifier.clone(), 1, &shutdown);

    AppState {
        pool,
        jwt_validator: Arc::new(JwtValidator::with_hs256(TEST_SECRET)),
        rate_limiter_factory: RateLimiterFactory::default(),
        registry,
        notifier,
        dispatcher,
        metrics,
        shutdown,
        config: ConnectionConfig::default(),
    }
}
