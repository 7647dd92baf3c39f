#![allow(dead_code)]

//! Test infrastructure for lm-server API tests

use lm_auth::{Claims, EmployeeContext, JwtValidator, RateLimiterFactory};
use lm_db::EmployeeRepository;
use lm_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    NotificationDispatcher, Notifier, ShutdownCoordinator,
};

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::ws::Message,
    http::{Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::mpsc;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &[u8] = b"api-test-secret-key-that-is-at-least-32-bytes";

/// Single-connection in-memory database with migrations applied
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(":memory:")
                .foreign_keys(true),
        )
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("../crates/lm-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub async fn create_test_app_state() -> AppState {
    let pool = create_test_pool().await;
    let registry = ConnectionRegistry::new(ConnectionLimits { max_total: 100 });
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();
    let notifier = Notifier::new(
        registry.clone(),
        Arc::new(EmployeeRepository::new(pool.clone())),
        metrics.clone(),
    );
    let dispatcher = NotificationDispatcher::spawn(notifier.clone(), 2, &shutdown);

    AppState {
        pool,
        jwt_validator: Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET)),
        rate_limiter_factory: RateLimiterFactory::default(),
        registry,
        notifier,
        dispatcher,
        metrics,
        shutdown,
        config: ConnectionConfig::default(),
    }
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

pub async fn remaining_leave_days(pool: &SqlitePool, employee_id: i64) -> i64 {
    sqlx::query_scalar("SELECT remaining_leave_days FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}

pub fn create_token(employee_id: i64, is_manager: bool, role_name: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        employee_id,
        is_manager,
        role_name: role_name.to_string(),
        role_id: None,
        department_id: None,
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET),
    )
    .expect("Failed to encode JWT")
}

/// Send one request through the router and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Join the hub as `employee_id` without a socket; returns the outbound queue
pub async fn subscribe(
    state: &AppState,
    employee_id: i64,
    is_manager: bool,
) -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(16);
    state
        .registry
        .register(
            EmployeeContext {
                employee_id,
                is_manager,
                role_name: if is_manager { "manager" } else { "employee" }.to_string(),
                department_id: None,
            },
            tx,
        )
        .await
        .expect("Failed to register endpoint");
    rx
}

/// Next notification on a queue, or None if nothing arrives shortly
pub async fn next_notification(rx: &mut mpsc::Receiver<Message>) -> Option<Value> {
    match tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
        Ok(Some(Message::Text(text))) => serde_json::from_str(text.as_str()).ok(),
        _ => None,
    }
}
