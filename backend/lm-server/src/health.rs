use lm_ws::AppState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sqlx::SqlitePool;

async fn database_reachable(pool: &SqlitePool) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Health check: database unreachable: {}", e);
            false
        }
    }
}

/// GET /health - component status and live client count
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database_ok = database_reachable(&state.pool).await;
    let connected_clients = state.registry.total_count().await;

    let health = json!({
        "status": if database_ok { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "websocket": {
                "status": "operational",
                "connected_clients": connected_clients,
            },
            "database": if database_ok { "operational" } else { "unavailable" },
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health)).into_response()
}

/// GET /live - the process answers
pub async fn liveness_check() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - not draining and the database answers
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    if state.shutdown.is_shutting_down() {
        return (StatusCode::SERVICE_UNAVAILABLE, "Shutting down").into_response();
    }

    if database_reachable(&state.pool).await {
        (StatusCode::OK, "Ready").into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable").into_response()
    }
}
