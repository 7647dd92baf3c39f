use crate::{
    create_leave_request, health, list_my_leave_requests, list_pending_leave_requests,
    send_test_notification, update_leave_status, websocket_clients,
};

use lm_ws::AppState;

use axum::{
    Router,
    routing::{get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // WebSocket endpoint
        .route("/ws", get(lm_ws::handler))
        // Health
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
        // Leave requests
        .route("/api/leave", post(create_leave_request))
        .route("/api/leave/my-requests", get(list_my_leave_requests))
        .route("/api/leave/pending", get(list_pending_leave_requests))
        .route("/api/leave/{id}/status", put(update_leave_status))
        // Diagnostics
        .route("/api/debug/websocket", get(websocket_clients))
        .route("/api/debug/test-notification", post(send_test_notification))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// `GET /metrics` in Prometheus text format
pub fn metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || std::future::ready(handle.render())),
    )
}
