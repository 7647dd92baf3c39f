use crate::{
    ConnectionConfig, ConnectionId, ConnectionRegistry, Metrics, NotificationDispatcher, Notifier,
    ShutdownCoordinator, WebSocketConnection, create_connection_span,
};

use lm_auth::{ConnectionRateLimiter, EmployeeContext, JwtValidator, RateLimiterFactory, select_token};

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use log::{debug, error, warn};
use serde::Deserialize;
use sqlx::SqlitePool;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Shared state for the upgrade endpoint and the REST surface
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_validator: Arc<JwtValidator>,
    pub rate_limiter_factory: RateLimiterFactory,
    pub registry: ConnectionRegistry,
    pub notifier: Notifier,
    pub dispatcher: NotificationDispatcher,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpgradeParams {
    pub token: Option<String>,
}

/// WebSocket upgrade handler.
///
/// Authenticates and registers before upgrading, so a refused client never gets
/// an endpoint: 401 on bad credentials, 503 at the connection limit.
pub async fn handler(
    State(state): State<AppState>,
    Query(params): Query<UpgradeParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let employee = authenticate(&params, &headers, &state.jwt_validator).inspect_err(|_| {
        state.metrics.connection_rejected("unauthorized");
    })?;
    debug!(
        "WebSocket upgrade request from employee {}",
        employee.employee_id
    );

    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);

    let connection_id = state
        .registry
        .register(employee, tx)
        .await
        .map_err(|e| {
            error!("Failed to register connection: {e}");
            state.metrics.connection_rejected("limit");
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    let rate_limiter = state.rate_limiter_factory.create();
    let registry = state.registry.clone();

    Ok(ws
        .on_failed_upgrade(move |e| {
            warn!("WebSocket upgrade failed for connection {connection_id}: {e}");
            tokio::spawn(async move {
                registry.unregister(connection_id).await;
            });
        })
        .on_upgrade(move |socket| handle_socket(socket, connection_id, rx, state, rate_limiter)))
}

async fn handle_socket(
    socket: WebSocket,
    connection_id: ConnectionId,
    outbound: mpsc::Receiver<Message>,
    state: AppState,
    rate_limiter: ConnectionRateLimiter,
) {
    // Already evicted (e.g. shutdown raced the upgrade)
    let Some(info) = state.registry.get(connection_id).await else {
        warn!("Connection {connection_id} left the registry before upgrade completed");
        return;
    };

    let span = create_connection_span(&connection_id, info.employee_id, info.is_manager);
    let shutdown_guard = state.shutdown.subscribe_guard();

    let connection = WebSocketConnection::new(
        info,
        state.config.clone(),
        state.registry.clone(),
        state.metrics.clone(),
        rate_limiter,
    );

    if let Err(e) = connection
        .handle(socket, outbound, shutdown_guard)
        .instrument(span)
        .await
    {
        warn!("Connection {connection_id} ended with error: {e}");
    }
}

/// Validate the credential (query `token` first, then `Authorization: Bearer`)
fn authenticate(
    params: &UpgradeParams,
    headers: &HeaderMap,
    validator: &JwtValidator,
) -> Result<EmployeeContext, StatusCode> {
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());

    let token = select_token(params.token.as_deref(), authorization).map_err(|e| {
        warn!("WebSocket upgrade without usable credential: {e}");
        StatusCode::UNAUTHORIZED
    })?;

    validator.authenticate(token).map_err(|e| {
        warn!("JWT validation failed: {e}");
        StatusCode::UNAUTHORIZED
    })
}
