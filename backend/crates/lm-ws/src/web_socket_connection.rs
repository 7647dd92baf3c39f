use crate::{
    ConnectionConfig, ConnectionId, ConnectionInfo, ConnectionRegistry, Metrics,
    Result as WsErrorResult, ShutdownGuard, WsError,
};

use lm_auth::ConnectionRateLimiter;

use std::panic::Location;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, close_code};
use error_location::ErrorLocation;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, timeout};
use tracing::Instrument;

/// How long the writer gets to send its close frame once the queue is closed
const WRITER_CLOSE_GRACE: Duration = Duration::from_secs(2);

/// One live endpoint: an inbound drain and an outbound writer over a single socket
pub struct WebSocketConnection {
    info: ConnectionInfo,
    config: ConnectionConfig,
    registry: ConnectionRegistry,
    metrics: Metrics,
    rate_limiter: ConnectionRateLimiter,
}

impl WebSocketConnection {
    pub fn new(
        info: ConnectionInfo,
        config: ConnectionConfig,
        registry: ConnectionRegistry,
        metrics: Metrics,
        rate_limiter: ConnectionRateLimiter,
    ) -> Self {
        Self {
            info,
            config,
            registry,
            metrics,
            rate_limiter,
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.info.connection_id
    }

    /// Run the endpoint until the client leaves, the queue closes, the heartbeat
    /// lapses, or shutdown is signalled. Always unregisters before returning.
    pub async fn handle(
        self,
        socket: WebSocket,
        outbound: mpsc::Receiver<Message>,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        let connection_id = self.info.connection_id;
        log::info!(
            "WebSocket connection {connection_id} established for employee {} ({})",
            self.info.employee_id,
            self.info.role_name
        );
        self.metrics.connection_established();

        let (ws_sender, mut ws_receiver) = socket.split();

        let mut writer = tokio::spawn(
            write_outbound(
                connection_id,
                ws_sender,
                outbound,
                self.config.heartbeat_interval(),
            )
            .in_current_span(),
        );

        let mut writer_finished = false;
        let result = tokio::select! {
            result = self.read_inbound(&mut ws_receiver, &mut shutdown_guard) => result,
            joined = &mut writer => {
                writer_finished = true;
                if let Err(e) = joined {
                    log::warn!("Writer task for connection {connection_id} failed: {e}");
                }
                log::debug!("Outbound side of connection {connection_id} finished first");
                Ok(())
            }
        };

        // Closing the queue lets the writer send its close frame and exit
        self.registry.unregister(connection_id).await;
        drop(ws_receiver);
        if !writer_finished {
            match timeout(WRITER_CLOSE_GRACE, &mut writer).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    log::warn!("Writer task for connection {connection_id} failed: {e}");
                }
                Err(_) => {
                    log::warn!(
                        "Writer for connection {connection_id} stalled past {}s, aborting",
                        WRITER_CLOSE_GRACE.as_secs()
                    );
                    writer.abort();
                }
            }
        }

        let reason = match &result {
            Ok(()) => "normal",
            Err(WsError::HeartbeatTimeout { .. }) => "heartbeat_timeout",
            Err(WsError::RateLimited { .. }) => "rate_limited",
            Err(_) => "error",
        };
        self.metrics.connection_closed(reason);
        log::info!("WebSocket connection {connection_id} closed ({reason})");

        result
    }

    /// Drain client frames. Content is ignored; any frame counts as liveness.
    async fn read_inbound(
        &self,
        ws_receiver: &mut SplitStream<WebSocket>,
        shutdown_guard: &mut ShutdownGuard,
    ) -> WsErrorResult<()> {
        let connection_id = self.info.connection_id;
        let silence = self.config.heartbeat_timeout();

        loop {
            let frame = tokio::select! {
                frame = timeout(silence, ws_receiver.next()) => frame,
                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {connection_id} gracefully");
                    return Ok(());
                }
            };

            match frame {
                Err(_) => {
                    log::warn!(
                        "Connection {connection_id} silent for {}s, closing",
                        self.config.heartbeat_timeout_secs
                    );
                    return Err(WsError::HeartbeatTimeout {
                        timeout_secs: self.config.heartbeat_timeout_secs,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(None) => {
                    log::info!("Connection {connection_id} closed by client");
                    return Ok(());
                }
                Ok(Some(Err(e))) => {
                    log::warn!("WebSocket error on connection {connection_id}: {e}");
                    return Err(WsError::ConnectionClosed {
                        reason: format!("WebSocket error: {e}"),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                Ok(Some(Ok(Message::Close(_)))) => {
                    log::info!("Received close frame from connection {connection_id}");
                    return Ok(());
                }
                Ok(Some(Ok(Message::Pong(_)))) => {
                    log::trace!("Heartbeat acknowledged by connection {connection_id}");
                }
                Ok(Some(Ok(msg))) => self.on_client_frame(msg)?,
            }
        }
    }

    /// The channel is push-only, so client payloads are counted and discarded
    fn on_client_frame(&self, msg: Message) -> WsErrorResult<()> {
        self.metrics.client_frame_received();

        self.rate_limiter.check().map_err(|e| {
            log::warn!(
                "Connection {} (employee {}) exceeded its frame budget",
                self.info.connection_id,
                self.info.employee_id
            );
            WsError::RateLimited {
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        if let Message::Text(text) = msg {
            log::debug!(
                "Ignoring {} byte text frame from connection {}",
                text.len(),
                self.info.connection_id
            );
        }

        Ok(())
    }
}

/// Write queued messages, batching whatever is already waiting into one flush.
/// Sends a close frame once the queue is closed; stops on the first write error.
async fn write_outbound(
    connection_id: ConnectionId,
    mut ws_sender: SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Message>,
    heartbeat_every: Duration,
) {
    let mut heartbeat = interval_at(Instant::now() + heartbeat_every, heartbeat_every);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = outbound.recv() => {
                let Some(first) = next else {
                    let close = Message::Close(Some(CloseFrame {
                        code: close_code::NORMAL,
                        reason: Utf8Bytes::from_static("connection closed by server"),
                    }));
                    if let Err(e) = ws_sender.send(close).await {
                        log::debug!("Close frame not delivered to connection {connection_id}: {e}");
                    }
                    return;
                };

                if let Err(e) = write_batch(&mut ws_sender, &mut outbound, first).await {
                    log::warn!("Write to connection {connection_id} failed: {e}");
                    return;
                }
            }
            _ = heartbeat.tick() => {
                if let Err(e) = ws_sender.send(Message::Ping(Bytes::new())).await {
                    log::warn!("Heartbeat to connection {connection_id} failed: {e}");
                    return;
                }
            }
        }
    }
}

async fn write_batch(
    ws_sender: &mut SplitSink<WebSocket, Message>,
    outbound: &mut mpsc::Receiver<Message>,
    first: Message,
) -> Result<(), axum::Error> {
    ws_sender.feed(first).await?;
    while let Ok(queued) = outbound.try_recv() {
        ws_sender.feed(queued).await?;
    }
    ws_sender.flush().await
}
