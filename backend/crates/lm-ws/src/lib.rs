pub mod app_state;
pub mod connection_config;
pub mod connection_id;
pub mod connection_info;
pub mod connection_limits;
pub mod connection_registry;
pub mod delivery;
pub mod department_lookup;
pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod notification;
pub mod notifier;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod web_socket_connection;

pub use app_state::{AppState, UpgradeParams, handler};
pub use connection_config::ConnectionConfig;
pub use connection_id::ConnectionId;
pub use connection_info::ConnectionInfo;
pub use connection_limits::ConnectionLimits;
pub use connection_registry::{ConnectionRegistry, DeliveryReport};
pub use delivery::{Audience, should_deliver};
pub use department_lookup::DepartmentLookup;
pub use dispatcher::{DispatchJob, NotificationDispatcher};
pub use error::{Result, WsError};
pub use metrics::Metrics;
pub use notification::{Notification, NotificationKind};
pub use notifier::{ClientsSummary, ConnectedClient, Notifier};
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use web_socket_connection::WebSocketConnection;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Span covering both tasks of one endpoint
pub fn create_connection_span(
    connection_id: &ConnectionId,
    employee_id: i64,
    is_manager: bool,
) -> tracing::Span {
    info_span!(
        "ws_connection",
        connection_id = %connection_id,
        employee_id = employee_id,
        is_manager = is_manager,
    )
}
