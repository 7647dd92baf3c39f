use crate::{ConnectionId, ConnectionInfo, ConnectionLimits, Result as WsErrorResult, WsError};

use lm_auth::EmployeeContext;

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Arc;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{RwLock, mpsc};

/// Directory of every live endpoint in the process.
///
/// The registry holds the only sender for each endpoint's outbound queue, so removing
/// a member closes its queue. Membership changes and fan-out share one lock.
pub struct ConnectionRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    limits: ConnectionLimits,
}

struct RegistryInner {
    connections: HashMap<ConnectionId, Member>,
}

struct Member {
    info: ConnectionInfo,
    sender: mpsc::Sender<Message>,
}

/// Result of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Endpoints whose queue accepted the message
    pub delivered: usize,
    /// Endpoints evicted because their queue was full or closed
    pub dropped: usize,
}

impl ConnectionRegistry {
    pub fn new(limits: ConnectionLimits) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
            })),
            limits,
        }
    }

    /// Register a new endpoint and take ownership of its queue sender
    pub async fn register(
        &self,
        employee: EmployeeContext,
        sender: mpsc::Sender<Message>,
    ) -> WsErrorResult<ConnectionId> {
        let mut inner = self.inner.write().await;

        if inner.connections.len() >= self.limits.max_total {
            warn!(
                "Total connection limit reached: {}/{}",
                inner.connections.len(),
                self.limits.max_total
            );
            return Err(WsError::ConnectionLimitExceeded {
                current: inner.connections.len(),
                max: self.limits.max_total,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let connection_id = ConnectionId::new();
        let info = ConnectionInfo::new(connection_id, employee);
        info!(
            "Registered connection {connection_id} for employee {} (manager: {}, {} total)",
            info.employee_id,
            info.is_manager,
            inner.connections.len() + 1
        );
        inner
            .connections
            .insert(connection_id, Member { info, sender });

        Ok(connection_id)
    }

    /// Remove an endpoint, closing its outbound queue. Returns false if it was not a member.
    pub async fn unregister(&self, connection_id: ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        match inner.connections.remove(&connection_id) {
            Some(member) => {
                info!(
                    "Unregistered connection {connection_id} for employee {} ({} remaining)",
                    member.info.employee_id,
                    inner.connections.len()
                );
                true
            }
            None => false,
        }
    }

    pub async fn get(&self, connection_id: ConnectionId) -> Option<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.get(&connection_id).map(|m| m.info.clone())
    }

    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }

    /// Copy of current membership, for work that must not hold the lock
    pub async fn snapshot(&self) -> Vec<ConnectionInfo> {
        let inner = self.inner.read().await;
        inner.connections.values().map(|m| m.info.clone()).collect()
    }

    /// Enqueue on every member
    pub async fn broadcast(&self, message: Message) -> DeliveryReport {
        self.send_where(message, |_| true).await
    }

    /// Enqueue on every member accepted by `predicate`
    pub async fn send_where<F>(&self, message: Message, predicate: F) -> DeliveryReport
    where
        F: Fn(&ConnectionInfo) -> bool,
    {
        let mut inner = self.inner.write().await;
        let targets: Vec<ConnectionId> = inner
            .connections
            .values()
            .filter(|m| predicate(&m.info))
            .map(|m| m.info.connection_id)
            .collect();

        Self::enqueue(&mut inner, &targets, &message)
    }

    /// Enqueue on the listed endpoints that are still members
    pub async fn send_to(&self, connection_ids: &[ConnectionId], message: Message) -> DeliveryReport {
        let mut inner = self.inner.write().await;
        let unique: HashSet<ConnectionId> = connection_ids.iter().copied().collect();
        let targets: Vec<ConnectionId> = unique.into_iter().collect();

        Self::enqueue(&mut inner, &targets, &message)
    }

    fn enqueue(
        inner: &mut RegistryInner,
        targets: &[ConnectionId],
        message: &Message,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut evicted = Vec::new();

        for connection_id in targets {
            let Some(member) = inner.connections.get(connection_id) else {
                continue;
            };

            match member.sender.try_send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Outbound queue full for connection {connection_id} (employee {}), dropping client",
                        member.info.employee_id
                    );
                    evicted.push(*connection_id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Outbound queue closed for connection {connection_id}, removing");
                    evicted.push(*connection_id);
                }
            }
        }

        for connection_id in evicted {
            // Dropping the member drops the last sender and closes the queue
            inner.connections.remove(&connection_id);
            report.dropped += 1;
        }

        report
    }
}

impl Clone for ConnectionRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limits: self.limits.clone(),
        }
    }
}
