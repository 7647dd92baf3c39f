use metrics::{counter, gauge};

/// Metrics collector for the notification hub
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "lm_ws" }
    }

    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    pub fn connection_closed(&self, reason: &str) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        counter!(format!("{}.connections.closed.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Upgrade refused before an endpoint was created
    pub fn connection_rejected(&self, reason: &str) {
        counter!(format!("{}.connections.rejected.{}", self.prefix, reason)).increment(1);
    }

    pub fn notification_dispatched(&self, kind: &str, delivered: usize) {
        counter!(format!("{}.notifications.dispatched", self.prefix)).increment(1);
        counter!(format!("{}.notifications.dispatched.{}", self.prefix, kind)).increment(1);
        counter!(format!("{}.notifications.deliveries", self.prefix)).increment(delivered as u64);
    }

    /// Endpoints evicted because their outbound queue was full or closed
    pub fn slow_clients_dropped(&self, count: usize) {
        if count > 0 {
            counter!(format!("{}.clients.dropped", self.prefix)).increment(count as u64);
        }
    }

    pub fn department_lookup_failed(&self) {
        counter!(format!("{}.errors.department_lookup", self.prefix)).increment(1);
    }

    pub fn serialization_failed(&self) {
        counter!(format!("{}.errors.serialization", self.prefix)).increment(1);
    }

    pub fn client_frame_received(&self) {
        counter!(format!("{}.frames.received", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
