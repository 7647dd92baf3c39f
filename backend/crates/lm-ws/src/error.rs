use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Connection limit exceeded: {current} connections (max: {max}) {location}")]
    ConnectionLimitExceeded {
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Heartbeat timeout after {timeout_secs}s {location}")]
    HeartbeatTimeout {
        timeout_secs: u64,
        location: ErrorLocation,
    },

    #[error("Client exceeded its frame budget: {message} {location}")]
    RateLimited {
        message: String,
        location: ErrorLocation,
    },

    #[error("Department lookup failed for employee {employee_id}: {message} {location}")]
    DepartmentLookup {
        employee_id: i64,
        message: String,
        location: ErrorLocation,
    },

    #[error("Notification serialization failed: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl WsError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "CONNECTION_CLOSED",
            Self::ConnectionLimitExceeded { .. } => "CONNECTION_LIMIT",
            Self::HeartbeatTimeout { .. } => "HEARTBEAT_TIMEOUT",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::DepartmentLookup { .. } => "LOOKUP_FAILED",
            Self::Serialization { .. } => "SERIALIZATION_FAILED",
        }
    }
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
