use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid token: {message} {location}")]
    InvalidToken {
        message: String,
        location: ErrorLocation,
    },

    #[error("Token expired {location}")]
    TokenExpired { location: ErrorLocation },

    #[error("Missing bearer token {location}")]
    MissingToken { location: ErrorLocation },

    #[error("Invalid authorization scheme: expected 'Bearer' {location}")]
    InvalidScheme { location: ErrorLocation },

    #[error("JWT decode failed: {source} {location}")]
    JwtDecode {
        #[source]
        source: jsonwebtoken::errors::Error,
        location: ErrorLocation,
    },

    #[error("Rate limit exceeded: {limit} messages per {window_secs}s {location}")]
    RateLimitExceeded {
        limit: u32,
        window_secs: u64,
        location: ErrorLocation,
    },

    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Machine-readable code for JSON error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::TokenExpired { .. } => "TOKEN_EXPIRED",
            Self::MissingToken { .. } => "MISSING_TOKEN",
            Self::InvalidScheme { .. } => "INVALID_AUTH_SCHEME",
            Self::JwtDecode { .. } => "JWT_DECODE_FAILED",
            Self::RateLimitExceeded { .. } => "RATE_LIMIT_EXCEEDED",
            Self::InvalidClaim { .. } => "INVALID_CLAIM",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
