use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;

const BEARER_PREFIX: &str = "Bearer ";

/// Pick the credential for a WebSocket upgrade.
///
/// Browsers cannot set headers on a WebSocket handshake, so the `token` query
/// parameter is consulted first; the `Authorization: Bearer` header is the fallback.
/// Empty values count as absent.
#[track_caller]
pub fn select_token<'a>(
    query_token: Option<&'a str>,
    authorization: Option<&'a str>,
) -> AuthErrorResult<&'a str> {
    if let Some(token) = query_token.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token);
    }

    let header = authorization
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AuthError::MissingToken {
            location: ErrorLocation::from(Location::caller()),
        })?;

    from_authorization_header(header)
}

/// Strip the `Bearer ` scheme from an Authorization header value
#[track_caller]
pub fn from_authorization_header(header: &str) -> AuthErrorResult<&str> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AuthError::InvalidScheme {
            location: ErrorLocation::from(Location::caller()),
        })?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken {
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(token)
}
