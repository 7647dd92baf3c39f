use crate::{AuthError, Claims, EmployeeContext, Result as AuthErrorResult};

use lm_core::ErrorLocation;

use std::panic::Location;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

const CLOCK_SKEW_LEEWAY_SECS: u64 = 30;

/// Verifies session tokens issued at login
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    algorithm: Algorithm,
}

impl JwtValidator {
    /// Create validator with HS256 (symmetric secret)
    pub fn with_hs256(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Self::validation_for(Algorithm::HS256),
            algorithm: Algorithm::HS256,
        }
    }

    /// Create validator with RS256 (asymmetric public key)
    #[track_caller]
    pub fn with_rs256(public_key_pem: &str) -> AuthErrorResult<Self> {
        let decoding_key =
            DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
                AuthError::InvalidToken {
                    message: format!("Invalid RSA public key: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        Ok(Self {
            decoding_key,
            validation: Self::validation_for(Algorithm::RS256),
            algorithm: Algorithm::RS256,
        })
    }

    fn validation_for(algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        validation
    }

    /// Validate JWT token and return claims
    #[track_caller]
    pub fn validate(&self, token: &str) -> AuthErrorResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::JwtDecode {
                        source: e,
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }

    /// Validate a bearer token and build the caller's identity from it
    #[track_caller]
    pub fn authenticate(&self, token: &str) -> AuthErrorResult<EmployeeContext> {
        self.validate(token).map(EmployeeContext::from_claims)
    }

    pub fn algorithm(&self) -> &str {
        match self.algorithm {
            Algorithm::HS256 => "HS256",
            Algorithm::RS256 => "RS256",
            _ => "unknown",
        }
    }
}
