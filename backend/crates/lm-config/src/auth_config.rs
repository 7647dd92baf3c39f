use crate::{ConfigError, ConfigErrorResult};

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Token verification settings. Exactly one of the two key sources is used;
/// the shared secret wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: Option<String>,
    /// RS256 public key PEM, relative to the config directory unless absolute
    pub jwt_public_key_path: Option<String>,
}

impl AuthConfig {
    pub fn validate(&self, config_dir: &Path) -> ConfigErrorResult<()> {
        match (&self.jwt_secret, &self.jwt_public_key_path) {
            (Some(secret), _) => {
                if secret.len() < MIN_JWT_SECRET_LENGTH {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_secret must be at least {} characters",
                        MIN_JWT_SECRET_LENGTH
                    )));
                }
                Ok(())
            }
            (None, Some(_)) => {
                let path = self.public_key_path(config_dir).unwrap_or_default();
                if !path.exists() {
                    return Err(ConfigError::auth(format!(
                        "auth.jwt_public_key_path does not exist: {}",
                        path.display()
                    )));
                }
                Ok(())
            }
            (None, None) => Err(ConfigError::auth(
                "either auth.jwt_secret or auth.jwt_public_key_path must be set",
            )),
        }
    }

    /// Resolve the public key location against the config directory
    pub fn public_key_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.jwt_public_key_path.as_ref().map(|p| {
            let path = PathBuf::from(p);
            if path.is_absolute() {
                path
            } else {
                config_dir.join(path)
            }
        })
    }

    /// Read the RS256 public key PEM
    pub fn load_public_key(&self, config_dir: &Path) -> ConfigErrorResult<String> {
        let path = self
            .public_key_path(config_dir)
            .ok_or_else(|| ConfigError::auth("auth.jwt_public_key_path is not set"))?;

        std::fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })
    }

    pub fn algorithm_name(&self) -> &'static str {
        if self.jwt_secret.is_some() {
            "HS256"
        } else if self.jwt_public_key_path.is_some() {
            "RS256"
        } else {
            "none"
        }
    }
}
