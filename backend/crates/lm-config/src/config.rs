use crate::{
    AuthConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, DatabaseConfig, DispatchConfig, LoggingConfig, RateLimitConfig,
    ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub websocket: WebSocketConfig,
    pub rate_limit: RateLimitConfig,
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. LM_CONFIG_DIR env var, else ./.lm/
    /// 2. Create the config directory if missing
    /// 3. config.toml if present, else defaults
    /// 4. LM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: LM_CONFIG_DIR env var > ./.lm/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all sections. Call after load() to fail fast at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let config_dir = Self::config_dir()?;

        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&config_dir)?;
        self.websocket.validate()?;
        self.rate_limit.validate()?;
        self.dispatch.validate()?;

        Ok(())
    }

    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary. Secrets are never printed.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} connections)",
            self.server.host, self.server.port, self.server.max_connections
        );
        info!(
            "  database: {} (pool {})",
            self.database.path, self.database.max_connections
        );
        info!("  auth: {}", self.auth.algorithm_name());
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
        info!(
            "  websocket: buffer={}, heartbeat={}s/{}s",
            self.websocket.send_buffer_size,
            self.websocket.heartbeat_interval_secs,
            self.websocket.heartbeat_timeout_secs
        );
        info!(
            "  rate_limit: {}/{}s",
            self.rate_limit.max_requests, self.rate_limit.window_secs
        );
        info!("  dispatch: {} workers", self.dispatch.worker_count);
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("LM_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("LM_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "LM_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Database
        Self::apply_env_string("LM_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "LM_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );

        // Auth
        Self::apply_env_option_string("LM_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_option_string(
            "LM_AUTH_JWT_PUBLIC_KEY_PATH",
            &mut self.auth.jwt_public_key_path,
        );

        // Logging
        Self::apply_env_parse("LM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("LM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_string("LM_LOG_DIR", &mut self.logging.dir);
        Self::apply_env_option_string("LM_LOG_FILE", &mut self.logging.file);

        // WebSocket
        Self::apply_env_parse(
            "LM_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "LM_WS_HEARTBEAT_INTERVAL_SECS",
            &mut self.websocket.heartbeat_interval_secs,
        );
        Self::apply_env_parse(
            "LM_WS_HEARTBEAT_TIMEOUT_SECS",
            &mut self.websocket.heartbeat_timeout_secs,
        );

        // Rate limit
        Self::apply_env_parse(
            "LM_RATE_LIMIT_MAX_REQUESTS",
            &mut self.rate_limit.max_requests,
        );
        Self::apply_env_parse(
            "LM_RATE_LIMIT_WINDOW_SECS",
            &mut self.rate_limit.window_secs,
        );

        // Dispatch
        Self::apply_env_parse(
            "LM_DISPATCH_WORKER_COUNT",
            &mut self.dispatch.worker_count,
        );
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the current setting untouched
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
