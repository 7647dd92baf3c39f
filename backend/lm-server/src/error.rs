use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {0}")]
    Config(#[from] lm_config::ConfigError),

    #[error("Auth setup failed: {0}")]
    Auth(#[from] lm_auth::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logger initialization failed: {message}")]
    Logger { message: String },

    #[error("Metrics recorder installation failed: {message}")]
    Metrics { message: String },
}

pub type Result<T> = std::result::Result<T, ServerError>;
