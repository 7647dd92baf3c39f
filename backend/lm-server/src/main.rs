use lm_server::error::ServerError;
use lm_server::{build_router, logger, metrics_router};

use lm_auth::{JwtValidator, RateLimiterFactory};
use lm_config::Config;
use lm_db::EmployeeRepository;
use lm_ws::{
    AppState, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    NotificationDispatcher, Notifier, ShutdownCoordinator,
};

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(e) = dotenvy::dotenv() {
        // A missing .env is normal; anything else is worth a line once logging is up
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env file: {e}");
        }
    }

    let config = Config::load()?;
    config.validate()?;
    let config_dir = Config::config_dir()?;

    let log_file_path: Option<PathBuf> = match config.logging.file {
        Some(ref filename) => {
            let log_dir = config_dir.join(&config.logging.dir);
            std::fs::create_dir_all(&log_dir)?;
            Some(log_dir.join(filename))
        }
        None => None,
    };

    // Before any other logging
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting lm-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let pool = connect_database(&config).await?;

    let prometheus = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics {
            message: e.to_string(),
        })?;

    let jwt_validator = if let Some(ref secret) = config.auth.jwt_secret {
        info!("JWT: HS256 authentication enabled");
        JwtValidator::with_hs256(secret.as_bytes())
    } else {
        let public_key = config.auth.load_public_key(&config_dir)?;
        info!("JWT: RS256 authentication enabled");
        JwtValidator::with_rs256(&public_key)?
    };

    let rate_limiter_factory = RateLimiterFactory::new(lm_auth::RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window_secs: config.rate_limit.window_secs,
    });

    let registry = ConnectionRegistry::new(ConnectionLimits {
        max_total: config.server.max_connections,
    });
    let metrics = Metrics::new();
    let shutdown = ShutdownCoordinator::new();

    let notifier = Notifier::new(
        registry.clone(),
        Arc::new(EmployeeRepository::new(pool.clone())),
        metrics.clone(),
    );
    let dispatcher =
        NotificationDispatcher::spawn(notifier.clone(), config.dispatch.worker_count, &shutdown);

    let app_state = AppState {
        pool: pool.clone(),
        jwt_validator: Arc::new(jwt_validator),
        rate_limiter_factory,
        registry,
        notifier,
        dispatcher,
        metrics,
        shutdown: shutdown.clone(),
        config: ConnectionConfig::from(&config.websocket),
    };

    let app = build_router(app_state).merge(metrics_router(prometheus));

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    info!("Server ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.subscribe_guard().wait().await;
            info!("Shutdown signalled, draining connections");
        })
        .await?;

    pool.close().await;
    info!("Graceful shutdown complete");

    Ok(())
}

async fn connect_database(config: &Config) -> Result<SqlitePool, ServerError> {
    let database_path = config.database_path()?;
    info!("Connecting to database: {}", database_path.display());

    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(database_path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(Duration::from_secs(5)),
        )
        .await?;
    info!("Database connection established");

    info!("Running database migrations...");
    sqlx::migrate!("../crates/lm-db/migrations").run(&pool).await?;
    info!("Migrations complete");

    Ok(pool)
}
