use crate::error::{Result as ServerErrorResult, ServerError};

use std::path::PathBuf;
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::{Color, ColoredLevelConfig};
use log::{Record, info};

/// Install the global fern logger.
///
/// * `log_file` - `None` logs to stdout, `Some` appends to the file
/// * `colored` - colour level names on stdout; ignored for file output
pub fn initialize(
    log_level: lm_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let level_filter = *log_level;

    let output = if let Some(ref log_path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|source| ServerError::LogFile {
                path: log_path.display().to_string(),
                source,
            })?;

        Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}",
                    format_line(message, record, record.level().to_string())
                ))
            })
            .chain(file)
    } else if colored {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Magenta)
            .debug(Color::Blue)
            .info(Color::Green)
            .warn(Color::Yellow)
            .error(Color::Red);

        Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "{}",
                    format_line(message, record, colors.color(record.level()).to_string())
                ))
            })
            .chain(std::io::stdout())
    } else {
        // systemd, docker logs
        Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}",
                    format_line(message, record, record.level().to_string())
                ))
            })
            .chain(std::io::stdout())
    };

    Dispatch::new()
        .level(level_filter)
        // sqlx logs every statement at info
        .level_for("sqlx", log::LevelFilter::Warn)
        .chain(output)
        .apply()
        .map_err(|e| ServerError::Logger {
            message: e.to_string(),
        })?;

    match log_file {
        Some(ref path) => info!(
            "Logger initialized: level={:?}, file={}",
            level_filter,
            path.display()
        ),
        None => info!("Logger initialized: level={:?}, stdout", level_filter),
    }

    Ok(())
}

/// `[<rfc3339> - <level>] <message> [<file>:<line>]`
pub fn format_line(message: &std::fmt::Arguments, record: &Record, level: String) -> String {
    format!(
        "[{date} - {level}] {message} [{file}:{line}]",
        date = humantime::format_rfc3339(SystemTime::now()),
        file = record.file().unwrap_or("unknown"),
        line = record.line().unwrap_or(0),
    )
}
