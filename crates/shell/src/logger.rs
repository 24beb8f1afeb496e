//! Logging for the CLI.

use std::path::PathBuf;

use ftlog::{
    appender::{FileAppender, Period},
    LevelFilter, LoggerGuard,
};

/// Configures a logger writing to `./logs/<file_name>.log`.
///
/// The log file is rotated daily, and errors from the appender itself go to
/// a sibling `.err.log` file.
///
/// # Errors
///
/// - If a logs directory could not be located/created.
/// - If the logger could not be initialized.
pub fn configure_logger(file_name: &str, level: LevelFilter) -> Result<(LoggerGuard, PathBuf), String> {
    let logs_dir = PathBuf::from(".")
        .canonicalize()
        .map_err(|e| e.to_string())?
        .join("logs");
    if !logs_dir.exists() {
        std::fs::create_dir(&logs_dir).map_err(|e| e.to_string())?;
    }
    let log_path = logs_dir.join(format!("{file_name}.log"));
    let err_path = log_path.with_extension("err.log");

    let writer = FileAppender::builder().path(&log_path).rotate(Period::Day).build();

    let guard = ftlog::Builder::new()
        .max_log_level(level)
        .root(writer)
        .filter("ftlog::appender", "ftlog-appender", LevelFilter::Debug)
        .appender("ftlog-appender", FileAppender::new(err_path))
        .try_init()
        .map_err(|e| e.to_string())?;

    Ok((guard, log_path))
}
