//! Logging for the croissant console host.
//!
//! Coloured stdout plus a plain log file, set up at most once per process.

use crate::error::AppError;

use common::ErrorLocation;

use std::fmt::{Arguments, Display};
use std::io::stdout;
use std::panic::Location;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, Record, info, warn};

/// Serializes initialization attempts.
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Set once a dispatch has been installed.
static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "croissant.log";

#[cfg(debug_assertions)]
const LOG_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the stdout + file logger, writing `croissant.log` under `log_dir`.
///
/// Later calls warn and return `Ok`. A failed attempt leaves nothing installed,
/// so it may be retried with another directory.
///
/// # Errors
///
/// Returns [`AppError::App`] if the log file cannot be created or another
/// logger already owns the `log` facade.
pub fn initialize(log_dir: &Path) -> Result<(), AppError> {
    let _guard = INIT_LOCK.lock().map_err(|e| AppError::App {
        message: format!("Logger lock poisoned: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if LOGGER_INITIALIZED.load(Ordering::SeqCst) {
        warn!("Logger already initialized");
        return Ok(());
    }

    install(log_dir)?;
    LOGGER_INITIALIZED.store(true, Ordering::SeqCst);

    info!("Logger initialized with level: {LOG_LEVEL:?}");
    Ok(())
}

/// `[<rfc3339> - <LEVEL>] <message> [<file>:<line>]`
fn write_line(out: fern::FormatCallback, message: &Arguments, record: &Record, level: impl Display) {
    out.finish(format_args!(
        "[{} - {level}] {message} [{}:{}]",
        format_rfc3339(SystemTime::now()),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ))
}

#[track_caller]
fn install(log_dir: &Path) -> Result<(), AppError> {
    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = fern::log_file(&log_file_path).map_err(|e| AppError::App {
        message: format!("Failed to create log file {}: {e}", log_file_path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let colors = ColoredLevelConfig::new()
        .trace(Magenta)
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red);

    let console = Dispatch::new()
        .format(move |out, message, record| {
            write_line(out, message, record, colors.color(record.level()))
        })
        .chain(stdout());

    // Plain levels; no escape codes in the file.
    let file = Dispatch::new()
        .format(|out, message, record| write_line(out, message, record, record.level()))
        .chain(log_file);

    Dispatch::new()
        .level(LOG_LEVEL)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Info)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(|e| AppError::App {
            message: format!("Another logger already owns the log facade: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}
