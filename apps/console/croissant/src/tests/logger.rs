// Unit tests for logger initialization
// One test owns the global logger, so ordering between tests cannot matter

use crate::logger::{LOG_FILE_NAME, initialize};

use std::path::PathBuf;

use tempfile::TempDir;

/// **VALUE**: A failed attempt is reported, and a later good attempt still works
/// and stays idempotent.
///
/// **WHY THIS MATTERS**: The log directory is created at startup and may be
/// unwritable. Startup must get a clear error, not a panic, and calling
/// initialize from two code paths must not fail.
///
/// **BUG THIS CATCHES**: Would catch:
/// - `fern::log_file()` being unwrapped
/// - A failed attempt marking the logger as installed
/// - fern panicking when a second global logger is set
#[test]
fn given_bad_then_good_dir_when_initialized_twice_then_error_then_ok() {
    // GIVEN: A path that cannot hold a file, and a writable temp dir
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");
    let temp_dir = TempDir::new().expect("temp dir");

    // WHEN: Initializing against the invalid path
    let failed = initialize(&invalid_dir);

    // THEN: Error, not panic
    assert!(
        matches!(failed, Err(crate::error::AppError::App { .. })),
        "Should return error for invalid log directory"
    );

    // WHEN: Initializing twice against the valid dir
    let first = initialize(temp_dir.path());
    let second = initialize(temp_dir.path());

    // THEN: Both Ok, and the log file exists
    assert!(first.is_ok(), "{first:?}");
    assert!(second.is_ok(), "Second initialization should be a no-op");
    assert!(temp_dir.path().join(LOG_FILE_NAME).exists());
}
