use croissant_core::config::{ENV_API_BASE, ENV_FORCE_NATIVE, ENV_READINESS_DEADLINE_MS};
use croissant_core::error::ConfigError;
use croissant_core::{API_BASE, DispatchConfig};

use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

// ============================================================================
// Config file loading, saving and environment overrides
// ============================================================================

const CONFIG_FILE: &str = "croissant.toml";

fn clear_overrides() {
    unsafe {
        std::env::remove_var(ENV_API_BASE);
        std::env::remove_var(ENV_FORCE_NATIVE);
        std::env::remove_var(ENV_READINESS_DEADLINE_MS);
    }
}

/// **VALUE**: A first run without any config file still works.
///
/// **BUG THIS CATCHES**: Would catch a missing file being reported as a read error.
#[test]
fn given_empty_dir_when_load_then_defaults() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");

    // WHEN
    let config = DispatchConfig::load(dir.path()).expect("defaults");

    // THEN
    assert_eq!(config, DispatchConfig::default());
    assert_eq!(config.api.base_url, API_BASE);
    assert_eq!(config.readiness.timings().deadline, Duration::from_secs(10));
}

/// **VALUE**: Saved settings come back unchanged, and no temp file is left behind.
#[test]
fn given_saved_config_when_loaded_then_same_values() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let mut config = DispatchConfig::default();
    config.api.base_url = "https://api.example.com/api".to_string();
    config.readiness.deadline_ms = 4_000;
    config.environment.force_native = true;

    // WHEN
    config.save(dir.path()).expect("save");
    let loaded = DispatchConfig::load(dir.path()).expect("load");

    // THEN
    assert_eq!(loaded, config);
    assert!(!dir.path().join(format!("{CONFIG_FILE}.tmp")).exists());
}

/// **VALUE**: Sections left out of the file keep their defaults.
#[test]
fn given_partial_file_when_loaded_then_missing_fields_default() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[api]\nbase_url = \"http://10.0.0.2:3001/api\"\n",
    )
    .expect("write");

    // WHEN
    let config = DispatchConfig::load(dir.path()).expect("load");

    // THEN
    assert_eq!(config.api.base_url, "http://10.0.0.2:3001/api");
    assert_eq!(config.readiness, DispatchConfig::default().readiness);
    assert!(!config.environment.force_native);
}

#[test]
fn given_invalid_toml_when_loaded_then_parse_error() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join(CONFIG_FILE), "[api\nbase_url = ").expect("write");

    // WHEN
    let result = DispatchConfig::load(dir.path());

    // THEN
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Timings that could never produce the documented schedule are refused.
///
/// **BUG THIS CATCHES**: Would catch a deadline shorter than the activation
/// time, which would make activation unreachable.
#[test]
fn given_deadline_before_activation_when_loaded_then_validation_error() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[readiness]\nactivation_after_ms = 5000\ndeadline_ms = 2000\n",
    )
    .expect("write");

    // WHEN
    let result = DispatchConfig::load(dir.path());

    // THEN
    assert!(matches!(
        result,
        Err(ConfigError::ValidationError {
            field: "readiness.deadline_ms",
            ..
        })
    ));
}

#[test]
fn given_invalid_config_when_saved_then_nothing_written() {
    // GIVEN
    let dir = TempDir::new().expect("temp dir");
    let mut config = DispatchConfig::default();
    config.api.base_url = "ftp://example.com".to_string();

    // WHEN
    let result = config.save(dir.path());

    // THEN
    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    assert!(!dir.path().join(CONFIG_FILE).exists());
}

/// **VALUE**: Environment variables win over the file.
///
/// **WHY THIS MATTERS**: Packaged builds point at a different API without
/// editing the user's config.
#[test]
#[serial]
fn given_env_overrides_when_applied_then_fields_replaced() {
    // GIVEN
    clear_overrides();
    unsafe {
        std::env::set_var(ENV_API_BASE, "https://staging.example.com/api");
        std::env::set_var(ENV_FORCE_NATIVE, "yes");
        std::env::set_var(ENV_READINESS_DEADLINE_MS, "2500");
    }
    let mut config = DispatchConfig::default();

    // WHEN
    let result = config.apply_env_overrides();
    clear_overrides();

    // THEN
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(config.api.base_url, "https://staging.example.com/api");
    assert!(config.environment.force_native);
    assert_eq!(config.readiness.deadline_ms, 2_500);
}

#[test]
#[serial]
fn given_non_numeric_deadline_override_when_applied_then_env_override_error() {
    // GIVEN
    clear_overrides();
    unsafe {
        std::env::set_var(ENV_READINESS_DEADLINE_MS, "soon");
    }
    let mut config = DispatchConfig::default();

    // WHEN
    let result = config.apply_env_overrides();
    clear_overrides();

    // THEN
    match result {
        Err(ConfigError::EnvOverride {
            variable, value, ..
        }) => {
            assert_eq!(variable, ENV_READINESS_DEADLINE_MS);
            assert_eq!(value, "soon");
        }
        other => panic!("Expected EnvOverride, got {other:?}"),
    }
}

/// **VALUE**: A misspelt force-native flag is reported instead of read as `false`.
#[test]
#[serial]
fn given_unrecognised_force_native_override_when_applied_then_env_override_error() {
    // GIVEN
    clear_overrides();
    unsafe {
        std::env::set_var(ENV_FORCE_NATIVE, "ture");
    }
    let mut config = DispatchConfig::default();

    // WHEN
    let result = config.apply_env_overrides();
    clear_overrides();

    // THEN
    match result {
        Err(ConfigError::EnvOverride {
            variable, value, ..
        }) => {
            assert_eq!(variable, ENV_FORCE_NATIVE);
            assert_eq!(value, "ture");
        }
        other => panic!("Expected EnvOverride, got {other:?}"),
    }
    assert!(!config.environment.force_native);
}

#[test]
#[serial]
fn given_no_overrides_when_applied_then_config_unchanged() {
    // GIVEN
    clear_overrides();
    let mut config = DispatchConfig::default();

    // WHEN
    config.apply_env_overrides().expect("defaults are valid");

    // THEN
    assert_eq!(config, DispatchConfig::default());
}
