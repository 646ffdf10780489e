use crate::API_BASE;
use crate::error::config::ConfigError;
use crate::readiness::{
    DEFAULT_ACTIVATION_AFTER, DEFAULT_DEADLINE, DEFAULT_POLL_INTERVAL, ReadinessTimings,
};

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "croissant.toml";
const CONFIG_DIR_NAME: &str = "croissant";
const CONFIG_VERSION: u32 = 1;

pub const ENV_API_BASE: &str = "CROISSANT_API_BASE";
pub const ENV_FORCE_NATIVE: &str = "CROISSANT_FORCE_NATIVE";
pub const ENV_READINESS_DEADLINE_MS: &str = "CROISSANT_READINESS_DEADLINE_MS";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_activation_after_ms")]
    pub activation_after_ms: u64,
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            activation_after_ms: default_activation_after_ms(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

impl ReadinessConfig {
    pub fn timings(&self) -> ReadinessTimings {
        ReadinessTimings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            activation_after: Duration::from_millis(self.activation_after_ms),
            deadline: Duration::from_millis(self.deadline_ms),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    /// Treat the host as native even when no signal says so.
    #[serde(default)]
    pub force_native: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub readiness: ReadinessConfig,

    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: ApiConfig::default(),
            readiness: ReadinessConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    API_BASE.to_string()
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}
fn default_activation_after_ms() -> u64 {
    DEFAULT_ACTIVATION_AFTER.as_millis() as u64
}
fn default_deadline_ms() -> u64 {
    DEFAULT_DEADLINE.as_millis() as u64
}

// ============================================
// IMPLEMENTATION
// ============================================

impl DispatchConfig {
    /// `{platform config dir}/croissant`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Read `croissant.toml` from `config_dir`.
    ///
    /// No file means defaults. A file that is there must read, parse and validate.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            info!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: DispatchConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Rejecting {}: {e}", path.display());
            ConfigError::ParseError {
                path: path.clone(),
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;
        config.validate()?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Write `croissant.toml` into `config_dir`. Readers never see a half-written file.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        let write_error = |path: &Path, source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
            location: ErrorLocation::from(Location::caller()),
        };

        std::fs::create_dir_all(config_dir).map_err(|e| write_error(config_dir, e))?;

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let path = config_dir.join(CONFIG_FILE_NAME);
        let staging = config_dir.join(format!("{CONFIG_FILE_NAME}.tmp"));
        std::fs::write(&staging, contents).map_err(|e| write_error(&staging, e))?;
        std::fs::rename(&staging, &path).map_err(|e| write_error(&path, e))?;

        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Layer `CROISSANT_*` variables over the loaded values, then re-validate.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(base_url) = std::env::var(ENV_API_BASE) {
            info!("{ENV_API_BASE} overrides api.base_url");
            self.api.base_url = base_url;
        }

        if let Ok(flag) = std::env::var(ENV_FORCE_NATIVE) {
            self.environment.force_native =
                parse_flag(&flag).ok_or_else(|| ConfigError::EnvOverride {
                    variable: ENV_FORCE_NATIVE,
                    value: flag.clone(),
                    message: String::from("expected one of 1/0, true/false, yes/no, on/off"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            info!(
                "{ENV_FORCE_NATIVE} sets environment.force_native = {}",
                self.environment.force_native
            );
        }

        if let Ok(deadline) = std::env::var(ENV_READINESS_DEADLINE_MS) {
            let deadline_ms = deadline.trim().parse::<u64>().map_err(|e| ConfigError::EnvOverride {
                variable: ENV_READINESS_DEADLINE_MS,
                value: deadline.clone(),
                message: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;
            self.readiness.deadline_ms = deadline_ms;
            info!("{ENV_READINESS_DEADLINE_MS} overrides readiness.deadline_ms");
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=CONFIG_VERSION).contains(&self.version) {
            return Err(invalid(
                "version",
                format!("{} is not in 1..={CONFIG_VERSION}", self.version),
            ));
        }

        let base_url = &self.api.base_url;
        if base_url.is_empty() {
            return Err(invalid("api.base_url", String::from("must not be empty")));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(invalid(
                "api.base_url",
                format!("{base_url} is not an http(s) URL"),
            ));
        }

        if self.api.request_timeout_secs == 0 {
            return Err(invalid(
                "api.request_timeout_secs",
                String::from("must be positive"),
            ));
        }

        let ReadinessConfig {
            poll_interval_ms,
            activation_after_ms,
            deadline_ms,
        } = self.readiness;
        if poll_interval_ms == 0 || poll_interval_ms > activation_after_ms {
            return Err(invalid(
                "readiness.poll_interval_ms",
                format!("{poll_interval_ms} must be in 1..={activation_after_ms}"),
            ));
        }
        if activation_after_ms >= deadline_ms {
            return Err(invalid(
                "readiness.deadline_ms",
                format!("{deadline_ms} must exceed activation_after_ms ({activation_after_ms})"),
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field,
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// `None` for anything that is not a recognised boolean spelling.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
