use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

/// Failures loading, checking or persisting `croissant.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Config Parse Error: {path}: {message} {location}")]
    ParseError {
        path: PathBuf,
        message: String,
        location: ErrorLocation,
    },

    #[error("Config Write Error: {path}: {source} {location}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },

    /// The platform reports no per-user config directory.
    #[error("Config Directory Not Found Error: {location}")]
    DirectoryNotFound { location: ErrorLocation },

    #[error("Config Serialization Error: {message} {location}")]
    SerializeError {
        message: String,
        location: ErrorLocation,
    },

    /// `field` is the dotted TOML key that failed, e.g. `readiness.deadline_ms`.
    #[error("Config Validation Error: {field}: {message} {location}")]
    ValidationError {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    /// A `CROISSANT_*` variable held a value that could not be applied.
    #[error("Config Env Override Error: {variable}={value}: {message} {location}")]
    EnvOverride {
        variable: &'static str,
        value: String,
        message: String,
        location: ErrorLocation,
    },
}
