use croissant_core::DispatchError;
use croissant_core::error::{ConfigError, CoreError};

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the console host.
///
/// Core errors are flattened to their message so the whole enum stays
/// serializable for hosts that report over IPC.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum AppError {
    /// Error from this App
    #[error("Croissant Error: {message} {location}")]
    App {
        message: String,
        location: ErrorLocation,
    },

    /// Bad command line
    #[error("Usage Error: {message} {location}")]
    Usage {
        message: String,
        location: ErrorLocation,
    },

    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// A dispatch failed. `not_ready` tells the caller a retry may succeed.
    #[error("Dispatch Error: {message} {location}")]
    Dispatch {
        message: String,
        not_ready: bool,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for AppError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        AppError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DispatchError> for AppError {
    #[track_caller]
    fn from(error: DispatchError) -> Self {
        AppError::Dispatch {
            not_ready: error.is_not_ready(),
            message: error.message().to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CoreError> for AppError {
    #[track_caller]
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Dispatch(error) => error.into(),
            CoreError::Config(error) => error.into(),
            other => AppError::App {
                message: other.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
        }
    }
}
