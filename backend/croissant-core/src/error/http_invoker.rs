use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

use thiserror::Error as ThisError;

/// Failures of a single request to the remote API.
#[derive(Debug, ThisError)]
pub enum HttpInvokerError {
    /// Nothing answered at the API address.
    #[error("HTTP Connect Error: {message} {location}")]
    Connect {
        message: String,
        location: ErrorLocation,
    },

    /// The request outlived the configured timeout.
    #[error("HTTP Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
    },

    /// A success response whose body is not the expected JSON.
    #[error("Decode Error: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("URL Parse Error: {message} {location}")]
    UrlParse {
        message: String,
        location: ErrorLocation,
    },

    #[error("Rejected Error: {status} {message} {location}")]
    Rejected {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },
}

impl From<url::ParseError> for HttpInvokerError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        HttpInvokerError::UrlParse {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for HttpInvokerError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        let location = ErrorLocation::from(Location::caller());

        if error.is_timeout() {
            HttpInvokerError::Timeout { message, location }
        } else if error.is_connect() {
            HttpInvokerError::Connect { message, location }
        } else if error.is_decode() {
            HttpInvokerError::Decode { message, location }
        } else {
            HttpInvokerError::Http { message, location }
        }
    }
}

impl From<serde_json::Error> for HttpInvokerError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        HttpInvokerError::Decode {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
