use crate::error::bridge::BridgeError;
use crate::error::http_invoker::HttpInvokerError;

use common::{ErrorLocation, HttpStatusCode};

use thiserror::Error as ThisError;

/// The only error type that leaves the dispatcher.
///
/// Transport faults from either path are folded into these variants, so
/// callers never see `reqwest`, `serde_json` or host errors directly.
#[derive(Debug, ThisError)]
pub enum DispatchError {
    /// Native readiness is still unresolved. Retry later or wait for settlement.
    #[error("Not Ready Error: {message} {location}")]
    NotReady {
        message: String,
        location: ErrorLocation,
    },

    /// Host signals disagreed. Logged by detection, never returned from a dispatch.
    #[error("Detection Ambiguous Error: {message} {location}")]
    DetectionAmbiguous {
        message: String,
        location: ErrorLocation,
    },

    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    /// The serving side answered with a failure. `message` is passed through verbatim.
    #[error("Remote Rejected Error: {message} {location}")]
    RemoteRejected {
        status: Option<HttpStatusCode>,
        message: String,
        location: ErrorLocation,
    },
}

impl DispatchError {
    pub fn is_not_ready(&self) -> bool {
        matches!(self, DispatchError::NotReady { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            DispatchError::NotReady { message, .. }
            | DispatchError::DetectionAmbiguous { message, .. }
            | DispatchError::Transport { message, .. }
            | DispatchError::RemoteRejected { message, .. } => message,
        }
    }
}

impl From<HttpInvokerError> for DispatchError {
    fn from(error: HttpInvokerError) -> Self {
        match error {
            HttpInvokerError::Connect { message, location }
            | HttpInvokerError::Timeout { message, location }
            | HttpInvokerError::Http { message, location }
            | HttpInvokerError::Decode { message, location }
            | HttpInvokerError::UrlParse { message, location } => {
                DispatchError::Transport { message, location }
            }
            HttpInvokerError::Rejected {
                status,
                message,
                location,
            } => DispatchError::RemoteRejected {
                status: Some(status),
                message,
                location,
            },
        }
    }
}

impl From<BridgeError> for DispatchError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Rejected { message, location } => DispatchError::RemoteRejected {
                status: None,
                message,
                location,
            },
            BridgeError::Unavailable { message, location }
            | BridgeError::Failed { message, location } => {
                DispatchError::Transport { message, location }
            }
        }
    }
}
