use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures reported by a native bridge or its host.
#[derive(Debug, ThisError)]
pub enum BridgeError {
    /// The bridge handle exists but cannot take calls (torn down, not wired).
    #[error("Bridge Unavailable Error: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    /// The host ran the command and returned an error string.
    #[error("Bridge Rejected Error: {message} {location}")]
    Rejected {
        message: String,
        location: ErrorLocation,
    },

    /// The call never completed (host crash, malformed reply).
    #[error("Bridge Failed Error: {message} {location}")]
    Failed {
        message: String,
        location: ErrorLocation,
    },
}
