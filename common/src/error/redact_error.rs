use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when a secret-bearing value is asked to leave the process implicitly.
#[derive(Debug, ThisError)]
pub enum RedactError {
    /// `secret` names the wrapper type that refused, e.g. `RedactedPassword`.
    #[error("Redaction Error: {secret} refuses serialization, {message} {location}")]
    Serialization {
        secret: &'static str,
        message: String,
        location: ErrorLocation,
    },
}
