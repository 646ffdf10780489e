//! Login passwords that stay out of logs.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// A plaintext password on its way to the credential check.
///
/// `Debug` and `Display` never print the value, and serde refuses to
/// serialize it. Request builders call [`RedactedPassword::expose`] at the one
/// place the value is written into a body.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedPassword {
    inner: String,
}

impl RedactedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            inner: password.into(),
        }
    }

    /// The actual password, for placing into an outgoing request only.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for RedactedPassword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedPassword([REDACTED])")
    }
}

impl fmt::Display for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED PASSWORD]")
    }
}

impl Drop for RedactedPassword {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for RedactedPassword {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            secret: "RedactedPassword",
            message: String::from("call expose() where the value belongs in a request body"),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
