//! Shared building blocks for the Croissant crates.
//!
//! Everything here is a leaf: no crate in the workspace is depended upon by
//! `common`, and nothing in `common` performs I/O.
//!
//! ## Contents
//!
//! - [`ErrorLocation`]: call-site capture embedded in every error variant
//! - [`HttpStatusCode`]: status code carried by rejected remote calls
//! - [`RedactedPassword`]: a credential that never shows up in logs

pub mod error;
pub mod http_status;
pub mod redacted_password;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_password::RedactedPassword;

#[cfg(test)]
mod tests;
