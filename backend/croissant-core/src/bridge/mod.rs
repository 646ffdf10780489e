//! Contract with the hosting shell's in-process command executor.
//!
//! The shell owns the bridge; this crate only calls it. [`BridgeHost`] is the
//! live view the readiness monitor polls until a bridge shows up.

use crate::error::bridge::BridgeError;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, ready};
use serde_json::Value;

/// An invocable native bridge.
///
/// Results for a command must have the same JSON shape the HTTP API returns
/// for it.
pub trait NativeBridge: Send + Sync {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Value,
    ) -> BoxFuture<'a, Result<Value, BridgeError>>;

    /// Whether the bridge can still take calls.
    fn is_usable(&self) -> bool {
        true
    }
}

/// The shell as seen from the readiness monitor.
pub trait BridgeHost: Send + Sync {
    /// Probe for a bridge handle. Called on every poll tick.
    fn bridge(&self) -> Option<Arc<dyn NativeBridge>>;

    /// Ask the shell to expose its bridge. Called at most once per monitor run.
    fn activate(&self) -> BoxFuture<'_, Result<Arc<dyn NativeBridge>, BridgeError>>;
}

/// A host with no native shell at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBridgeHost;

impl BridgeHost for NoBridgeHost {
    fn bridge(&self) -> Option<Arc<dyn NativeBridge>> {
        None
    }

    fn activate(&self) -> BoxFuture<'_, Result<Arc<dyn NativeBridge>, BridgeError>> {
        ready(Err(BridgeError::Unavailable {
            message: String::from("No native shell is hosting this process"),
            location: ErrorLocation::from(Location::caller()),
        }))
        .boxed()
    }
}
