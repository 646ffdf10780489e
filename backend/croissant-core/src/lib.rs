pub mod bridge;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod environment;
pub mod error;
pub mod http_invoker;
pub mod readiness;

#[cfg(test)]
mod tests;

pub const API_HOSTNAME: &str = "localhost";
pub const API_PORT: u16 = 3001;
pub const API_BASE: &str = const_format::concatcp!("http://", API_HOSTNAME, ":", API_PORT, "/api");

pub use bridge::{BridgeHost, NativeBridge, NoBridgeHost};
pub use command::{CommandKind, CommandRequest};
pub use config::DispatchConfig;
pub use dispatcher::{Dispatcher, Route};
pub use environment::{Environment, HostSignals, detect};
pub use error::dispatch::DispatchError;
pub use readiness::{ReadinessMonitor, ReadinessState, ReadinessTimings};
