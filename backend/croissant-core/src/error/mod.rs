pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod http_invoker;

pub use bridge::BridgeError;
pub use config::ConfigError;
pub use dispatch::DispatchError;
pub use http_invoker::HttpInvokerError;

use common::ErrorLocation;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    HttpInvoker(#[from] HttpInvokerError),

    #[error("Runtime Error: {message} {location}")]
    Runtime {
        message: String,
        location: ErrorLocation,
    },
}
