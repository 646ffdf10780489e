//! The single entry point for issuing commands.
//!
//! # Routing
//!
//! Decided per call from the resolved environment and the readiness state:
//!
//! | Environment | Readiness          | Route                      |
//! |-------------|--------------------|----------------------------|
//! | Native      | Init, Polling      | `NotReady`, nothing is sent |
//! | Native      | Ready              | native bridge (HTTP if unusable) |
//! | Native      | FailedTimeout      | HTTP                       |
//! | Browser     | (no monitor)       | HTTP                       |
//!
//! A dispatch never waits on the monitor. Callers that want to wait use
//! [`Dispatcher::wait_until_settled`] or [`Dispatcher::invoke_with_retry`].

mod retry;

use crate::bridge::{BridgeHost, NativeBridge};
use crate::command::{CommandKind, CommandRequest, HealthStatus};
use crate::config::DispatchConfig;
use crate::environment::{Environment, HostSignals, detect};
use crate::error::CoreError;
use crate::error::bridge::BridgeError;
use crate::error::dispatch::DispatchError;
use crate::http_invoker::HttpInvoker;
use crate::readiness::{ReadinessMonitor, ReadinessState};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;

use log::{debug, error, info, warn};
use serde_json::Value;
use tokio::runtime::Handle;
use uuid::Uuid;

/// Which transport serves a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Native,
    Http,
}

pub struct Dispatcher {
    detected: Environment,
    monitor: Option<ReadinessMonitor>,
    http: HttpInvoker,
}

impl Dispatcher {
    /// Resolve the environment and, for native hosts, start waiting for the bridge.
    ///
    /// Must be called from within a Tokio runtime when the host may be native.
    pub fn new(
        config: &DispatchConfig,
        signals: &HostSignals,
        host: Arc<dyn BridgeHost>,
    ) -> Result<Self, CoreError> {
        let detected = if config.environment.force_native {
            info!("Native mode forced by configuration");
            Environment::Native
        } else {
            detect(signals)
        };

        let http = HttpInvoker::new(&config.api.base_url, config.api.request_timeout())?;

        let monitor = match detected {
            Environment::Native => {
                let runtime = Handle::try_current().map_err(|e| CoreError::Runtime {
                    message: format!("Readiness monitor needs a Tokio runtime: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                })?;
                let monitor = ReadinessMonitor::new(config.readiness.timings());
                monitor.start(&runtime, host);
                Some(monitor)
            }
            Environment::Browser | Environment::Unknown => None,
        };

        info!(
            "Dispatcher ready: environment={:?}, api={}",
            detected,
            http.base_url()
        );

        Ok(Self {
            detected,
            monitor,
            http,
        })
    }

    /// Classification made at startup, before any readiness outcome.
    pub fn detected_environment(&self) -> Environment {
        self.detected
    }

    /// The environment commands are served under right now.
    ///
    /// A native host whose bridge never became ready is treated as a browser.
    pub fn environment(&self) -> Environment {
        match self.readiness() {
            Some(ReadinessState::FailedTimeout) => Environment::Browser,
            _ => self.detected,
        }
    }

    /// `None` when the host was never considered native.
    pub fn readiness(&self) -> Option<ReadinessState> {
        self.monitor.as_ref().map(ReadinessMonitor::state)
    }

    /// The route a call issued now would take.
    #[track_caller]
    pub fn route(&self) -> Result<Route, DispatchError> {
        let Some(monitor) = &self.monitor else {
            return Ok(Route::Http);
        };

        match monitor.state() {
            ReadinessState::Init | ReadinessState::Polling => Err(DispatchError::NotReady {
                message: String::from("Native bridge is not ready yet, retry shortly"),
                location: ErrorLocation::from(Location::caller()),
            }),
            ReadinessState::Ready => Ok(Route::Native),
            ReadinessState::FailedTimeout => Ok(Route::Http),
        }
    }

    /// Run a typed command.
    pub async fn invoke<C: CommandRequest>(&self, request: &C) -> Result<C::Response, DispatchError> {
        let json = self.invoke_raw(C::KIND, request.to_args()).await?;

        serde_json::from_value(json).map_err(|e| {
            error!("Malformed {} result: {e}", C::KIND);
            DispatchError::Transport {
                message: format!("Malformed {} result: {e}", C::KIND),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Run a command by kind with untyped arguments. The result is returned as received.
    pub async fn invoke_raw(&self, kind: CommandKind, args: Value) -> Result<Value, DispatchError> {
        let call_id = Uuid::new_v4();

        let route = self.route().inspect_err(|e| {
            debug!("[{call_id}] {kind} refused: {e}");
        })?;

        let outcome = match route {
            Route::Native => self.invoke_native(call_id, kind, args).await,
            Route::Http => self.invoke_http(call_id, kind, &args).await,
        };

        match &outcome {
            Ok(_) => debug!("[{call_id}] {kind} succeeded"),
            Err(e) => error!("[{call_id}] {kind} failed: {e}"),
        }

        outcome
    }

    /// `GET /health` on the remote API, whatever the environment.
    pub async fn health(&self) -> Result<HealthStatus, DispatchError> {
        Ok(self.http.health().await?)
    }

    /// Resolve once routing no longer depends on readiness, returning the
    /// environment that will serve commands.
    pub async fn wait_until_settled(&self) -> Environment {
        if let Some(monitor) = &self.monitor {
            monitor.wait_settled().await;
        }
        self.environment()
    }

    /// The user-facing notice about the browser fallback. Returned once.
    pub fn take_advisory(&self) -> Option<String> {
        self.monitor.as_ref().and_then(ReadinessMonitor::take_advisory)
    }

    async fn invoke_native(
        &self,
        call_id: Uuid,
        kind: CommandKind,
        args: Value,
    ) -> Result<Value, DispatchError> {
        let Some(bridge) = self.usable_bridge() else {
            warn!("[{call_id}] Native bridge unusable despite readiness, using HTTP for {kind}");
            return self.invoke_http(call_id, kind, &args).await;
        };

        debug!("[{call_id}] Native invoke: {kind}");

        match bridge.invoke(kind.name(), args.clone()).await {
            Ok(json) => Ok(json),
            Err(BridgeError::Unavailable { message, .. }) => {
                warn!("[{call_id}] Native bridge unavailable ({message}), using HTTP for {kind}");
                self.invoke_http(call_id, kind, &args).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn invoke_http(
        &self,
        call_id: Uuid,
        kind: CommandKind,
        args: &Value,
    ) -> Result<Value, DispatchError> {
        debug!("[{call_id}] HTTP invoke: {kind}");
        Ok(self.http.invoke(kind, args).await?)
    }

    fn usable_bridge(&self) -> Option<Arc<dyn NativeBridge>> {
        self.monitor
            .as_ref()
            .and_then(ReadinessMonitor::bridge)
            .filter(|bridge| bridge.is_usable())
    }
}
