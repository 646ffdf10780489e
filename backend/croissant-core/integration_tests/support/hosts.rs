use croissant_core::error::BridgeError;
use croissant_core::{BridgeHost, NativeBridge};

use common::ErrorLocation;

use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt, ready};
use serde_json::Value;

enum Reply {
    Json(Value),
    Rejected(String),
    Unavailable,
}

/// A bridge that records every command it is asked to run.
pub struct RecordingBridge {
    reply: Reply,
    usable: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl RecordingBridge {
    pub fn replying(json: Value) -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Json(json)))
    }

    pub fn rejecting(message: &str) -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Rejected(message.to_string())))
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self::with_reply(Reply::Unavailable))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            usable: AtomicBool::new(true),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_usable(&self, usable: bool) {
        self.usable.store(usable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl NativeBridge for RecordingBridge {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        _args: Value,
    ) -> BoxFuture<'a, Result<Value, BridgeError>> {
        self.calls.lock().unwrap().push(command.to_string());

        let outcome = match &self.reply {
            Reply::Json(json) => Ok(json.clone()),
            Reply::Rejected(message) => Err(BridgeError::Rejected {
                message: message.clone(),
                location: ErrorLocation::from(Location::caller()),
            }),
            Reply::Unavailable => Err(BridgeError::Unavailable {
                message: String::from("bridge torn down"),
                location: ErrorLocation::from(Location::caller()),
            }),
        };

        ready(outcome).boxed()
    }

    fn is_usable(&self) -> bool {
        self.usable.load(Ordering::SeqCst)
    }
}

/// A host whose bridge shows up on a chosen probe, or on activation, or never.
pub struct ScriptedHost {
    bridge: Arc<dyn NativeBridge>,
    visible_from_probe: Option<usize>,
    activation_succeeds: bool,
    probes: AtomicUsize,
    activations: AtomicUsize,
}

impl ScriptedHost {
    /// No bridge, ever. Activation fails.
    pub fn never(bridge: Arc<dyn NativeBridge>) -> Arc<Self> {
        Arc::new(Self::scripted(bridge, None, false))
    }

    /// The `probe`-th poll (1-based) and every later one sees the bridge.
    pub fn visible_from(bridge: Arc<dyn NativeBridge>, probe: usize) -> Arc<Self> {
        Arc::new(Self::scripted(bridge, Some(probe), false))
    }

    /// Polls never see the bridge, but activation hands it over.
    pub fn activating(bridge: Arc<dyn NativeBridge>) -> Arc<Self> {
        Arc::new(Self::scripted(bridge, None, true))
    }

    fn scripted(
        bridge: Arc<dyn NativeBridge>,
        visible_from_probe: Option<usize>,
        activation_succeeds: bool,
    ) -> Self {
        Self {
            bridge,
            visible_from_probe,
            activation_succeeds,
            probes: AtomicUsize::new(0),
            activations: AtomicUsize::new(0),
        }
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }
}

impl BridgeHost for ScriptedHost {
    fn bridge(&self) -> Option<Arc<dyn NativeBridge>> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        match self.visible_from_probe {
            Some(first) if probe >= first => Some(Arc::clone(&self.bridge)),
            _ => None,
        }
    }

    fn activate(&self) -> BoxFuture<'_, Result<Arc<dyn NativeBridge>, BridgeError>> {
        self.activations.fetch_add(1, Ordering::SeqCst);

        let outcome = if self.activation_succeeds {
            Ok(Arc::clone(&self.bridge))
        } else {
            Err(BridgeError::Unavailable {
                message: String::from("host refused to expose its bridge"),
                location: ErrorLocation::from(Location::caller()),
            })
        };

        ready(outcome).boxed()
    }
}
