//! Native bridge readiness tracking.
//!
//! A single background task owns the poll interval, the activation timer and
//! the deadline. The task returns as soon as a terminal state is published,
//! which drops all three timers together.
//!
//! # States
//!
//! ```text
//! Init ──start──▶ Polling ──bridge seen / activated──▶ Ready
//!                    │
//!                    └──────────deadline──────────────▶ FailedTimeout
//! ```
//!
//! Only the task writes the state. Everyone else reads it by value through the
//! monitor or a [`watch::Receiver`].

use crate::bridge::{BridgeHost, NativeBridge};
use crate::error::bridge::BridgeError;

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use futures_util::future::{BoxFuture, OptionFuture};
use log::{debug, info, trace, warn};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_ACTIVATION_AFTER: Duration = Duration::from_millis(1000);
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(10_000);

/// Shown to the user once when the monitor gives up on the bridge.
pub const READINESS_ADVISORY: &str = "Native bridge failed to initialize; running in browser mode.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadinessState {
    Init,
    Polling,
    Ready,
    FailedTimeout,
}

impl ReadinessState {
    pub fn is_terminal(self) -> bool {
        matches!(self, ReadinessState::Ready | ReadinessState::FailedTimeout)
    }

    pub(crate) fn can_become(self, next: ReadinessState) -> bool {
        matches!(
            (self, next),
            (ReadinessState::Init, ReadinessState::Polling)
                | (
                    ReadinessState::Polling,
                    ReadinessState::Ready | ReadinessState::FailedTimeout
                )
        )
    }
}

/// Offsets measured from the moment polling starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessTimings {
    pub poll_interval: Duration,
    pub activation_after: Duration,
    pub deadline: Duration,
}

impl Default for ReadinessTimings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            activation_after: DEFAULT_ACTIVATION_AFTER,
            deadline: DEFAULT_DEADLINE,
        }
    }
}

struct Shared {
    state: watch::Sender<ReadinessState>,
    bridge: OnceLock<Arc<dyn NativeBridge>>,
    advisory: Mutex<Option<String>>,
}

impl Shared {
    /// Applies `next` only if it is a legal step from the current state.
    fn transition(&self, next: ReadinessState) -> bool {
        self.state.send_if_modified(|current| {
            if current.can_become(next) {
                *current = next;
                true
            } else {
                false
            }
        })
    }

    fn settle_ready(&self, bridge: Arc<dyn NativeBridge>) -> bool {
        if self.state.borrow().is_terminal() {
            return false;
        }
        // Readers that observe Ready must find the handle.
        if self.bridge.set(bridge).is_err() {
            warn!("Bridge handle was already recorded");
        }
        self.transition(ReadinessState::Ready)
    }

    fn settle_timeout(&self) -> bool {
        if !self.transition(ReadinessState::FailedTimeout) {
            return false;
        }
        if let Ok(mut advisory) = self.advisory.lock() {
            *advisory = Some(String::from(READINESS_ADVISORY));
        }
        true
    }
}

/// Waits for the native bridge, once per process.
pub struct ReadinessMonitor {
    shared: Arc<Shared>,
    timings: ReadinessTimings,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReadinessMonitor {
    pub fn new(timings: ReadinessTimings) -> Self {
        let (state, _) = watch::channel(ReadinessState::Init);
        Self {
            shared: Arc::new(Shared {
                state,
                bridge: OnceLock::new(),
                advisory: Mutex::new(None),
            }),
            timings,
            task: Mutex::new(None),
        }
    }

    /// Move to `Polling` and spawn the timer task on `runtime`.
    ///
    /// Returns `false` if the monitor has already left `Init`.
    pub fn start(&self, runtime: &Handle, host: Arc<dyn BridgeHost>) -> bool {
        if !self.shared.transition(ReadinessState::Polling) {
            debug!("Readiness monitor already started");
            return false;
        }

        info!(
            "Polling for native bridge every {:?} (activation at {:?}, deadline {:?})",
            self.timings.poll_interval, self.timings.activation_after, self.timings.deadline
        );

        // The schedule counts from here, not from the task's first poll.
        let started = Instant::now();
        let task = runtime.spawn(run(Arc::clone(&self.shared), host, self.timings, started));
        if let Ok(mut slot) = self.task.lock() {
            *slot = Some(task);
        }
        true
    }

    pub fn state(&self) -> ReadinessState {
        *self.shared.state.borrow()
    }

    pub fn timings(&self) -> ReadinessTimings {
        self.timings
    }

    /// The recorded bridge, available once the state is `Ready`.
    pub fn bridge(&self) -> Option<Arc<dyn NativeBridge>> {
        if self.state() == ReadinessState::Ready {
            self.shared.bridge.get().cloned()
        } else {
            None
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ReadinessState> {
        self.shared.state.subscribe()
    }

    /// Resolve once a terminal state is reached.
    ///
    /// Never resolves for a monitor that was not started.
    pub async fn wait_settled(&self) -> ReadinessState {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| state.is_terminal()).await {
            Ok(state) => *state,
            Err(_) => self.state(),
        }
    }

    /// The timeout advisory, handed out exactly once.
    pub fn take_advisory(&self) -> Option<String> {
        self.shared
            .advisory
            .lock()
            .ok()
            .and_then(|mut advisory| advisory.take())
    }
}

impl Drop for ReadinessMonitor {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.task.lock()
            && let Some(task) = slot.take()
        {
            task.abort();
        }
    }
}

type Activation<'a> = BoxFuture<'a, Result<Arc<dyn NativeBridge>, BridgeError>>;

async fn run(
    shared: Arc<Shared>,
    host: Arc<dyn BridgeHost>,
    timings: ReadinessTimings,
    started: Instant,
) {
    let mut poll = interval_at(started, timings.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let activation_timer = sleep_until(started + timings.activation_after);
    let deadline = sleep_until(started + timings.deadline);
    tokio::pin!(activation_timer, deadline);

    let mut activation_armed = true;
    let mut activation_pending = false;
    let mut activation: OptionFuture<Activation<'_>> = None.into();

    loop {
        tokio::select! {
            biased;

            _ = &mut deadline => {
                if shared.settle_timeout() {
                    warn!(
                        "Native bridge not ready after {:?}, downgrading to browser mode",
                        started.elapsed()
                    );
                }
                return;
            }

            Some(outcome) = &mut activation, if activation_pending => {
                activation_pending = false;
                match outcome {
                    Ok(bridge) => {
                        if shared.settle_ready(bridge) {
                            info!("Native bridge activated after {:?}", started.elapsed());
                        }
                        return;
                    }
                    Err(e) => warn!("Native bridge activation failed: {e}"),
                }
            }

            _ = &mut activation_timer, if activation_armed => {
                activation_armed = false;
                info!(
                    "Native bridge not observed after {:?}, requesting activation",
                    started.elapsed()
                );
                activation = Some(host.activate()).into();
                activation_pending = true;
            }

            _ = poll.tick() => {
                if let Some(bridge) = host.bridge() {
                    if shared.settle_ready(bridge) {
                        info!("Native bridge ready after {:?}", started.elapsed());
                    }
                    return;
                }
                trace!("Native bridge not yet available");
            }
        }
    }
}
