use crate::command::CommandRequest;
use crate::dispatcher::Dispatcher;
use crate::error::dispatch::DispatchError;
use crate::readiness::ReadinessTimings;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::trace;
use tokio::time::sleep as TokioSleep;

impl Dispatcher {
    /// Like [`Dispatcher::invoke`], but retries while the bridge is not ready.
    ///
    /// Only `NotReady` is retried, with exponential backoff bounded by the
    /// readiness deadline plus one poll interval. By then the monitor has
    /// settled and routing no longer refuses calls.
    pub async fn invoke_with_retry<C: CommandRequest>(
        &self,
        request: &C,
    ) -> Result<C::Response, DispatchError> {
        let timings = self
            .monitor
            .as_ref()
            .map(|monitor| monitor.timings())
            .unwrap_or_default();
        let mut backoff = not_ready_backoff(timings);

        loop {
            match self.invoke(request).await {
                Err(e) if e.is_not_ready() => match backoff.next_backoff() {
                    Some(duration) => {
                        trace!("{} not ready, retrying after {duration:?}", C::KIND);
                        TokioSleep(duration).await;
                    }
                    None => return Err(e),
                },
                outcome => return outcome,
            }
        }
    }
}

fn not_ready_backoff(timings: ReadinessTimings) -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: timings.poll_interval,
        max_interval: timings.activation_after,
        max_elapsed_time: Some(timings.deadline + timings.poll_interval),
        ..Default::default()
    }
}
