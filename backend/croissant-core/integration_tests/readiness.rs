use crate::support::hosts::{RecordingBridge, ScriptedHost};

use croissant_core::readiness::READINESS_ADVISORY;
use croissant_core::{ReadinessMonitor, ReadinessState, ReadinessTimings};

use std::time::Duration;

use serde_json::json;
use tokio::runtime::Handle;
use tokio::time::{Instant, sleep};

// ============================================================================
// Readiness monitor timing, on a paused clock
// Default timings: poll every 100ms, activation at 1000ms, deadline at 10000ms
// ============================================================================

fn started_monitor(host: std::sync::Arc<ScriptedHost>) -> ReadinessMonitor {
    let monitor = ReadinessMonitor::new(ReadinessTimings::default());
    assert!(monitor.start(&Handle::current(), host));
    monitor
}

/// **VALUE**: Walks the whole timeline of a bridge that never appears.
///
/// **WHY THIS MATTERS**: Polling, the single activation request and the
/// deadline are the three timers the app depends on at startup. All of them
/// must stop once the deadline fires.
///
/// **BUG THIS CATCHES**: Would catch:
/// - Activation requested early, late, or more than once
/// - The deadline firing early or not at all
/// - Polling or activation continuing after the terminal state
#[tokio::test(start_paused = true)]
async fn given_bridge_never_appears_when_time_passes_then_timers_follow_schedule() {
    // GIVEN: A host that never exposes a bridge
    let host = ScriptedHost::never(RecordingBridge::replying(json!(null)));
    let monitor = started_monitor(host.clone());

    // WHEN/THEN: Still polling at 500ms, no activation yet
    sleep(Duration::from_millis(500)).await;
    assert_eq!(monitor.state(), ReadinessState::Polling);
    assert!(host.probes() >= 5, "probes so far: {}", host.probes());
    assert_eq!(host.activations(), 0);

    // WHEN/THEN: Activation requested once just after 1000ms
    sleep(Duration::from_millis(550)).await;
    assert_eq!(host.activations(), 1);
    assert_eq!(monitor.state(), ReadinessState::Polling);

    // WHEN/THEN: Still polling just before the deadline
    sleep(Duration::from_millis(8_900)).await;
    assert_eq!(monitor.state(), ReadinessState::Polling);
    assert_eq!(monitor.take_advisory(), None);

    // WHEN/THEN: Timed out just after the deadline
    sleep(Duration::from_millis(100)).await;
    assert_eq!(monitor.state(), ReadinessState::FailedTimeout);
    assert_eq!(host.activations(), 1);

    // WHEN/THEN: Nothing runs afterwards
    let probes_at_timeout = host.probes();
    sleep(Duration::from_secs(20)).await;
    assert_eq!(host.probes(), probes_at_timeout);
    assert_eq!(host.activations(), 1);
    assert_eq!(monitor.state(), ReadinessState::FailedTimeout);
    assert!(monitor.bridge().is_none());
}

/// **VALUE**: The first probe that sees the bridge settles the monitor.
///
/// **BUG THIS CATCHES**: Would catch Ready published before the handle is
/// recorded, or polling that keeps going after success.
#[tokio::test(start_paused = true)]
async fn given_bridge_appears_on_third_probe_when_polled_then_ready_with_handle() {
    // GIVEN
    let host = ScriptedHost::visible_from(RecordingBridge::replying(json!(null)), 3);
    let monitor = started_monitor(host.clone());

    // WHEN
    let state = monitor.wait_settled().await;

    // THEN
    assert_eq!(state, ReadinessState::Ready);
    assert_eq!(host.probes(), 3);
    assert_eq!(host.activations(), 0);
    assert!(monitor.bridge().is_some());

    sleep(Duration::from_secs(1)).await;
    assert_eq!(host.probes(), 3, "polling must stop once ready");
    assert_eq!(monitor.take_advisory(), None);
}

/// **VALUE**: A successful activation is as good as a probe hit.
#[tokio::test(start_paused = true)]
async fn given_activation_succeeds_when_activation_time_reached_then_ready() {
    // GIVEN: Probes never see the bridge but activation hands it over
    let host = ScriptedHost::activating(RecordingBridge::replying(json!(null)));
    let started = Instant::now();
    let monitor = started_monitor(host.clone());

    // WHEN
    let state = monitor.wait_settled().await;

    // THEN
    assert_eq!(state, ReadinessState::Ready);
    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert!(started.elapsed() < Duration::from_millis(1100));
    assert_eq!(host.activations(), 1);
    assert!(monitor.bridge().is_some());

    // THEN: The deadline never fires after Ready
    sleep(Duration::from_secs(10)).await;
    assert_eq!(monitor.state(), ReadinessState::Ready);
    assert_eq!(monitor.take_advisory(), None);
}

/// **VALUE**: Activation and deadline count from `start()`, not from when the
/// runtime first gets round to the monitor's task.
///
/// **WHY THIS MATTERS**: At startup the runtime is busy; a schedule that begins
/// at the task's first poll drifts by however long that takes.
///
/// **BUG THIS CATCHES**: Would catch timers created lazily inside the task,
/// which would leave activation pending 1.5s after polling began.
#[tokio::test]
async fn given_runtime_blocked_after_start_when_it_resumes_then_overdue_activation_fires() {
    // GIVEN: A current-thread runtime that cannot run the task for 1500ms
    let host = ScriptedHost::never(RecordingBridge::replying(json!(null)));
    let monitor = started_monitor(host.clone());
    std::thread::sleep(Duration::from_millis(1500));

    // WHEN
    sleep(Duration::from_millis(50)).await;

    // THEN
    assert_eq!(host.activations(), 1);
    assert_eq!(monitor.state(), ReadinessState::Polling);
}

/// **VALUE**: The timeout advisory is handed out once.
///
/// **BUG THIS CATCHES**: Would catch the user seeing the notice on every render.
#[tokio::test(start_paused = true)]
async fn given_timed_out_monitor_when_advisory_taken_twice_then_second_is_none() {
    // GIVEN
    let host = ScriptedHost::never(RecordingBridge::replying(json!(null)));
    let monitor = started_monitor(host);
    assert_eq!(monitor.wait_settled().await, ReadinessState::FailedTimeout);

    // WHEN
    let first = monitor.take_advisory();
    let second = monitor.take_advisory();

    // THEN
    assert_eq!(first.as_deref(), Some(READINESS_ADVISORY));
    assert_eq!(second, None);
}

/// **VALUE**: A bridge that would only appear after the deadline is never adopted.
///
/// **BUG THIS CATCHES**: Would catch FailedTimeout being treated as a retryable state.
#[tokio::test(start_paused = true)]
async fn given_bridge_appears_after_deadline_when_time_passes_then_stays_timed_out() {
    // GIVEN: The bridge would be visible from probe 150, around 15s in
    let host = ScriptedHost::visible_from(RecordingBridge::replying(json!(null)), 150);
    let monitor = started_monitor(host.clone());

    // WHEN
    sleep(Duration::from_secs(30)).await;

    // THEN
    assert_eq!(monitor.state(), ReadinessState::FailedTimeout);
    assert!(host.probes() < 150);
    assert!(monitor.bridge().is_none());
}

#[tokio::test(start_paused = true)]
async fn given_started_monitor_when_started_again_then_refused() {
    // GIVEN
    let host = ScriptedHost::never(RecordingBridge::replying(json!(null)));
    let monitor = started_monitor(host.clone());

    // WHEN
    let restarted = monitor.start(&Handle::current(), host);

    // THEN
    assert!(!restarted);
    assert_eq!(monitor.state(), ReadinessState::Polling);
}

#[tokio::test(start_paused = true)]
async fn given_new_monitor_when_not_started_then_init_without_bridge() {
    let monitor = ReadinessMonitor::new(ReadinessTimings::default());

    assert_eq!(monitor.state(), ReadinessState::Init);
    assert!(monitor.bridge().is_none());
    assert_eq!(monitor.take_advisory(), None);
}

/// **VALUE**: Subscribers observe each published state in order.
#[tokio::test(start_paused = true)]
async fn given_subscriber_when_bridge_found_then_sees_ready() {
    // GIVEN
    let host = ScriptedHost::visible_from(RecordingBridge::replying(json!(null)), 2);
    let monitor = ReadinessMonitor::new(ReadinessTimings::default());
    let mut receiver = monitor.subscribe();
    assert_eq!(*receiver.borrow(), ReadinessState::Init);

    // WHEN
    monitor.start(&Handle::current(), host);

    // THEN
    let state = *receiver
        .wait_for(|state| *state == ReadinessState::Ready)
        .await
        .expect("monitor alive");
    assert_eq!(state, ReadinessState::Ready);
}

/// **VALUE**: Dropping the monitor stops its timers.
///
/// **BUG THIS CATCHES**: Would catch a detached task that keeps probing the host
/// for the life of the process.
#[tokio::test(start_paused = true)]
async fn given_polling_monitor_when_dropped_then_probes_stop() {
    // GIVEN
    let host = ScriptedHost::never(RecordingBridge::replying(json!(null)));
    let monitor = started_monitor(host.clone());
    sleep(Duration::from_millis(300)).await;

    // WHEN
    drop(monitor);
    sleep(Duration::from_millis(10)).await;
    let probes_at_drop = host.probes();
    sleep(Duration::from_secs(5)).await;

    // THEN
    assert_eq!(host.probes(), probes_at_drop);
    assert_eq!(host.activations(), 0);
}
