// Unit tests for readiness state rules

use crate::readiness::{
    DEFAULT_ACTIVATION_AFTER, DEFAULT_DEADLINE, DEFAULT_POLL_INTERVAL, ReadinessState,
    ReadinessTimings,
};

use crate::readiness::ReadinessState::{FailedTimeout, Init, Polling, Ready};

use std::time::Duration;

const STATES: [ReadinessState; 4] = [Init, Polling, Ready, FailedTimeout];

/// **VALUE**: Only the three forward edges of the state machine are legal.
///
/// **BUG THIS CATCHES**: Would catch a terminal state being left again, or
/// `Init` jumping straight to a terminal state without polling.
#[test]
fn given_every_state_pair_when_checked_then_only_forward_edges_allowed() {
    let allowed = [(Init, Polling), (Polling, Ready), (Polling, FailedTimeout)];

    for from in STATES {
        for to in STATES {
            assert_eq!(
                from.can_become(to),
                allowed.contains(&(from, to)),
                "{from:?} -> {to:?}"
            );
        }
    }
}

#[test]
fn given_states_when_terminal_checked_then_only_ready_and_timeout() {
    assert!(!Init.is_terminal());
    assert!(!Polling.is_terminal());
    assert!(Ready.is_terminal());
    assert!(FailedTimeout.is_terminal());
}

#[test]
fn given_default_timings_then_poll_activation_deadline_schedule() {
    let timings = ReadinessTimings::default();

    assert_eq!(timings.poll_interval, Duration::from_millis(100));
    assert_eq!(timings.activation_after, Duration::from_secs(1));
    assert_eq!(timings.deadline, Duration::from_secs(10));
    assert_eq!(
        (DEFAULT_POLL_INTERVAL, DEFAULT_ACTIVATION_AFTER, DEFAULT_DEADLINE),
        (timings.poll_interval, timings.activation_after, timings.deadline)
    );
}
