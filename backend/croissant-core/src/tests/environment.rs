// Unit tests for environment detection

use crate::environment::{Environment, HostSignals, assess, detect};

/// **VALUE**: A host with nothing but network fetch is a browser.
#[test]
fn given_plain_host_when_detected_then_browser() {
    let signals = HostSignals::default();

    assert_eq!(detect(&signals), Environment::Browser);
    assert!(!assess(&signals).ambiguous);
}

/// **VALUE**: Each strong signal on its own is enough for native.
///
/// **BUG THIS CATCHES**: Would catch a signal that is collected but never counted.
#[test]
fn given_single_native_signal_when_detected_then_native() {
    let cases = [
        HostSignals::default().with_bridge_handle(),
        HostSignals::default().with_metadata_handle(),
        HostSignals::default().with_marker_flag(),
        HostSignals::default().with_user_agent("Mozilla/5.0 Tauri/2.0"),
        HostSignals::default().with_webview_marker(),
        HostSignals::default().without_fetch(),
    ];

    for signals in cases {
        assert_eq!(detect(&signals), Environment::Native, "{signals:?}");
    }
}

#[test]
fn given_user_agent_without_marker_when_detected_then_browser() {
    let signals = HostSignals::default().with_user_agent("Mozilla/5.0 Chrome/120.0");

    assert_eq!(detect(&signals), Environment::Browser);
}

/// **VALUE**: A live bridge handle is never outvoted by vendor markers.
///
/// **WHY THIS MATTERS**: Native webviews are often Chromium or WebKit and carry
/// those vendor markers too.
#[test]
fn given_bridge_handle_and_vendor_markers_when_detected_then_native_without_ambiguity() {
    let signals = HostSignals::default()
        .with_bridge_handle()
        .with_chrome_marker()
        .with_safari_marker();

    let detection = assess(&signals);

    assert_eq!(detection.environment, Environment::Native);
    assert!(!detection.ambiguous);
}

/// **VALUE**: Conflicting weak signals are decided by majority, ties to native.
///
/// **BUG THIS CATCHES**: Would catch a conflict resolved differently on each run,
/// or a tie silently going to the browser.
#[test]
fn given_conflicting_signals_when_assessed_then_majority_wins_and_ties_go_native() {
    // Tie: one each
    let tie = HostSignals::default().with_webview_marker().with_chrome_marker();
    let detection = assess(&tie);
    assert_eq!(detection.environment, Environment::Native);
    assert!(detection.ambiguous);

    // Browser majority
    let browser = HostSignals::default()
        .with_marker_flag()
        .with_chrome_marker()
        .with_safari_marker();
    let detection = assess(&browser);
    assert_eq!(detection.environment, Environment::Browser);
    assert_eq!((detection.native_votes, detection.browser_votes), (1, 2));
    assert!(detection.ambiguous);
}

#[test]
fn given_same_signals_when_detected_repeatedly_then_same_answer() {
    let signals = HostSignals::default().with_marker_flag().with_safari_marker();

    let first = detect(&signals);

    for _ in 0..10 {
        assert_eq!(detect(&signals), first);
    }
    assert!(first.is_resolved());
    assert!(!Environment::default().is_resolved());
}
