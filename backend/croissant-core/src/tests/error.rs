// Unit tests for error normalization into DispatchError

use crate::error::{BridgeError, DispatchError, HttpInvokerError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

fn here() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

/// **VALUE**: Every HTTP fault lands in one of the two caller-facing variants.
///
/// **BUG THIS CATCHES**: Would catch a decode failure classified as a rejection,
/// or a rejection losing its status.
#[test]
fn given_http_invoker_errors_when_converted_then_transport_or_rejected() {
    let http: DispatchError = HttpInvokerError::Connect {
        message: "connection refused".to_string(),
        location: here(),
    }
    .into();
    let json: DispatchError = HttpInvokerError::Decode {
        message: "expected value".to_string(),
        location: here(),
    }
    .into();
    let rejected: DispatchError = HttpInvokerError::Rejected {
        status: HttpStatusCode(400),
        message: "User already exists".to_string(),
        location: here(),
    }
    .into();

    assert!(matches!(http, DispatchError::Transport { .. }));
    assert!(matches!(json, DispatchError::Transport { .. }));
    assert!(matches!(
        rejected,
        DispatchError::RemoteRejected {
            status: Some(HttpStatusCode(400)),
            ..
        }
    ));
    assert_eq!(rejected.message(), "User already exists");
}

#[test]
fn given_bridge_errors_when_converted_then_rejection_keeps_text() {
    let rejected: DispatchError = BridgeError::Rejected {
        message: "Invalid credentials".to_string(),
        location: here(),
    }
    .into();
    let failed: DispatchError = BridgeError::Failed {
        message: "host crashed".to_string(),
        location: here(),
    }
    .into();

    assert!(matches!(
        rejected,
        DispatchError::RemoteRejected { status: None, .. }
    ));
    assert_eq!(rejected.message(), "Invalid credentials");
    assert!(matches!(failed, DispatchError::Transport { .. }));
}

#[test]
fn given_not_ready_when_displayed_then_kind_message_and_location() {
    let error = DispatchError::NotReady {
        message: "Native bridge is not ready yet".to_string(),
        location: here(),
    };

    let rendered = error.to_string();

    assert!(error.is_not_ready());
    assert!(rendered.starts_with("Not Ready Error: Native bridge is not ready yet ["));
    assert!(rendered.contains("error.rs"));
}
