// Unit tests for error module
// AppError must stay serializable for hosts that forward it over IPC

use crate::error::AppError;

use croissant_core::DispatchError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors can be serialized.
///
/// **WHY THIS MATTERS**: A wrapping shell forwards these to its UI. If
/// serialization breaks, the UI receives opaque errors.
///
/// **BUG THIS CATCHES**: Would catch a non-serializable field added to a variant.
#[test]
fn given_app_error_when_serialized_then_tagged_with_variant() {
    // GIVEN
    let err = AppError::Usage {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let json = serde_json::to_value(&err).expect("serializable");

    // THEN
    assert_eq!(json["type"], "Usage");
    assert_eq!(json["data"]["message"], "Test");
}

/// **VALUE**: NotReady stays recognizable after crossing into the app error.
///
/// **BUG THIS CATCHES**: Would catch a retryable condition being reported as a
/// plain failure.
#[test]
fn given_not_ready_dispatch_error_when_converted_then_flagged_retryable() {
    // GIVEN
    let dispatch = DispatchError::NotReady {
        message: String::from("Native bridge is not ready yet"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let err = AppError::from(dispatch);

    // THEN
    match err {
        AppError::Dispatch {
            not_ready, message, ..
        } => {
            assert!(not_ready);
            assert_eq!(message, "Native bridge is not ready yet");
        }
        other => panic!("Expected Dispatch, got {other:?}"),
    }
}
