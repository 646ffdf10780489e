use crate::ErrorLocation;

use std::panic::Location;

#[track_caller]
fn raise() -> ErrorLocation {
    ErrorLocation::from(Location::caller())
}

/// **VALUE**: A `#[track_caller]` constructor reports the line that called it.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[track_caller]`, which makes
/// every error point at the constructor instead of the failing call.
#[test]
fn given_track_caller_helper_when_called_then_location_is_call_site() {
    // GIVEN
    let expected_line = line!() + 3;

    // WHEN
    let location = raise();

    // THEN
    assert_eq!(location.line, expected_line);
    assert!(location.file.ends_with("error_location.rs"));
}

#[test]
fn given_location_when_displayed_then_file_line_column_in_brackets() {
    let location = ErrorLocation {
        file: "backend/croissant-core/src/dispatcher/mod.rs",
        line: 88,
        column: 17,
    };

    assert_eq!(
        location.to_string(),
        "[backend/croissant-core/src/dispatcher/mod.rs:88:17]"
    );
}

/// **VALUE**: Locations serialize as plain fields inside console error output.
#[test]
fn given_location_when_serialized_then_object_with_three_fields() {
    let location = ErrorLocation {
        file: "cli.rs",
        line: 4,
        column: 2,
    };

    let json = serde_json::to_value(location).expect("serializable");

    assert_eq!(
        json,
        serde_json::json!({ "file": "cli.rs", "line": 4, "column": 2 })
    );
}
