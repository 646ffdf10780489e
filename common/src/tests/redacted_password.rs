use crate::RedactedPassword;

/// **VALUE**: Verifies that passwords never reach log output.
///
/// **WHY THIS MATTERS**: Dispatch logs every command with its arguments at debug level.
/// A login form would otherwise write plaintext passwords into `croissant.log`.
///
/// **BUG THIS CATCHES**: Would catch a derived `Debug` replacing the manual impl.
#[test]
fn given_password_when_debug_or_display_formatted_then_value_is_hidden() {
    // GIVEN: A password
    let password = RedactedPassword::new("admin123");

    // WHEN: Formatting it both ways
    let debug = format!("{password:?}");
    let display = format!("{password}");

    // THEN: Neither contains the secret
    assert!(!debug.contains("admin123"));
    assert!(!display.contains("admin123"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies serde refuses to serialize the password implicitly.
///
/// **BUG THIS CATCHES**: Would catch someone deriving `Serialize` on a struct holding the
/// password and shipping it somewhere other than the one request builder that calls `expose()`.
#[test]
fn given_password_when_serialized_then_fails() {
    let password = RedactedPassword::from("hunter2");

    let result = serde_json::to_string(&password);

    let message = result.expect_err("Implicit serialization must be refused").to_string();
    assert!(message.contains("RedactedPassword refuses serialization"));
    assert!(!message.contains("hunter2"));
}

#[test]
fn given_password_when_exposed_then_returns_original_value() {
    let password = RedactedPassword::new(String::from("s3cret"));

    assert_eq!(password.expose(), "s3cret");
    assert!(!password.is_empty());
}
