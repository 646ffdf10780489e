use crate::http_invoker::rejection_message;

/// **VALUE**: The server's own error text is what the user sees.
#[test]
fn given_json_error_body_when_rejection_message_then_server_text() {
    let body = r#"{"error":"User already exists"}"#;

    assert_eq!(rejection_message(400, body), "User already exists");
}

/// **BUG THIS CATCHES**: Would catch HTML error pages or non-string error
/// fields leaking into user-facing messages.
#[test]
fn given_body_without_usable_error_when_rejection_message_then_generic_text() {
    assert_eq!(rejection_message(500, ""), "HTTP 500 - request failed");
    assert_eq!(
        rejection_message(502, "<html>Bad Gateway</html>"),
        "HTTP 502 - request failed"
    );
    assert_eq!(
        rejection_message(400, r#"{"message":"nope"}"#),
        "HTTP 400 - request failed"
    );
    assert_eq!(
        rejection_message(400, r#"{"error":{"code":7}}"#),
        "HTTP 400 - request failed"
    );
}
