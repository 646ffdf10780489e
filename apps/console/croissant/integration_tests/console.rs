use croissant::cli::{Invocation, execute, parse};
use croissant::error::AppError;

use croissant_core::{DispatchConfig, Dispatcher, HostSignals, NoBridgeHost};

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Command line invocations run through a real dispatcher against wiremock
// ============================================================================

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    let mut config = DispatchConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    Dispatcher::new(&config, &HostSignals::default(), Arc::new(NoBridgeHost))
        .expect("browser dispatcher")
}

/// **VALUE**: A parsed command line reaches the API with its JSON arguments.
///
/// **WHY THIS MATTERS**: This is the whole path of the console binary minus
/// process setup.
///
/// **BUG THIS CATCHES**: Would catch arguments lost between the CLI and the
/// request body, or the result being reshaped before printing.
#[tokio::test]
async fn given_add_user_command_line_when_executed_then_api_receives_args() {
    // GIVEN
    let server = MockServer::start().await;
    let created = json!({ "id": 9, "name": "Ada", "email": "ada@example.com" });
    Mock::given(method("POST"))
        .and(path("/api/add_user"))
        .and(body_json(json!({ "name": "Ada", "email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let invocation = parse([
        "add_user".to_string(),
        r#"{"name":"Ada","email":"ada@example.com"}"#.to_string(),
    ])
    .expect("valid command line");

    // WHEN
    let output = execute(&dispatcher_for(&server), &invocation).await;

    // THEN
    assert_eq!(output.expect("add_user should succeed"), created);
}

#[tokio::test]
async fn given_health_invocation_when_executed_then_status_rendered() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Browser API Server is running",
            "timestamp": "2026-10-16T12:00:00.000Z",
        })))
        .mount(&server)
        .await;

    // WHEN
    let output = execute(&dispatcher_for(&server), &Invocation::Health)
        .await
        .expect("health");

    // THEN
    assert_eq!(output["status"], "Browser API Server is running");
}

/// **VALUE**: A server refusal becomes a non-retryable app error with the server's text.
#[tokio::test]
async fn given_server_rejects_when_executed_then_dispatch_error_with_text() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register_user"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "User already exists" })),
        )
        .mount(&server)
        .await;
    let invocation = parse([
        "register_user".to_string(),
        r#"{"email":"ada@example.com","password":"hunter2"}"#.to_string(),
    ])
    .expect("valid command line");

    // WHEN
    let result = execute(&dispatcher_for(&server), &invocation).await;

    // THEN
    match result {
        Err(AppError::Dispatch {
            message, not_ready, ..
        }) => {
            assert_eq!(message, "User already exists");
            assert!(!not_ready);
        }
        other => panic!("Expected Dispatch error, got {other:?}"),
    }
}
