use croissant_core::CommandKind;
use croissant_core::error::HttpInvokerError;
use croissant_core::http_invoker::HttpInvoker;

use common::HttpStatusCode;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// HTTP transport: one request per command, mapped statuses
// ============================================================================

fn invoker_for(server: &MockServer) -> HttpInvoker {
    HttpInvoker::new(&format!("{}/api", server.uri()), Duration::from_secs(5))
        .expect("valid base URL")
}

/// **VALUE**: Every command lands under the API base, with or without a trailing slash.
///
/// **WHY THIS MATTERS**: `Url::join` drops the last path segment of a base that
/// does not end in `/`, which would send `/get_users` instead of `/api/get_users`.
///
/// **BUG THIS CATCHES**: Would catch the `/api` prefix being lost on join.
#[test]
fn given_base_with_or_without_slash_when_endpoint_built_then_under_api_prefix() {
    for base in ["http://localhost:3001/api", "http://localhost:3001/api/"] {
        // GIVEN
        let invoker = HttpInvoker::with_default_timeout(base).expect("valid base URL");

        // WHEN
        let endpoint = invoker.endpoint(CommandKind::GetUsers).expect("joinable");

        // THEN
        assert_eq!(endpoint.as_str(), "http://localhost:3001/api/get_users");
    }
}

#[test]
fn given_malformed_base_when_invoker_built_then_url_parse_error() {
    let result = HttpInvoker::with_default_timeout("not a url");

    assert!(matches!(result, Err(HttpInvokerError::UrlParse { .. })));
}

/// **VALUE**: POST commands send their arguments as the JSON body.
///
/// **BUG THIS CATCHES**: Would catch arguments sent as a query string or dropped.
#[tokio::test]
async fn given_post_command_when_invoked_then_args_sent_as_json_body() {
    // GIVEN
    let server = MockServer::start().await;
    let args = json!({ "email": "ada@example.com", "password": "hunter2" });
    Mock::given(method("POST"))
        .and(path("/api/check_login"))
        .and(body_json(&args))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let result = invoker_for(&server)
        .invoke(CommandKind::CheckLogin, &args)
        .await
        .expect("check_login should succeed");

    // THEN
    assert_eq!(result, json!(true));
}

/// **VALUE**: DELETE commands carry their id in the body, not the path.
#[tokio::test]
async fn given_delete_command_when_invoked_then_id_sent_in_body() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/delete_message"))
        .and(body_json(json!({ "id": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let result = invoker_for(&server)
        .invoke(CommandKind::DeleteMessage, &json!({ "id": 42 }))
        .await;

    // THEN
    assert_eq!(result.expect("delete_message should succeed"), json!(true));
}

/// **VALUE**: A non-success status keeps the status and the server's error text.
#[tokio::test]
async fn given_error_body_when_invoked_then_rejected_with_server_text() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/add_message"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": "Department is required" })),
        )
        .mount(&server)
        .await;

    // WHEN
    let result = invoker_for(&server)
        .invoke(CommandKind::AddMessage, &json!({}))
        .await;

    // THEN
    match result {
        Err(HttpInvokerError::Rejected {
            status, message, ..
        }) => {
            assert_eq!(status, HttpStatusCode(422));
            assert!(status.is_client_error());
            assert_eq!(message, "Department is required");
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
}

/// **VALUE**: A request that outlives the configured timeout fails instead of hanging.
#[tokio::test]
async fn given_slow_server_when_invoked_then_timeout_error() {
    // GIVEN: A server slower than the invoker's timeout
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    let invoker = HttpInvoker::new(
        &format!("{}/api", server.uri()),
        Duration::from_millis(200),
    )
    .expect("valid base URL");

    // WHEN
    let result = invoker.invoke(CommandKind::GetUsers, &json!({})).await;

    // THEN
    assert!(matches!(result, Err(HttpInvokerError::Timeout { .. })));
}

#[tokio::test]
async fn given_health_endpoint_when_queried_then_status_decoded() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "timestamp": "2026-10-16T12:00:00.000Z",
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN
    let health = invoker_for(&server).health().await.expect("health");

    // THEN
    assert_eq!(health.status, "ok");
    assert_eq!(health.timestamp, "2026-10-16T12:00:00.000Z");
}
