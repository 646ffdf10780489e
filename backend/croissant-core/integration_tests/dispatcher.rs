use crate::support::fake_api::{DUPLICATE_USER_MESSAGE, FakeApi};
use crate::support::hosts::{RecordingBridge, ScriptedHost};
use crate::support::{config_for, fast_config_for};

use croissant_core::command::{AddUser, DeleteUser, GetUsers, RegisterUser, User};
use croissant_core::error::CoreError;
use croissant_core::{
    CommandKind, DispatchConfig, DispatchError, Dispatcher, Environment, HostSignals,
    NoBridgeHost, ReadinessState, Route,
};

use common::{HttpStatusCode, RedactedPassword};

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Dispatcher routing from an external consumer's perspective
// ============================================================================

fn browser_dispatcher(config: &DispatchConfig) -> Dispatcher {
    Dispatcher::new(config, &HostSignals::default(), Arc::new(NoBridgeHost))
        .expect("browser dispatcher should build")
}

fn native_dispatcher(config: &DispatchConfig, host: Arc<ScriptedHost>) -> Dispatcher {
    let signals = HostSignals::default().with_bridge_handle();
    Dispatcher::new(config, &signals, host).expect("native dispatcher should build")
}

/// Fails the test when the server sees any request at all.
async fn forbid_http(server: &MockServer) {
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

// ----------------------------------------------------------------------------
// Browser environment
// ----------------------------------------------------------------------------

/// **VALUE**: A browser host serves `get_users` with exactly one bodiless GET.
///
/// **WHY THIS MATTERS**: The remote API ignores GET bodies on some stacks and
/// rejects them on others. The payload must also reach the caller untouched.
///
/// **BUG THIS CATCHES**: Would catch a GET that sends `{}` as a body, a second
/// request per call, or any reshaping of the result.
#[tokio::test]
async fn given_browser_host_when_get_users_then_single_get_without_body() {
    // GIVEN: A server answering get_users with a fixed payload
    let server = MockServer::start().await;
    let payload = json!([{ "id": 7, "name": "Ada", "email": "ada@example.com", "extra": "kept" }]);
    Mock::given(method("GET"))
        .and(path("/api/get_users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;
    let dispatcher = browser_dispatcher(&config_for(&server));

    // WHEN: Dispatching get_users
    let result = dispatcher
        .invoke_raw(CommandKind::GetUsers, json!({}))
        .await
        .expect("get_users should succeed");

    // THEN: The payload is returned as received, from one GET with no body
    assert_eq!(result, payload);
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method.as_str(), "GET");
    assert!(requests[0].body.is_empty(), "GET must not carry a body");
    assert_eq!(dispatcher.detected_environment(), Environment::Browser);
    assert_eq!(dispatcher.readiness(), None);
}

/// **VALUE**: Add, list and delete round through the remote store.
///
/// **WHY THIS MATTERS**: This is the everyday path of the users screen.
///
/// **BUG THIS CATCHES**: Would catch POST/DELETE sent without their JSON body
/// or typed results that fail to decode.
#[tokio::test]
async fn given_browser_host_when_user_added_and_deleted_then_listing_follows() {
    // GIVEN: A fake API with no users
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let dispatcher = browser_dispatcher(&config_for(&server));

    // WHEN: Adding Ada
    let ada = dispatcher
        .invoke(&AddUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .expect("add_user should succeed");

    // THEN: She gets a fresh id and shows up in the listing
    assert_eq!(
        ada,
        User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    );
    let users = dispatcher.invoke(&GetUsers).await.expect("listing");
    assert_eq!(users, vec![ada.clone()]);

    // WHEN: Deleting her
    let deleted = dispatcher
        .invoke(&DeleteUser { id: ada.id })
        .await
        .expect("delete_user should succeed");

    // THEN: The listing no longer contains her id
    assert!(deleted);
    let users = dispatcher.invoke(&GetUsers).await.expect("listing");
    assert!(users.iter().all(|user| user.id != ada.id));
}

/// **VALUE**: A server-side refusal carries the server's own message and status.
///
/// **WHY THIS MATTERS**: The registration form shows this text to the user.
///
/// **BUG THIS CATCHES**: Would catch the `{"error": ...}` text being replaced by
/// a generic message, or a 400 surfacing as a transport failure.
#[tokio::test]
async fn given_registered_email_when_register_again_then_remote_rejected_with_server_text() {
    // GIVEN: An email that is already registered
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let dispatcher = browser_dispatcher(&config_for(&server));
    let request = RegisterUser {
        email: "ada@example.com".to_string(),
        password: RedactedPassword::new("hunter2"),
    };
    assert!(dispatcher.invoke(&request).await.expect("first registration"));

    // WHEN: Registering the same email again
    let result = dispatcher.invoke(&request).await;

    // THEN: RemoteRejected with status 400 and the server's text
    match result {
        Err(DispatchError::RemoteRejected {
            status, message, ..
        }) => {
            assert_eq!(status, Some(HttpStatusCode(400)));
            assert_eq!(message, DUPLICATE_USER_MESSAGE);
        }
        other => panic!("Expected RemoteRejected, got {other:?}"),
    }
}

/// **VALUE**: A failing status without a JSON error field gets a generic message.
///
/// **BUG THIS CATCHES**: Would catch an HTML error page leaking into the message,
/// or a 500 being reported as a transport fault.
#[tokio::test]
async fn given_server_error_without_json_when_dispatch_then_generic_rejection() {
    // GIVEN: A server that fails with a plain-text body
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;
    let dispatcher = browser_dispatcher(&config_for(&server));

    // WHEN: Dispatching get_messages
    let result = dispatcher.invoke_raw(CommandKind::GetMessages, json!({})).await;

    // THEN: RemoteRejected with the generic text
    match result {
        Err(DispatchError::RemoteRejected {
            status, message, ..
        }) => {
            assert_eq!(status, Some(HttpStatusCode(500)));
            assert_eq!(message, "HTTP 500 - request failed");
        }
        other => panic!("Expected RemoteRejected, got {other:?}"),
    }
}

/// **VALUE**: A server that cannot be reached yields `Transport`.
///
/// **BUG THIS CATCHES**: Would catch connection errors escaping as panics or
/// being dressed up as a server rejection.
#[tokio::test]
async fn given_unreachable_server_when_dispatch_then_transport_error() {
    // GIVEN: A base URL on a port nothing listens on
    let mut config = DispatchConfig::default();
    config.api.base_url = "http://127.0.0.1:1/api".to_string();
    let dispatcher = browser_dispatcher(&config);

    // WHEN: Dispatching
    let result = dispatcher.invoke(&GetUsers).await;

    // THEN: Transport
    assert!(
        matches!(result, Err(DispatchError::Transport { .. })),
        "Expected Transport, got {result:?}"
    );
}

/// **VALUE**: Success bodies that are not JSON, or not the expected shape, yield `Transport`.
///
/// **BUG THIS CATCHES**: Would catch a decode failure being reported as a
/// rejection, or an untyped value silently defaulting.
#[tokio::test]
async fn given_malformed_success_body_when_dispatch_then_transport_error() {
    // GIVEN: get_users answers with text, get_messages with the wrong shape
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/add_user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;
    let dispatcher = browser_dispatcher(&config_for(&server));

    // WHEN: Dispatching both
    let unparsable = dispatcher.invoke(&GetUsers).await;
    let misshapen = dispatcher
        .invoke(&AddUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await;

    // THEN: Both are Transport
    assert!(matches!(unparsable, Err(DispatchError::Transport { .. })));
    assert!(matches!(misshapen, Err(DispatchError::Transport { .. })));
}

#[tokio::test]
async fn given_running_api_when_health_then_status_returned() {
    // GIVEN
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let dispatcher = browser_dispatcher(&config_for(&server));

    // WHEN
    let health = dispatcher.health().await.expect("health should succeed");

    // THEN
    assert_eq!(health.status, "Browser API Server is running");
    assert!(!health.timestamp.is_empty());
}

// ----------------------------------------------------------------------------
// Native environment
// ----------------------------------------------------------------------------

/// **VALUE**: While readiness is unresolved nothing is sent anywhere.
///
/// **WHY THIS MATTERS**: Falling back to HTTP during startup would hit a server
/// that a native host may not even run.
///
/// **BUG THIS CATCHES**: Would catch a dispatch that quietly waits, or one that
/// takes the HTTP path before readiness has settled.
#[tokio::test]
async fn given_native_host_still_polling_when_dispatch_then_not_ready_and_nothing_sent() {
    // GIVEN: A native host whose bridge never shows up, with a long deadline
    let server = MockServer::start().await;
    forbid_http(&server).await;
    let bridge = RecordingBridge::replying(json!([]));
    let dispatcher = native_dispatcher(&config_for(&server), ScriptedHost::never(bridge.clone()));

    // WHEN: Dispatching immediately
    let result = dispatcher.invoke(&GetUsers).await;

    // THEN: NotReady, and neither transport was touched
    assert!(
        matches!(result, Err(DispatchError::NotReady { .. })),
        "Expected NotReady, got {result:?}"
    );
    assert_eq!(dispatcher.readiness(), Some(ReadinessState::Polling));
    assert!(dispatcher.route().is_err());
    assert!(bridge.calls().is_empty());
}

/// **VALUE**: After the deadline a native host is served over HTTP for good.
///
/// **WHY THIS MATTERS**: The app must stay usable when the shell never exposes
/// its bridge, and the user is told once.
///
/// **BUG THIS CATCHES**: Would catch calls still going to the bridge after the
/// downgrade, the environment not reporting Browser, or a repeated advisory.
#[tokio::test]
async fn given_native_host_timed_out_when_dispatch_then_served_over_http() {
    // GIVEN: A native host that never gets a bridge, with fast timings
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let bridge = RecordingBridge::replying(json!([]));
    let dispatcher =
        native_dispatcher(&fast_config_for(&server), ScriptedHost::never(bridge.clone()));

    // WHEN: Readiness settles and a command is dispatched
    let environment = dispatcher.wait_until_settled().await;
    let users = dispatcher.invoke(&GetUsers).await.expect("HTTP fallback");

    // THEN: HTTP served it and the advisory is available exactly once
    assert_eq!(environment, Environment::Browser);
    assert_eq!(dispatcher.readiness(), Some(ReadinessState::FailedTimeout));
    assert_eq!(dispatcher.detected_environment(), Environment::Native);
    assert_eq!(dispatcher.route().expect("settled"), Route::Http);
    assert!(users.is_empty());
    assert!(bridge.calls().is_empty());
    assert!(dispatcher.take_advisory().is_some());
    assert_eq!(dispatcher.take_advisory(), None);
}

/// **VALUE**: Once ready, commands go to the bridge and never to HTTP.
///
/// **BUG THIS CATCHES**: Would catch double dispatch or routing that ignores readiness.
#[tokio::test]
async fn given_native_host_ready_when_dispatch_then_served_by_bridge() {
    // GIVEN: A bridge visible from the first probe
    let server = MockServer::start().await;
    forbid_http(&server).await;
    let bridge = RecordingBridge::replying(json!([]));
    let dispatcher = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(bridge.clone(), 1),
    );
    assert_eq!(dispatcher.wait_until_settled().await, Environment::Native);

    // WHEN: Dispatching get_users
    let users = dispatcher.invoke(&GetUsers).await.expect("native call");

    // THEN: One bridge call, no HTTP
    assert!(users.is_empty());
    assert_eq!(bridge.calls(), vec!["get_users".to_string()]);
    assert_eq!(dispatcher.route().expect("settled"), Route::Native);
    assert_eq!(dispatcher.take_advisory(), None);
}

/// **VALUE**: Both transports return the same shapes for the same store.
///
/// **BUG THIS CATCHES**: Would catch argument names that differ between the
/// bridge call and the HTTP body.
#[tokio::test]
async fn given_shared_store_when_added_natively_then_http_listing_matches() {
    // GIVEN: One store, exposed both as a bridge and over HTTP
    let server = MockServer::start().await;
    let api = FakeApi::new();
    api.mount(&server).await;
    let native = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(api.bridge(), 1),
    );
    native.wait_until_settled().await;
    let browser = browser_dispatcher(&config_for(&server));

    // WHEN: Adding a user through the bridge
    let ada = native
        .invoke(&AddUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .expect("native add_user");

    // THEN: HTTP and native listings agree
    let over_http = browser.invoke(&GetUsers).await.expect("HTTP listing");
    let over_bridge = native.invoke(&GetUsers).await.expect("native listing");
    assert_eq!(over_http, vec![ada]);
    assert_eq!(over_http, over_bridge);
}

/// **VALUE**: A bridge refusal surfaces as `RemoteRejected` without a status.
#[tokio::test]
async fn given_bridge_rejects_when_dispatch_then_remote_rejected_without_status() {
    // GIVEN
    let server = MockServer::start().await;
    forbid_http(&server).await;
    let bridge = RecordingBridge::rejecting(DUPLICATE_USER_MESSAGE);
    let dispatcher = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(bridge.clone(), 1),
    );
    dispatcher.wait_until_settled().await;

    // WHEN
    let result = dispatcher
        .invoke(&RegisterUser {
            email: "ada@example.com".to_string(),
            password: RedactedPassword::new("hunter2"),
        })
        .await;

    // THEN
    match result {
        Err(DispatchError::RemoteRejected {
            status, message, ..
        }) => {
            assert_eq!(status, None);
            assert_eq!(message, DUPLICATE_USER_MESSAGE);
        }
        other => panic!("Expected RemoteRejected, got {other:?}"),
    }
    assert_eq!(bridge.calls(), vec!["register_user".to_string()]);
}

/// **VALUE**: A ready bridge that became unusable hands the call to HTTP.
///
/// **BUG THIS CATCHES**: Would catch a call sent to a torn-down bridge, or
/// a `Transport` error where HTTP could have served the call.
#[tokio::test]
async fn given_ready_bridge_unusable_when_dispatch_then_http_serves_call() {
    // GIVEN: A ready bridge that then reports itself unusable
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let bridge = RecordingBridge::replying(json!([]));
    let dispatcher = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(bridge.clone(), 1),
    );
    dispatcher.wait_until_settled().await;
    bridge.set_usable(false);

    // WHEN
    let users = dispatcher.invoke(&GetUsers).await.expect("HTTP fallback");

    // THEN: The bridge was skipped
    assert!(users.is_empty());
    assert!(bridge.calls().is_empty());
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn given_bridge_reports_unavailable_when_dispatch_then_http_serves_call() {
    // GIVEN: A bridge that refuses without executing anything
    let server = MockServer::start().await;
    FakeApi::new().mount(&server).await;
    let bridge = RecordingBridge::unavailable();
    let dispatcher = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(bridge.clone(), 1),
    );
    dispatcher.wait_until_settled().await;

    // WHEN
    let users = dispatcher.invoke(&GetUsers).await.expect("HTTP fallback");

    // THEN: Tried the bridge once, then HTTP
    assert!(users.is_empty());
    assert_eq!(bridge.calls(), vec!["get_users".to_string()]);
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(1));
}

/// **VALUE**: `invoke_with_retry` rides out the polling window.
///
/// **BUG THIS CATCHES**: Would catch the retry giving up on the first NotReady,
/// or retrying errors that are not NotReady.
#[tokio::test]
async fn given_bridge_appears_on_third_probe_when_invoke_with_retry_then_succeeds_natively() {
    // GIVEN: A bridge that appears after a few polls
    let server = MockServer::start().await;
    forbid_http(&server).await;
    let mut config = config_for(&server);
    config.readiness.poll_interval_ms = 20;
    config.readiness.activation_after_ms = 500;
    config.readiness.deadline_ms = 5_000;
    let bridge = RecordingBridge::replying(json!([]));
    let dispatcher = native_dispatcher(&config, ScriptedHost::visible_from(bridge.clone(), 3));

    // WHEN
    let users = dispatcher
        .invoke_with_retry(&GetUsers)
        .await
        .expect("retry should succeed once ready");

    // THEN
    assert!(users.is_empty());
    assert_eq!(bridge.calls(), vec!["get_users".to_string()]);
    assert_eq!(dispatcher.readiness(), Some(ReadinessState::Ready));
}

#[tokio::test]
async fn given_bridge_rejects_when_invoke_with_retry_then_not_retried() {
    // GIVEN
    let server = MockServer::start().await;
    forbid_http(&server).await;
    let bridge = RecordingBridge::rejecting("nope");
    let dispatcher = native_dispatcher(
        &config_for(&server),
        ScriptedHost::visible_from(bridge.clone(), 1),
    );
    dispatcher.wait_until_settled().await;

    // WHEN
    let result = dispatcher.invoke_with_retry(&GetUsers).await;

    // THEN
    assert!(matches!(result, Err(DispatchError::RemoteRejected { .. })));
    assert_eq!(bridge.calls().len(), 1);
}

// ----------------------------------------------------------------------------
// Construction
// ----------------------------------------------------------------------------

#[tokio::test]
async fn given_force_native_config_when_plain_host_then_treated_as_native() {
    // GIVEN: No native signals, but the config forces native
    let server = MockServer::start().await;
    let mut config = config_for(&server);
    config.environment.force_native = true;

    // WHEN
    let dispatcher = browser_dispatcher(&config);

    // THEN
    assert_eq!(dispatcher.detected_environment(), Environment::Native);
    assert_eq!(dispatcher.readiness(), Some(ReadinessState::Polling));
}

/// **VALUE**: Building a native dispatcher outside a runtime is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch `tokio::spawn` being called without a runtime.
#[test]
fn given_no_runtime_when_native_dispatcher_built_then_runtime_error() {
    // GIVEN
    let mut config = DispatchConfig::default();
    config.environment.force_native = true;

    // WHEN
    let result = Dispatcher::new(&config, &HostSignals::default(), Arc::new(NoBridgeHost));

    // THEN
    assert!(matches!(result, Err(CoreError::Runtime { .. })));
}
