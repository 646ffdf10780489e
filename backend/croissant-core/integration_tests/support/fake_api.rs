use croissant_core::CommandKind;
use croissant_core::NativeBridge;
use croissant_core::error::BridgeError;

use common::ErrorLocation;

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt, ready};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const DUPLICATE_USER_MESSAGE: &str = "User already exists";

#[derive(Default)]
struct Store {
    credentials: HashMap<String, String>,
    users: Vec<Value>,
    messages: Vec<Value>,
    next_user_id: i64,
    next_message_id: i64,
}

/// An in-memory stand-in for the remote API and its store.
///
/// The same state answers HTTP requests (mounted on a `MockServer`) and
/// native bridge calls, so both transports return identical shapes.
#[derive(Clone, Default)]
pub struct FakeApi {
    store: Arc<Mutex<Store>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount every command route plus `/api/health`.
    pub async fn mount(&self, server: &MockServer) {
        for kind in CommandKind::ALL {
            let verb = match kind.method() {
                croissant_core::command::HttpMethod::Get => "GET",
                croissant_core::command::HttpMethod::Post => "POST",
                croissant_core::command::HttpMethod::Delete => "DELETE",
            };
            Mock::given(method(verb))
                .and(path(format!("/api/{}", kind.name())))
                .respond_with(self.clone())
                .mount(server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Browser API Server is running",
                "timestamp": "2026-10-16T12:00:00.000Z",
            })))
            .mount(server)
            .await;
    }

    /// Run `command` against the store. `Err` carries an HTTP status and error text.
    pub fn handle(&self, command: &str, args: &Value) -> Result<Value, (u16, String)> {
        let mut store = self.store.lock().unwrap();
        let text = |key: &str| args.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        let id = args.get("id").and_then(Value::as_i64);

        match command {
            "check_login" => {
                let email = text("email");
                let password = text("password");
                Ok(json!(store.credentials.get(&email) == Some(&password)))
            }
            "register_user" => {
                let email = text("email");
                if store.credentials.contains_key(&email) {
                    return Err((400, DUPLICATE_USER_MESSAGE.to_string()));
                }
                store.credentials.insert(email, text("password"));
                Ok(json!(true))
            }
            "get_users" => Ok(Value::Array(store.users.clone())),
            "add_user" => {
                store.next_user_id += 1;
                let user = json!({
                    "id": store.next_user_id,
                    "name": text("name"),
                    "email": text("email"),
                });
                store.users.push(user.clone());
                Ok(user)
            }
            "delete_user" => {
                store.users.retain(|user| user.get("id").and_then(Value::as_i64) != id);
                Ok(json!(true))
            }
            "get_messages" => {
                let mut messages = store.messages.clone();
                messages.reverse();
                Ok(Value::Array(messages))
            }
            "add_message" => {
                store.next_message_id += 1;
                let message = json!({
                    "id": store.next_message_id,
                    "master_email_address": text("master_email_address"),
                    "department": text("department"),
                    "text": text("text"),
                    "content_type": text("content_type"),
                    "created_at": format!("2026-10-16T12:00:{:02}.000Z", store.next_message_id),
                });
                store.messages.push(message.clone());
                Ok(message)
            }
            "delete_message" => {
                store
                    .messages
                    .retain(|message| message.get("id").and_then(Value::as_i64) != id);
                Ok(json!(true))
            }
            other => Err((404, format!("Unknown command: {other}"))),
        }
    }

    /// The same store, reachable as a native bridge.
    pub fn bridge(&self) -> Arc<FakeBridge> {
        Arc::new(FakeBridge { api: self.clone() })
    }
}

impl Respond for FakeApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let command = request.url.path().trim_start_matches("/api/");
        let args: Value = serde_json::from_slice(&request.body).unwrap_or_else(|_| json!({}));

        match self.handle(command, &args) {
            Ok(json) => ResponseTemplate::new(200).set_body_json(json),
            Err((status, message)) => {
                ResponseTemplate::new(status).set_body_json(json!({ "error": message }))
            }
        }
    }
}

pub struct FakeBridge {
    api: FakeApi,
}

impl NativeBridge for FakeBridge {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Value,
    ) -> BoxFuture<'a, Result<Value, BridgeError>> {
        let outcome = self
            .api
            .handle(command, &args)
            .map_err(|(_, message)| BridgeError::Rejected {
                message,
                location: ErrorLocation::from(Location::caller()),
            });

        ready(outcome).boxed()
    }
}
