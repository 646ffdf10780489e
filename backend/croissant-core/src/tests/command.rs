// Unit tests for the command catalogue
// Wire names, HTTP methods and argument shapes

use crate::command::{
    AddMessage, AddUser, CheckLogin, CommandKind, CommandRequest, DeleteUser, GetUsers,
    HttpMethod, UnknownCommand,
};

use common::RedactedPassword;

use std::str::FromStr;

use serde_json::json;

/// **VALUE**: Every command parses back from its wire name.
///
/// **BUG THIS CATCHES**: Would catch a variant added to the enum but left out of
/// `ALL`, which would make it unreachable from `FromStr`.
#[test]
fn given_every_kind_when_name_parsed_then_same_kind() {
    for kind in CommandKind::ALL {
        assert_eq!(CommandKind::from_str(kind.name()), Ok(kind));
        assert_eq!(kind.to_string(), kind.name());
        assert_eq!(kind.path(), format!("/{}", kind.name()));
    }
}

#[test]
fn given_unknown_name_when_parsed_then_unknown_command() {
    assert_eq!(
        CommandKind::from_str("drop_tables"),
        Err(UnknownCommand("drop_tables".to_string()))
    );
    assert!(CommandKind::from_str("GetUsers").is_err(), "names are snake_case");
}

/// **VALUE**: The method table matches the routes the API exposes.
///
/// **BUG THIS CATCHES**: Would catch a listing sent as POST or a delete sent as GET.
#[test]
fn given_commands_when_method_queried_then_matches_api_routes() {
    assert_eq!(CommandKind::GetUsers.method(), HttpMethod::Get);
    assert_eq!(CommandKind::GetMessages.method(), HttpMethod::Get);
    assert_eq!(CommandKind::CheckLogin.method(), HttpMethod::Post);
    assert_eq!(CommandKind::RegisterUser.method(), HttpMethod::Post);
    assert_eq!(CommandKind::AddUser.method(), HttpMethod::Post);
    assert_eq!(CommandKind::AddMessage.method(), HttpMethod::Post);
    assert_eq!(CommandKind::DeleteUser.method(), HttpMethod::Delete);
    assert_eq!(CommandKind::DeleteMessage.method(), HttpMethod::Delete);

    assert!(!CommandKind::GetUsers.carries_body());
    assert!(CommandKind::DeleteUser.carries_body());
}

#[test]
fn given_requests_when_args_built_then_field_names_match_wire_shape() {
    assert_eq!(GetUsers.to_args(), json!({}));
    assert_eq!(DeleteUser { id: 3 }.to_args(), json!({ "id": 3 }));
    assert_eq!(
        AddUser {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
        .to_args(),
        json!({ "name": "Ada", "email": "ada@example.com" })
    );
    assert_eq!(
        AddMessage {
            master_email_address: "ada@example.com".to_string(),
            department: "Engineering".to_string(),
            text: "hello".to_string(),
            content_type: "text/plain".to_string(),
        }
        .to_args(),
        json!({
            "master_email_address": "ada@example.com",
            "department": "Engineering",
            "text": "hello",
            "content_type": "text/plain",
        })
    );
}

/// **VALUE**: Credentials reach the wire but never the logs.
///
/// **BUG THIS CATCHES**: Would catch a `{:?}` of a login request printing the password.
#[test]
fn given_login_request_when_debugged_then_password_hidden_but_sent() {
    // GIVEN
    let request = CheckLogin {
        email: "ada@example.com".to_string(),
        password: RedactedPassword::new("hunter2"),
    };

    // WHEN
    let debug = format!("{request:?}");
    let args = request.to_args();

    // THEN
    assert!(!debug.contains("hunter2"));
    assert_eq!(args["password"], "hunter2");
    assert_eq!(<CheckLogin as CommandRequest>::KIND, CommandKind::CheckLogin);
}
