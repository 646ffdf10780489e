// Unit tests for command line parsing

use crate::cli::{Invocation, parse, usage};
use crate::error::AppError;

use croissant_core::CommandKind;

use serde_json::json;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn given_health_arg_when_parsed_then_health() {
    assert_eq!(parse(args(&["health"])).ok(), Some(Invocation::Health));
}

/// **VALUE**: Command names on the command line are the wire names.
///
/// **BUG THIS CATCHES**: Would catch a command invoked with `null` arguments,
/// which the API rejects for POST routes.
#[test]
fn given_command_without_args_when_parsed_then_empty_object_args() {
    // GIVEN/WHEN
    let invocation = parse(args(&["get_users"]));

    // THEN
    assert_eq!(
        invocation.ok(),
        Some(Invocation::Command {
            kind: CommandKind::GetUsers,
            args: json!({}),
        })
    );
}

#[test]
fn given_command_with_json_args_when_parsed_then_args_kept() {
    let invocation = parse(args(&["delete_user", r#"{"id": 4}"#]));

    assert_eq!(
        invocation.ok(),
        Some(Invocation::Command {
            kind: CommandKind::DeleteUser,
            args: json!({ "id": 4 }),
        })
    );
}

/// **VALUE**: Every malformed command line is a usage error, never a dispatch.
#[test]
fn given_bad_command_lines_when_parsed_then_usage_error() {
    let cases = [
        args(&[]),
        args(&["drop_tables"]),
        args(&["add_user", "not json"]),
        args(&["add_user", "[1, 2]"]),
        args(&["get_users", "{}", "extra"]),
    ];

    for case in cases {
        assert!(
            matches!(parse(case.clone()), Err(AppError::Usage { .. })),
            "{case:?}"
        );
    }
}

#[test]
fn given_usage_text_then_lists_every_command() {
    let text = usage();

    for kind in CommandKind::ALL {
        assert!(text.contains(kind.name()), "{kind} missing from usage");
    }
}
