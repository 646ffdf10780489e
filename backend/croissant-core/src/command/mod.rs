//! The closed set of commands the application can issue.
//!
//! Every command has one wire name, used both as the HTTP path segment under
//! the API base and as the native bridge command name. Argument and result
//! shapes are identical on both transports.

pub mod records;
pub mod requests;

pub use records::{HealthStatus, Message, User};
pub use requests::{
    AddMessage, AddUser, CheckLogin, DeleteMessage, DeleteUser, GetMessages, GetUsers,
    RegisterUser,
};

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    CheckLogin,
    RegisterUser,
    GetUsers,
    AddUser,
    DeleteUser,
    GetMessages,
    AddMessage,
    DeleteMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("Unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::CheckLogin,
        CommandKind::RegisterUser,
        CommandKind::GetUsers,
        CommandKind::AddUser,
        CommandKind::DeleteUser,
        CommandKind::GetMessages,
        CommandKind::AddMessage,
        CommandKind::DeleteMessage,
    ];

    /// Wire name shared by the HTTP route and the bridge.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::CheckLogin => "check_login",
            CommandKind::RegisterUser => "register_user",
            CommandKind::GetUsers => "get_users",
            CommandKind::AddUser => "add_user",
            CommandKind::DeleteUser => "delete_user",
            CommandKind::GetMessages => "get_messages",
            CommandKind::AddMessage => "add_message",
            CommandKind::DeleteMessage => "delete_message",
        }
    }

    pub fn method(self) -> HttpMethod {
        match self {
            CommandKind::GetUsers | CommandKind::GetMessages => HttpMethod::Get,
            CommandKind::CheckLogin
            | CommandKind::RegisterUser
            | CommandKind::AddUser
            | CommandKind::AddMessage => HttpMethod::Post,
            CommandKind::DeleteUser | CommandKind::DeleteMessage => HttpMethod::Delete,
        }
    }

    /// Route relative to the API base, e.g. `/get_users`.
    pub fn path(self) -> String {
        format!("/{}", self.name())
    }

    /// GET routes never carry a body.
    pub fn carries_body(self) -> bool {
        self.method() != HttpMethod::Get
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// A typed command: its kind, its arguments, and the result it decodes to.
pub trait CommandRequest: fmt::Debug + Send + Sync {
    const KIND: CommandKind;

    type Response: DeserializeOwned + Send;

    /// Arguments in the JSON shape both transports accept. `{}` when there are none.
    fn to_args(&self) -> Value;
}
