use crate::command::records::{Message, User};
use crate::command::{CommandKind, CommandRequest};

use common::RedactedPassword;

use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct CheckLogin {
    pub email: String,
    pub password: RedactedPassword,
}

impl CommandRequest for CheckLogin {
    const KIND: CommandKind = CommandKind::CheckLogin;
    type Response = bool;

    fn to_args(&self) -> Value {
        json!({ "email": self.email, "password": self.password.expose() })
    }
}

/// Fails with `RemoteRejected` when the email is already registered.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: RedactedPassword,
}

impl CommandRequest for RegisterUser {
    const KIND: CommandKind = CommandKind::RegisterUser;
    type Response = bool;

    fn to_args(&self) -> Value {
        json!({ "email": self.email, "password": self.password.expose() })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GetUsers;

impl CommandRequest for GetUsers {
    const KIND: CommandKind = CommandKind::GetUsers;
    type Response = Vec<User>;

    fn to_args(&self) -> Value {
        json!({})
    }
}

#[derive(Debug, Clone)]
pub struct AddUser {
    pub name: String,
    pub email: String,
}

impl CommandRequest for AddUser {
    const KIND: CommandKind = CommandKind::AddUser;
    type Response = User;

    fn to_args(&self) -> Value {
        json!({ "name": self.name, "email": self.email })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUser {
    pub id: i32,
}

impl CommandRequest for DeleteUser {
    const KIND: CommandKind = CommandKind::DeleteUser;
    type Response = bool;

    fn to_args(&self) -> Value {
        json!({ "id": self.id })
    }
}

/// Newest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetMessages;

impl CommandRequest for GetMessages {
    const KIND: CommandKind = CommandKind::GetMessages;
    type Response = Vec<Message>;

    fn to_args(&self) -> Value {
        json!({})
    }
}

#[derive(Debug, Clone)]
pub struct AddMessage {
    pub master_email_address: String,
    pub department: String,
    pub text: String,
    pub content_type: String,
}

impl CommandRequest for AddMessage {
    const KIND: CommandKind = CommandKind::AddMessage;
    type Response = Message;

    fn to_args(&self) -> Value {
        json!({
            "master_email_address": self.master_email_address,
            "department": self.department,
            "text": self.text,
            "content_type": self.content_type,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteMessage {
    pub id: i32,
}

impl CommandRequest for DeleteMessage {
    const KIND: CommandKind = CommandKind::DeleteMessage;
    type Response = bool;

    fn to_args(&self) -> Value {
        json!({ "id": self.id })
    }
}
