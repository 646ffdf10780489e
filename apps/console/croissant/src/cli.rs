//! Command line handling for the console host.
//!
//! ```text
//! croissant health
//! croissant <command> [json-args]
//! ```

use crate::error::AppError;

use croissant_core::{CommandKind, Dispatcher, HostSignals};

use common::ErrorLocation;

use std::panic::Location;
use std::str::FromStr;

use log::debug;
use serde_json::{Map, Value};

pub const HEALTH_ARG: &str = "health";

/// Optional user agent reported by a wrapping shell.
pub const ENV_USER_AGENT: &str = "CROISSANT_USER_AGENT";

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Health,
    Command { kind: CommandKind, args: Value },
}

pub fn usage() -> String {
    let names: Vec<&str> = CommandKind::ALL.iter().map(|kind| kind.name()).collect();
    format!(
        "usage: croissant {HEALTH_ARG} | croissant <command> [json-args]\ncommands: {}",
        names.join(", ")
    )
}

/// Parse the arguments that follow the program name.
#[track_caller]
pub fn parse<I>(args: I) -> Result<Invocation, AppError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();

    let Some(name) = args.next() else {
        return Err(usage_error(usage()));
    };

    let invocation = if name == HEALTH_ARG {
        Invocation::Health
    } else {
        let kind = CommandKind::from_str(&name)
            .map_err(|e| usage_error(format!("{e}\n{}", usage())))?;
        let args = match args.next() {
            Some(raw) => parse_args(&raw)?,
            None => Value::Object(Map::new()),
        };
        Invocation::Command { kind, args }
    };

    if let Some(extra) = args.next() {
        return Err(usage_error(format!("Unexpected argument: {extra}")));
    }

    Ok(invocation)
}

#[track_caller]
fn parse_args(raw: &str) -> Result<Value, AppError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(usage_error(String::from("Arguments must be a JSON object"))),
        Err(e) => Err(usage_error(format!("Arguments are not valid JSON: {e}"))),
    }
}

#[track_caller]
fn usage_error(message: String) -> AppError {
    AppError::Usage {
        message,
        location: ErrorLocation::from(Location::caller()),
    }
}

/// Signals a console process can observe about itself.
pub fn host_signals() -> HostSignals {
    match std::env::var(ENV_USER_AGENT) {
        Ok(user_agent) => HostSignals::default().with_user_agent(user_agent),
        Err(_) => HostSignals::default(),
    }
}

/// Run `invocation` and return the JSON to print.
pub async fn execute(dispatcher: &Dispatcher, invocation: &Invocation) -> Result<Value, AppError> {
    match invocation {
        Invocation::Health => {
            let health = dispatcher.health().await?;
            serde_json::to_value(health).map_err(|e| AppError::App {
                message: format!("Failed to encode health status: {e}"),
                location: ErrorLocation::from(Location::caller()),
            })
        }
        Invocation::Command { kind, args } => {
            debug!("Running {kind} from the command line");
            Ok(dispatcher.invoke_raw(*kind, args.clone()).await?)
        }
    }
}
