mod command;
mod config;
mod environment;
mod error;
mod http_invoker;
mod readiness;
