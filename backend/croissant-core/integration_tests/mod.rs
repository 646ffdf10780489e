mod support;

mod config;
mod dispatcher;
mod http_invoker;
mod readiness;
