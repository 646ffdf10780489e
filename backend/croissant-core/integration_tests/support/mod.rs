//! Shared fixtures for the integration tests.
//!
//! - [`fake_api::FakeApi`]: an in-memory store served over wiremock and as a native bridge
//! - [`hosts::ScriptedHost`]: a bridge host whose probe and activation outcomes are scripted
//! - [`hosts::RecordingBridge`]: a bridge that records the commands it receives

pub mod fake_api;
pub mod hosts;

use croissant_core::DispatchConfig;

use wiremock::MockServer;

/// Config pointing at `server`, with readiness timings that never settle during a test.
pub fn config_for(server: &MockServer) -> DispatchConfig {
    let mut config = DispatchConfig::default();
    config.api.base_url = format!("{}/api", server.uri());
    config.readiness.poll_interval_ms = 100;
    config.readiness.activation_after_ms = 30_000;
    config.readiness.deadline_ms = 60_000;
    config
}

/// Config whose readiness monitor settles within a few tens of milliseconds.
pub fn fast_config_for(server: &MockServer) -> DispatchConfig {
    let mut config = config_for(server);
    config.readiness.poll_interval_ms = 10;
    config.readiness.activation_after_ms = 20;
    config.readiness.deadline_ms = 50;
    config
}
