// Unit tests for config validation and flag parsing

use crate::API_BASE;
use crate::config::{DispatchConfig, parse_flag};
use crate::error::ConfigError;

#[test]
fn given_default_config_when_validated_then_ok() {
    let config = DispatchConfig::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.api.base_url, API_BASE);
    assert_eq!(API_BASE, "http://localhost:3001/api");
}

#[test]
fn given_truthy_and_falsy_values_when_parsed_then_flag_matches() {
    for truthy in ["1", "true", "TRUE", " yes ", "on"] {
        assert_eq!(parse_flag(truthy), Some(true), "{truthy}");
    }
    for falsy in ["0", "false", "No", "", "off"] {
        assert_eq!(parse_flag(falsy), Some(false), "{falsy}");
    }
}

/// **BUG THIS CATCHES**: Would catch a typo like `ture` quietly disabling the override.
#[test]
fn given_unrecognised_value_when_parsed_then_none() {
    for garbage in ["maybe", "ture", "2", "y e s"] {
        assert_eq!(parse_flag(garbage), None, "{garbage}");
    }
}

/// **VALUE**: Each invalid field is rejected on its own.
///
/// **BUG THIS CATCHES**: Would catch a validation rule that short-circuits on an
/// earlier field and never checks later ones.
#[test]
fn given_single_invalid_field_when_validated_then_validation_error() {
    let mutations: [fn(&mut DispatchConfig); 7] = [
        |c| c.version = 0,
        |c| c.version = 99,
        |c| c.api.base_url = String::new(),
        |c| c.api.base_url = "localhost:3001/api".to_string(),
        |c| c.api.request_timeout_secs = 0,
        |c| c.readiness.poll_interval_ms = 0,
        |c| c.readiness.deadline_ms = c.readiness.activation_after_ms,
    ];

    for (index, mutate) in mutations.into_iter().enumerate() {
        let mut config = DispatchConfig::default();
        mutate(&mut config);

        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "mutation #{index} should be rejected"
        );
    }
}

#[test]
fn given_poll_longer_than_activation_when_validated_then_rejected() {
    let mut config = DispatchConfig::default();
    config.readiness.poll_interval_ms = 2_000;

    assert!(config.validate().is_err());
}
