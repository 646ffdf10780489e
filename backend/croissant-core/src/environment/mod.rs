//! Environment classification from host signals.
//!
//! Hosts build one [`HostSignals`] snapshot at startup and pass it in.
//! [`detect`] never looks at process globals itself.

use crate::error::dispatch::DispatchError;

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, warn};

/// Token a native shell puts in its user agent.
pub const USER_AGENT_MARKER: &str = "Tauri";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Unknown,
    Native,
    Browser,
}

impl Environment {
    pub fn is_resolved(self) -> bool {
        self != Environment::Unknown
    }
}

/// What the host could observe about itself at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSignals {
    pub bridge_handle: bool,
    pub metadata_handle: bool,
    pub marker_flag: bool,
    pub user_agent: Option<String>,
    pub fetch_available: bool,
    pub webview_marker: bool,
    pub chrome_marker: bool,
    pub safari_marker: bool,
}

impl Default for HostSignals {
    /// A plain host: network fetch available, nothing else observed.
    fn default() -> Self {
        Self {
            bridge_handle: false,
            metadata_handle: false,
            marker_flag: false,
            user_agent: None,
            fetch_available: true,
            webview_marker: false,
            chrome_marker: false,
            safari_marker: false,
        }
    }
}

impl HostSignals {
    pub fn with_bridge_handle(mut self) -> Self {
        self.bridge_handle = true;
        self
    }

    pub fn with_metadata_handle(mut self) -> Self {
        self.metadata_handle = true;
        self
    }

    pub fn with_marker_flag(mut self) -> Self {
        self.marker_flag = true;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn without_fetch(mut self) -> Self {
        self.fetch_available = false;
        self
    }

    pub fn with_webview_marker(mut self) -> Self {
        self.webview_marker = true;
        self
    }

    pub fn with_chrome_marker(mut self) -> Self {
        self.chrome_marker = true;
        self
    }

    pub fn with_safari_marker(mut self) -> Self {
        self.safari_marker = true;
        self
    }

    fn user_agent_marked(&self) -> bool {
        self.user_agent
            .as_deref()
            .is_some_and(|ua| ua.contains(USER_AGENT_MARKER))
    }

    /// Count of strong native indicators. A missing fetch capability counts.
    pub fn native_votes(&self) -> usize {
        [
            self.bridge_handle,
            self.metadata_handle,
            self.marker_flag,
            self.user_agent_marked(),
            self.webview_marker,
            !self.fetch_available,
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    pub fn browser_votes(&self) -> usize {
        [self.chrome_marker, self.safari_marker]
            .into_iter()
            .filter(|present| *present)
            .count()
    }

    /// A live or metadata handle settles the question regardless of vendor markers.
    pub fn has_decisive_handle(&self) -> bool {
        self.bridge_handle || self.metadata_handle
    }
}

/// Outcome of classifying a [`HostSignals`] snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub environment: Environment,
    pub native_votes: usize,
    pub browser_votes: usize,
    pub ambiguous: bool,
}

/// Classify without logging.
///
/// Any native vote wins unless vendor markers contradict it; then the majority
/// decides and ties go to `Native`. A bridge or metadata handle is never
/// contradicted.
///
/// A lone user-agent or webview marker outvoted by both vendor markers
/// therefore yields `Browser`, where a plain OR of native signals would not.
pub fn assess(signals: &HostSignals) -> Detection {
    let native_votes = signals.native_votes();
    let browser_votes = signals.browser_votes();

    let (environment, ambiguous) = if native_votes == 0 {
        (Environment::Browser, false)
    } else if signals.has_decisive_handle() || browser_votes == 0 {
        (Environment::Native, false)
    } else if native_votes >= browser_votes {
        (Environment::Native, true)
    } else {
        (Environment::Browser, true)
    };

    Detection {
        environment,
        native_votes,
        browser_votes,
        ambiguous,
    }
}

/// Classify the host. Same input, same output; conflicts are logged, not raised.
pub fn detect(signals: &HostSignals) -> Environment {
    let detection = assess(signals);

    if detection.ambiguous {
        let diagnostic = DispatchError::DetectionAmbiguous {
            message: format!(
                "{} native vs {} browser signals, defaulting to {:?}",
                detection.native_votes, detection.browser_votes, detection.environment
            ),
            location: ErrorLocation::from(Location::caller()),
        };
        warn!("{diagnostic}");
    }

    debug!(
        "Environment detected: {:?} (native votes {}, browser votes {})",
        detection.environment, detection.native_votes, detection.browser_votes
    );

    detection.environment
}
