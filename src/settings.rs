//! Environment-driven settings
//!
//! Everything has a working default, so the studio runs without any `.env`.
//! Values that fail to parse are reported and replaced by their default.

use std::time::Duration;

use tracing::warn;

pub const DEFAULT_API_BASE: &str = "https://bazzi-server-464152216340.asia-northeast3.run.app";
pub const DEFAULT_PREVIEW_PATH: &str = "/api/badges/preview";
pub const DEFAULT_FINAL_PATH: &str = "/api/badges";

/// Where badges are rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base: String,
    pub preview_path: String,
    pub final_path: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE.to_string(),
            preview_path: DEFAULT_PREVIEW_PATH.to_string(),
            final_path: DEFAULT_FINAL_PATH.to_string(),
        }
    }
}

impl Endpoints {
    pub fn preview(&self) -> String {
        format!("{}{}", self.base, self.preview_path)
    }

    pub fn canonical(&self) -> String {
        format!("{}{}", self.base, self.final_path)
    }

    pub fn sign_in(&self, provider: &str) -> String {
        format!("{}/api/auth/signin/{}", self.base, urlencoding::encode(provider))
    }
}

/// Phase durations of the toast lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTimings {
    /// Entering until the icon is revealed
    pub settle: Duration,
    /// Entering until the toast starts to leave
    pub visible: Duration,
    /// Exiting until the slot is cleared
    pub exit: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(200),
            visible: Duration::from_millis(2500),
            exit: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoints: Endpoints,
    pub fetch_timeout: Duration,
    pub notifications: NotificationTimings,
    pub session_user: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            fetch_timeout: Duration::from_secs(10),
            notifications: NotificationTimings::default(),
            session_user: None,
        }
    }
}

impl Settings {
    /// Reads `BADGE_*` variables from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| fallback.to_string())
        };
        let millis = |key: &str, fallback: Duration| match lookup(key) {
            None => fallback,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!("{} is not a number of milliseconds ({:?}), using default", key, raw);
                    fallback
                }
            },
        };

        let endpoints = Endpoints {
            base: text("BADGE_API_BASE", &defaults.endpoints.base)
                .trim_end_matches('/')
                .to_string(),
            preview_path: text("BADGE_PREVIEW_PATH", &defaults.endpoints.preview_path),
            final_path: text("BADGE_FINAL_PATH", &defaults.endpoints.final_path),
        };

        let fetch_timeout = match lookup("BADGE_FETCH_TIMEOUT_SECS") {
            None => defaults.fetch_timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!("BADGE_FETCH_TIMEOUT_SECS is not a number ({:?}), using default", raw);
                    defaults.fetch_timeout
                }
            },
        };

        let notifications = NotificationTimings {
            settle: millis("BADGE_TOAST_SETTLE_MS", defaults.notifications.settle),
            visible: millis("BADGE_TOAST_VISIBLE_MS", defaults.notifications.visible),
            exit: millis("BADGE_TOAST_EXIT_MS", defaults.notifications.exit),
        };

        let session_user = lookup("BADGE_SESSION_USER")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            endpoints,
            fetch_timeout,
            notifications,
            session_user,
        }
    }
}
