use std::sync::Mutex;

use tracing::info;

use crate::models::Session;
use crate::settings::Endpoints;
use crate::traits::SessionProvider;

/// Session taken from `BADGE_SESSION_USER`; sign-in only prints where to go
pub struct EnvSessionProvider {
    user: Option<String>,
    endpoints: Endpoints,
    sign_in_requests: Mutex<Vec<String>>,
}

impl EnvSessionProvider {
    pub fn new(user: Option<String>, endpoints: Endpoints) -> Self {
        Self {
            user,
            endpoints,
            sign_in_requests: Mutex::new(Vec::new()),
        }
    }

    /// Sign-in URLs requested so far, oldest first
    #[cfg(test)]
    pub fn sign_in_requests(&self) -> Vec<String> {
        self.sign_in_requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl SessionProvider for EnvSessionProvider {
    fn current_session(&self) -> Option<Session> {
        self.user.clone().map(|user| Session { user })
    }

    fn begin_sign_in(&self, provider: &str) {
        let url = self.endpoints.sign_in(provider);
        info!("Sign-in with {} requested, continue at {}", provider, url);
        if let Ok(mut requests) = self.sign_in_requests.lock() {
            requests.push(url);
        }
    }
}
