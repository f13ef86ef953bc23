//! Seams to the collaborators the studio does not own

use async_trait::async_trait;

use crate::error::{ClipboardError, FetchError};
use crate::models::{Artifact, Session};

/// Source of rendered badge artifacts
#[async_trait]
pub trait ArtifactProvider: Send + Sync {
    /// Fetch the artifact at `url` once
    ///
    /// # Returns
    /// * `Result<Artifact, FetchError>` - The raw body, or why it could not be fetched
    async fn fetch(&self, url: &str) -> Result<Artifact, FetchError>;
}

/// Write-only access to the system clipboard
pub trait ClipboardWriter: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Authentication state consumed by the store's purchase gate
pub trait SessionProvider: Send + Sync {
    /// The signed-in session, if any
    fn current_session(&self) -> Option<Session>;

    /// Kick off the OAuth sign-in flow with the given provider
    fn begin_sign_in(&self, provider: &str);
}
