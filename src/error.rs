//! Typed errors raised at the collaborator seams.
//!
//! None of these are fatal. A [`FetchError`] is folded into
//! [`PreviewState::Errored`](crate::models::PreviewState::Errored) and cleared by
//! the next configuration change; a [`ClipboardError`] is only ever logged.

use thiserror::Error;

/// Failure to obtain a badge artifact from the rendering service.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("badge service answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not read badge body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// HTTP status when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Body { .. } => None,
        }
    }
}

/// Failure to write text to the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown badge style `{0}` (expected default, maple or rabbit)")]
pub struct UnknownStyle(pub String);
