//! Data models for badge configuration, derived requests and view state

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::UnknownStyle;

/// Label used when the user leaves the label field empty
pub const DEFAULT_LABEL: &str = "Views";

/// Color the form starts with
pub const DEFAULT_COLOR: &str = "#0d6efd";

/// Preset colors offered next to the free-form color input
pub const COLOR_PALETTE: [&str; 14] = [
    "#cfe2ff", "#9ec5fe", "#6ea8fe", "#3d8bfd", "#0d6efd", "#0a58ca", "#084298", "#052c65",
    "#198754", "#d1e7dd", "#7dd3fc", "#fbbf24", "#f87171", "#a855f7",
];

/// Visual style rendered by the badge service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    #[default]
    Default,
    Maple,
    Rabbit,
}

impl BadgeStyle {
    pub const ALL: [BadgeStyle; 3] = [BadgeStyle::Default, BadgeStyle::Maple, BadgeStyle::Rabbit];

    /// Value sent as `styleType` and used as the catalog id
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Maple => "maple",
            Self::Rabbit => "rabbit",
        }
    }

    /// Only the default style lets the user pick a color
    pub fn allows_custom_color(self) -> bool {
        self == Self::Default
    }
}

impl fmt::Display for BadgeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "maple" => Ok(Self::Maple),
            "rabbit" => Ok(Self::Rabbit),
            other => Err(UnknownStyle(other.to_string())),
        }
    }
}

/// Everything the user can set on the badge form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BadgeConfiguration {
    pub tracked_url: String,
    pub label: String,
    pub color: String,
    pub style: BadgeStyle,
    /// Legacy sizing; when set the request carries `fontSize` instead of `styleType`
    pub font_size: Option<u32>,
}

impl Default for BadgeConfiguration {
    fn default() -> Self {
        Self {
            tracked_url: String::new(),
            label: DEFAULT_LABEL.to_string(),
            color: DEFAULT_COLOR.to_string(),
            style: BadgeStyle::Default,
            font_size: None,
        }
    }
}

/// Request derived from a configuration, with the snippets a user copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedRequest {
    /// Lightweight endpoint, fetched for the on-screen preview
    pub preview_url: String,
    /// Final endpoint, only ever displayed and copied
    pub canonical_url: String,
    pub html_snippet: String,
    pub markdown_snippet: String,
}

impl DerivedRequest {
    /// Short stable id for log lines
    pub fn request_id(&self) -> String {
        format!("{:x}", md5::compute(&self.preview_url))
    }

    pub fn snippet(&self, kind: SnippetKind) -> &str {
        match kind {
            SnippetKind::Url => &self.canonical_url,
            SnippetKind::Markdown => &self.markdown_snippet,
            SnippetKind::Html => &self.html_snippet,
        }
    }
}

/// Which copy-and-paste snippet an action refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetKind {
    Url,
    Markdown,
    Html,
}

impl SnippetKind {
    pub const ALL: [SnippetKind; 3] = [SnippetKind::Url, SnippetKind::Markdown, SnippetKind::Html];

    pub fn title(self) -> &'static str {
        match self {
            Self::Url => "URL",
            Self::Markdown => "Markdown",
            Self::Html => "HTML",
        }
    }
}

impl FromStr for SnippetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(Self::Url),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown snippet `{other}` (expected url, markdown or html)")),
        }
    }
}

/// Rendered badge body, kept exactly as the service sent it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl Artifact {
    /// Body as markup for inline rendering
    pub fn as_svg_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Why the preview could not be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// `None` when the service could not be reached at all
    pub status: Option<u16>,
    pub message: String,
    pub preview_url: String,
}

/// Lifecycle of the on-screen preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Idle,
    Loading,
    Loaded(Artifact),
    Errored(FetchFailure),
}

impl PreviewState {
    #[cfg(test)]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationPhase {
    Entering,
    Settled,
    Exiting,
    Cleared,
}

/// The single ephemeral toast message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub phase: NotificationPhase,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    /// Whether the check icon is revealed
    pub fn shows_icon(&self) -> bool {
        self.phase == NotificationPhase::Settled
    }
}

/// Price tag of a catalog style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Price {
    Free,
    Usd(u32),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("Free"),
            Self::Usd(amount) => write!(f, "${amount}"),
        }
    }
}

/// A style listed in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleOption {
    pub style: BadgeStyle,
    pub name: String,
    pub description: String,
    pub preview_url: String,
    pub price: Price,
}

impl StyleOption {
    pub fn id(&self) -> &'static str {
        self.style.as_str()
    }

    pub fn is_purchasable(&self) -> bool {
        self.price != Price::Free
    }
}

/// Signed-in user as reported by the session provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}
