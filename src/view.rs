//! Plain-text rendering of the studio panels

use std::fmt::Write as _;

use crate::models::{
    BadgeConfiguration, COLOR_PALETTE, DerivedRequest, Notification, NotificationPhase,
    PreviewState, SnippetKind, StyleOption,
};
use crate::preview::PreviewSnapshot;

pub const EMPTY_RESULT: &str = "Enter a URL to see the badge preview here";
pub const LOADING: &str = "Loading badge preview...";
pub const LOAD_FAILED: &str = "Failed to load badge preview";
pub const LOAD_FAILED_HINT: &str = "Please check if the API is running and the URL is correct.";

pub fn render_form(config: &BadgeConfiguration) -> String {
    let mut out = String::from("Create Your Badge\n");
    let _ = writeln!(out, "  URL you want to track: {}", config.tracked_url);
    let _ = writeln!(out, "  Label: {}", config.label);
    let _ = writeln!(out, "  Style: {}", config.style);
    if config.style.allows_custom_color() {
        let _ = writeln!(out, "  Color: {}", config.color);
    } else {
        let _ = writeln!(out, "  Color: {} (locked for this style)", config.color);
    }
    if let Some(size) = config.font_size {
        let _ = writeln!(out, "  Font size: {size}");
    }
    out
}

pub fn render_palette() -> String {
    COLOR_PALETTE
        .iter()
        .enumerate()
        .map(|(i, color)| format!("{i:>2} {color}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_result(derived: Option<&DerivedRequest>, state: &PreviewState) -> String {
    let Some(request) = derived else {
        return EMPTY_RESULT.to_string();
    };

    let mut out = String::from("Result\n");
    for line in state_lines(state) {
        let _ = writeln!(out, "  {line}");
    }
    out.push('\n');
    out.push_str(&render_snippets(request));
    out
}

/// One preview transition as seen by a subscriber
pub fn render_preview(snapshot: &PreviewSnapshot) -> String {
    let Some(preview_url) = snapshot.preview_url() else {
        return EMPTY_RESULT.to_string();
    };
    let mut out = format!("Preview {preview_url}");
    for line in state_lines(&snapshot.state) {
        let _ = write!(out, "\n  {line}");
    }
    out
}

pub fn render_snippets(request: &DerivedRequest) -> String {
    let mut out = String::from("Copy & paste it in your file\n");
    for kind in SnippetKind::ALL {
        let _ = writeln!(out, "  {}: {}", kind.title(), request.snippet(kind));
    }
    out
}

fn state_lines(state: &PreviewState) -> Vec<String> {
    match state {
        PreviewState::Idle => Vec::new(),
        PreviewState::Loading => vec![LOADING.to_string()],
        PreviewState::Errored(failure) => vec![
            LOAD_FAILED.to_string(),
            LOAD_FAILED_HINT.to_string(),
            failure.preview_url.clone(),
        ],
        PreviewState::Loaded(artifact) => vec![artifact.as_svg_text().trim().to_string()],
    }
}

pub fn render_toast(notification: &Notification) -> String {
    let icon = if notification.shows_icon() { '✓' } else { ' ' };
    match notification.phase {
        NotificationPhase::Exiting => format!("[{icon}] {} (fading)", notification.message),
        _ => format!("[{icon}] {}", notification.message),
    }
}

pub fn render_store(catalog: &[StyleOption]) -> String {
    let mut out = String::from("Custom Bazzi Store\nChoose your style and create a unique badge\n\n");
    for option in catalog {
        let _ = writeln!(out, "{} ({}) - {}", option.name, option.id(), option.price);
        let _ = writeln!(out, "  {}", option.description);
        let _ = writeln!(out, "  preview: {}", option.preview_url);
        if option.is_purchasable() {
            let _ = writeln!(out, "  buy {} to purchase", option.id());
        }
    }
    out.push_str("\nMore styles coming soon\n");
    out
}
