//! Configuration → badge request derivation

use url::form_urlencoded;

use crate::models::{BadgeConfiguration, DEFAULT_LABEL, DerivedRequest};
use crate::settings::Endpoints;

/// Builds the request for a configuration, or `None` while no URL is tracked.
///
/// Both URLs carry the same query; only the endpoint path differs. Equal inputs
/// always give byte-identical output.
pub fn derive(config: &BadgeConfiguration, endpoints: &Endpoints) -> Option<DerivedRequest> {
    if config.tracked_url.is_empty() {
        return None;
    }

    let label = effective_label(config);
    let query = build_query(config);
    let preview_url = format!("{}?{}", endpoints.preview(), query);
    let canonical_url = format!("{}?{}", endpoints.canonical(), query);

    let html_snippet = format!(
        r#"<img src="{}" alt="{}" />"#,
        canonical_url,
        label.replace('"', "&quot;")
    );
    let markdown_snippet = format!("![{label}]({canonical_url})");

    Some(DerivedRequest {
        preview_url,
        canonical_url,
        html_snippet,
        markdown_snippet,
    })
}

/// Form-encoded query in the order `url, label, color, styleType|fontSize`
pub fn build_query(config: &BadgeConfiguration) -> String {
    let color = config.color.strip_prefix('#').unwrap_or(&config.color);
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("url", &config.tracked_url)
        .append_pair("label", effective_label(config))
        .append_pair("color", color);
    match config.font_size {
        Some(size) => query.append_pair("fontSize", &size.to_string()),
        None => query.append_pair("styleType", config.style.as_str()),
    };
    query.finish()
}

fn effective_label(config: &BadgeConfiguration) -> &str {
    if config.label.is_empty() {
        DEFAULT_LABEL
    } else {
        &config.label
    }
}
