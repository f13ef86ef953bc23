//! Styles offered in the store

use crate::deriver;
use crate::models::{BadgeConfiguration, BadgeStyle, Price, StyleOption};
use crate::settings::Endpoints;

/// Tracked URL used to render catalog previews
const SAMPLE_URL: &str = "https://github.com";

pub fn style_catalog(endpoints: &Endpoints) -> Vec<StyleOption> {
    BadgeStyle::ALL
        .into_iter()
        .map(|style| {
            let (name, description, price) = match style {
                BadgeStyle::Default => ("Default", "Simple and clean basic style", Price::Free),
                BadgeStyle::Maple => ("Maple", "Warm maple-inspired style", Price::Usd(3)),
                BadgeStyle::Rabbit => ("Rabbit", "Cute rabbit-themed style", Price::Usd(3)),
            };
            StyleOption {
                style,
                name: name.to_string(),
                description: description.to_string(),
                preview_url: sample_preview_url(style, endpoints),
                price,
            }
        })
        .collect()
}

pub fn find_style<'a>(catalog: &'a [StyleOption], id: &str) -> Option<&'a StyleOption> {
    catalog.iter().find(|option| option.id() == id)
}

fn sample_preview_url(style: BadgeStyle, endpoints: &Endpoints) -> String {
    let sample = BadgeConfiguration {
        tracked_url: SAMPLE_URL.to_string(),
        style,
        ..BadgeConfiguration::default()
    };
    // the sample always has a tracked URL
    deriver::derive(&sample, endpoints)
        .map(|request| request.preview_url)
        .unwrap_or_default()
}
