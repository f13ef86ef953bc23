//! Mutable badge configuration with change notifications
//!
//! Every setter replaces exactly one field. Subscribers are told about a change
//! only when a field actually took a new value.

use tokio::sync::watch;
use tracing::debug;

use crate::models::{BadgeConfiguration, BadgeStyle};

pub struct ConfigStore {
    tx: watch::Sender<BadgeConfiguration>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::with_configuration(BadgeConfiguration::default())
    }

    pub fn with_configuration(config: BadgeConfiguration) -> Self {
        let (tx, _rx) = watch::channel(config);
        Self { tx }
    }

    /// Receiver that is marked changed on every effective mutation
    pub fn subscribe(&self) -> watch::Receiver<BadgeConfiguration> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> BadgeConfiguration {
        self.tx.borrow().clone()
    }

    pub fn set_tracked_url(&self, tracked_url: impl Into<String>) -> bool {
        let tracked_url = tracked_url.into();
        self.replace("tracked_url", |config| {
            replace_field(&mut config.tracked_url, tracked_url)
        })
    }

    pub fn set_label(&self, label: impl Into<String>) -> bool {
        let label = label.into();
        self.replace("label", |config| replace_field(&mut config.label, label))
    }

    /// Ignored unless the current style allows a custom color
    pub fn set_color(&self, color: impl Into<String>) -> bool {
        let color = color.into();
        self.replace("color", |config| {
            if !config.style.allows_custom_color() {
                debug!("color is locked for style {}", config.style);
                return false;
            }
            replace_field(&mut config.color, color)
        })
    }

    pub fn set_style(&self, style: BadgeStyle) -> bool {
        self.replace("style", |config| replace_field(&mut config.style, style))
    }

    pub fn set_font_size(&self, font_size: Option<u32>) -> bool {
        self.replace("font_size", |config| {
            replace_field(&mut config.font_size, font_size)
        })
    }

    pub fn reset(&self) -> bool {
        self.replace("all fields", |config| {
            replace_field(config, BadgeConfiguration::default())
        })
    }

    fn replace(
        &self,
        field: &'static str,
        apply: impl FnOnce(&mut BadgeConfiguration) -> bool,
    ) -> bool {
        let changed = self.tx.send_if_modified(apply);
        if changed {
            debug!("badge configuration changed: {}", field);
        }
        changed
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_field<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_setter_touches_only_its_field() {
        let store = ConfigStore::new();
        let before = store.snapshot();

        assert!(store.set_tracked_url("https://github.com"));
        let after = store.snapshot();
        assert_eq!(after.tracked_url, "https://github.com");
        assert_eq!(after.label, before.label);
        assert_eq!(after.color, before.color);
        assert_eq!(after.style, before.style);

        assert!(store.set_label("Total Visits"));
        assert_eq!(store.snapshot().tracked_url, "https://github.com");
        assert_eq!(store.snapshot().label, "Total Visits");

        assert!(store.set_font_size(Some(14)));
        assert_eq!(store.snapshot().font_size, Some(14));
        assert_eq!(store.snapshot().label, "Total Visits");
    }

    #[test]
    fn color_is_locked_for_non_default_styles() {
        let store = ConfigStore::new();
        for style in [BadgeStyle::Maple, BadgeStyle::Rabbit] {
            store.set_style(style);
            assert!(!store.set_color("#f87171"));
            assert_eq!(store.snapshot().color, "#0d6efd");
        }

        store.set_style(BadgeStyle::Default);
        assert!(store.set_color("#f87171"));
        assert_eq!(store.snapshot().color, "#f87171");
    }

    #[test]
    fn switching_style_keeps_the_stored_color() {
        let store = ConfigStore::new();
        store.set_color("#198754");
        store.set_style(BadgeStyle::Maple);
        assert_eq!(store.snapshot().color, "#198754");
    }

    #[test]
    fn empty_tracked_url_is_accepted() {
        let store = ConfigStore::new();
        store.set_tracked_url("https://github.com");
        assert!(store.set_tracked_url(""));
        assert!(store.snapshot().tracked_url.is_empty());
    }

    #[test]
    fn subscribers_only_see_effective_changes() {
        let store = ConfigStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert!(!store.set_label("Views"));
        assert!(!rx.has_changed().unwrap());

        store.set_style(BadgeStyle::Rabbit);
        store.set_color("#000000");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().style, BadgeStyle::Rabbit);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn reset_restores_the_empty_form() {
        let store = ConfigStore::new();
        store.set_tracked_url("https://example.com");
        store.set_style(BadgeStyle::Maple);
        assert!(store.reset());
        assert_eq!(store.snapshot(), BadgeConfiguration::default());
        assert!(!store.reset());
    }
}
