use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::clipboard::copy_text;
use crate::config_store::ConfigStore;
use crate::deriver;
use crate::models::{
    BadgeConfiguration, BadgeStyle, DerivedRequest, NotificationPhase, PreviewState, SnippetKind,
};
use crate::preview::{PreviewFetcher, PreviewSnapshot};
use crate::settings::{Endpoints, Settings};
use crate::toast::NotificationQueue;
use crate::traits::{ArtifactProvider, ClipboardWriter};

/// The badge configurator: form state, live preview and toast in one place
pub struct BadgeStudio {
    endpoints: Endpoints,
    config: ConfigStore,
    config_rx: watch::Receiver<BadgeConfiguration>,
    derived: Option<DerivedRequest>,
    preview: PreviewFetcher,
    toasts: NotificationQueue,
    clipboard: Arc<dyn ClipboardWriter>,
}

impl BadgeStudio {
    pub fn new(
        settings: &Settings,
        provider: Arc<dyn ArtifactProvider>,
        clipboard: Arc<dyn ClipboardWriter>,
    ) -> Self {
        let config = ConfigStore::new();
        let config_rx = config.subscribe();
        let mut studio = Self {
            endpoints: settings.endpoints.clone(),
            config,
            config_rx,
            derived: None,
            preview: PreviewFetcher::new(provider),
            toasts: NotificationQueue::new(settings.notifications),
            clipboard,
        };
        studio.apply(&BadgeConfiguration::default());
        studio
    }

    /// Runs `edit` against the store, then re-derives once for the whole batch
    pub fn edit<R>(&mut self, edit: impl FnOnce(&ConfigStore) -> R) -> R {
        let result = edit(&self.config);
        self.sync();
        result
    }

    pub fn set_tracked_url(&mut self, tracked_url: impl Into<String>) -> bool {
        let tracked_url = tracked_url.into();
        self.edit(|store| store.set_tracked_url(tracked_url))
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        self.edit(|store| store.set_label(label))
    }

    pub fn set_color(&mut self, color: impl Into<String>) -> bool {
        let color = color.into();
        self.edit(|store| store.set_color(color))
    }

    pub fn set_style(&mut self, style: BadgeStyle) -> bool {
        self.edit(|store| store.set_style(style))
    }

    pub fn set_font_size(&mut self, font_size: Option<u32>) -> bool {
        self.edit(|store| store.set_font_size(font_size))
    }

    pub fn configuration(&self) -> BadgeConfiguration {
        self.config.snapshot()
    }

    pub fn derived(&self) -> Option<&DerivedRequest> {
        self.derived.as_ref()
    }

    pub fn preview_state(&self) -> PreviewState {
        self.preview.state()
    }

    /// Receiver of every preview transition, starting from the current one
    pub fn subscribe_preview(&self) -> watch::Receiver<PreviewSnapshot> {
        self.preview.subscribe()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.toasts
    }

    /// Copies a snippet of the current request and confirms it with a toast
    pub fn copy(&mut self, kind: SnippetKind) -> bool {
        let Some(request) = &self.derived else {
            debug!("nothing to copy yet");
            return false;
        };
        let copied = copy_text(self.clipboard.as_ref(), request.snippet(kind), kind.title());
        if copied {
            let replaced = self.toasts.phase();
            if replaced != NotificationPhase::Cleared {
                debug!("replacing toast while {:?}", replaced);
            }
            self.toasts
                .notify(format!("{} copied to clipboard", kind.title()));
        }
        copied
    }

    /// Waits for every outstanding preview fetch
    pub async fn settle(&mut self) {
        self.preview.settle().await;
    }

    /// Tears the view down: timers stop and late fetches are ignored
    pub fn shutdown(&mut self) {
        self.toasts.dismiss();
        self.preview.abandon();
    }

    fn sync(&mut self) {
        if !self.config_rx.has_changed().unwrap_or(false) {
            return;
        }
        let config = self.config_rx.borrow_and_update().clone();
        self.apply(&config);
    }

    fn apply(&mut self, config: &BadgeConfiguration) {
        self.derived = deriver::derive(config, &self.endpoints);
        self.preview.observe(self.derived.as_ref());
    }
}

impl Drop for BadgeStudio {
    fn drop(&mut self) {
        self.shutdown();
    }
}
