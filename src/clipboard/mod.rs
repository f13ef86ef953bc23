use tracing::{info, warn};

use crate::error::ClipboardError;
use crate::traits::ClipboardWriter;

/// The desktop clipboard, opened fresh for every write
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Rejected(e.to_string()))
    }
}

/// Fire-and-forget copy: the outcome is logged, never returned as an error
pub fn copy_text(writer: &dyn ClipboardWriter, text: &str, what: &str) -> bool {
    match writer.write_text(text) {
        Ok(()) => {
            info!("{} copied to clipboard: {}", what, text);
            true
        }
        Err(e) => {
            warn!("Could not copy {}: {}", what, e);
            false
        }
    }
}
