//! Copy-link control: puts a shareable URL for a section on the clipboard.
//!
//! Reference model of the copy-link handler in `assets/docs.js`. The script
//! keeps the same URL rule and [`COPIED_INDICATOR_MS`], and treats a missing
//! or throwing clipboard the way [`CopyLink::copy`] treats a
//! [`ClipboardError`]: logged, indicator untouched.

use std::collections::HashMap;

/// How long the "copied" indicator stays visible.
pub const COPIED_INDICATOR_MS: u64 = 2000;

/// Error returned when the clipboard rejects a write.
#[derive(Debug, thiserror::Error)]
#[error("clipboard write failed: {0}")]
pub struct ClipboardError(pub String);

/// Destination for copied links.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Build the shareable URL of a section.
///
/// Any query string or fragment already on `page_url` is dropped.
pub fn section_url(page_url: &str, anchor: &str) -> String {
    let end = page_url.find(['?', '#']).unwrap_or(page_url.len());
    format!("{}#{anchor}", &page_url[..end])
}

/// Per-anchor state of the copy buttons on one page.
#[derive(Default)]
pub struct CopyLink {
    /// Anchor to the time its indicator expires.
    copied: HashMap<String, u64>,
}

impl CopyLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the URL of `anchor` and show the indicator on success.
    ///
    /// A failed write is logged and leaves the indicator untouched.
    pub fn copy(
        &mut self,
        clipboard: &mut impl Clipboard,
        page_url: &str,
        anchor: &str,
        now: u64,
    ) -> Result<(), ClipboardError> {
        let url = section_url(page_url, anchor);
        if let Err(e) = clipboard.write_text(&url) {
            tracing::warn!(anchor, error = %e, "Failed to copy link");
            return Err(e);
        }
        self.copied
            .insert(anchor.to_owned(), now + COPIED_INDICATOR_MS);
        Ok(())
    }

    /// Whether the indicator for `anchor` is visible at `now`.
    pub fn is_copied(&self, anchor: &str, now: u64) -> bool {
        self.copied.get(anchor).is_some_and(|until| now < *until)
    }

    /// Forget indicators that have expired by `now`.
    pub fn advance(&mut self, now: u64) {
        self.copied.retain(|_, until| now < *until);
    }
}
