//! HTML rendering for regdoc documentation pages.
//!
//! Two layers:
//! - [`MarkdownRenderer`]: renders docstring markdown through a
//!   [`RenderBackend`], with [`HtmlBackend`] producing the page markup
//! - [`render_document`]: lays out one Stardoc document (file header,
//!   functions, rules, providers, aspects) using the anchors resolved by
//!   `regdoc-stardoc`
//!
//! # Example
//!
//! ```
//! use regdoc_renderer::{ReferenceLinks, render_document, render_markdown};
//! use regdoc_stardoc::{DocumentAnchors, DocumentInfo};
//!
//! assert_eq!(render_markdown("**Bold** text"), "<p><strong>Bold</strong> text</p>");
//!
//! let doc = DocumentInfo {
//!     file: "//pkg:defs.bzl".to_owned(),
//!     ..Default::default()
//! };
//! let html = render_document(&doc, &DocumentAnchors::for_document(&doc), &ReferenceLinks::default())
//!     .unwrap();
//! assert!(html.contains(r#"id="pkg-defs-bzl""#));
//! ```

mod backend;
mod code_block;
mod document;
mod html;
mod renderer;
mod state;

pub use backend::RenderBackend;
pub use code_block::highlight_language;
pub use document::{
    ReferenceLinks, RenderError, attribute_type_description, attribute_type_link,
    render_document,
};
pub use html::{HtmlBackend, is_external_link};
pub use renderer::{MarkdownRenderer, render_markdown};
pub use state::escape_html;
