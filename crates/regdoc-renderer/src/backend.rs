//! Render backend trait for format-specific rendering.

/// Backend trait for format-specific rendering operations.
///
/// The generic renderer handles structure (paragraphs, lists, tables,
/// inline formatting). Elements whose markup depends on the target are
/// delegated here.
pub trait RenderBackend {
    /// Render a fenced or indented code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Language tag from the fence, if any
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render a link opening tag for `href`.
    fn link_start(href: &str, title: &str, out: &mut String);

    /// Render a link closing tag.
    fn link_end(out: &mut String) {
        out.push_str("</a>");
    }

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    /// Render a hard break.
    ///
    /// Default uses `<br>`.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Render a task list marker.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
