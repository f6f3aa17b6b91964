//! HTML backend for markdown rendering.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::backend::RenderBackend;
use crate::code_block::highlight_language;
use crate::state::escape_html;

static SCHEME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

static THEME: LazyLock<Theme> = LazyLock::new(|| {
    ThemeSet::load_defaults()
        .themes
        .remove("InspiredGitHub")
        .unwrap_or_default()
});

/// Whether a link leaves the current site.
///
/// Any URL with a scheme (`https:`, `mailto:`, `tel:`) or a protocol-relative
/// `//` prefix is external. Fragments, relative paths and absolute paths stay
/// on the site.
pub fn is_external_link(href: &str) -> bool {
    href.starts_with("//") || SCHEME_PATTERN.is_match(href)
}

/// Highlight `content` as `lang`, one styled line at a time.
///
/// Returns `None` when no grammar matches the language.
fn highlight(lang: &str, content: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_by_token(lang)?;
    let mut highlighter = HighlightLines::new(syntax, &THEME);
    let mut html = String::new();
    for line in LinesWithEndings::from(content) {
        let regions = highlighter.highlight_line(line, &SYNTAXES).ok()?;
        html.push_str(&styled_line_to_highlighted_html(&regions, IncludeBackground::No).ok()?);
    }
    Some(html)
}

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<pre><code class="language-*">` code blocks, highlighted inline with styled spans
/// - `target="_blank"` and `rel="noopener noreferrer"` on external links
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        let content = content.strip_suffix('\n').unwrap_or(content);
        let Some(lang) = lang else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
            return;
        };
        let lang = highlight_language(lang);
        let body = highlight(lang, content).unwrap_or_else(|| escape_html(content));
        write!(
            out,
            r#"<pre><code class="language-{}">{body}</code></pre>"#,
            escape_html(lang)
        )
        .unwrap();
    }

    fn link_start(href: &str, title: &str, out: &mut String) {
        write!(out, r#"<a href="{}""#, escape_html(href)).unwrap();
        if !title.is_empty() {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        if is_external_link(href) {
            out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
        }
        out.push('>');
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn strip_tags(html: &str) -> String {
        let mut text = String::new();
        let mut in_tag = false;
        for ch in html.chars() {
            match ch {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => text.push(ch),
                _ => {}
            }
        }
        text
    }

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}\n", &mut out);
        assert!(out.starts_with(r#"<pre><code class="language-rust">"#));
        assert!(out.ends_with("</code></pre>"));
        assert!(out.contains("<span style="));
        assert_eq!(strip_tags(&out), "fn main() {}");
    }

    #[test]
    fn test_code_block_starlark_uses_python() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("starlark"), "load(\"//:defs.bzl\", \"x\")", &mut out);
        assert!(out.starts_with(r#"<pre><code class="language-python">"#));
        assert!(out.contains("<span style="));
        assert_eq!(
            strip_tags(&out),
            "load(&quot;//:defs.bzl&quot;, &quot;x&quot;)"
        );
    }

    #[test]
    fn test_code_block_highlight_escapes_markup() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("python"), "if a < b:\n    pass\n", &mut out);
        assert!(!out.contains("a < b"));
        assert_eq!(strip_tags(&out), "if a &lt; b:\n    pass");
    }

    #[test]
    fn test_code_block_unknown_language_is_plain() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("no-such-lang"), "x <y>\n", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-no-such-lang">x &lt;y&gt;</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "plain <code>", &mut out);
        assert_eq!(out, "<pre><code>plain &lt;code&gt;</code></pre>");
    }

    #[test]
    fn test_external_links() {
        assert!(is_external_link("https://bazel.build"));
        assert!(is_external_link("http://example.com/a"));
        assert!(is_external_link("//example.com/a"));
        assert!(is_external_link("ftp://files.example.com"));
        assert!(!is_external_link("#rule-foo"));
        assert!(!is_external_link("/docs/rules_go"));
        assert!(!is_external_link("other.md"));
        assert!(!is_external_link("docs/rules.md#rule-foo"));
        assert!(is_external_link("mailto:dev@example.com"));
        assert!(is_external_link("tel:+15550100"));
    }

    #[test]
    fn test_link_start_external() {
        let mut out = String::new();
        HtmlBackend::link_start("https://bazel.build", "", &mut out);
        assert_eq!(
            out,
            r#"<a href="https://bazel.build" target="_blank" rel="noopener noreferrer">"#
        );
    }

    #[test]
    fn test_link_start_internal_with_title() {
        let mut out = String::new();
        HtmlBackend::link_start("#rule-foo", "Foo rule", &mut out);
        assert_eq!(out, r##"<a href="#rule-foo" title="Foo rule">"##);
    }

    #[test]
    fn test_link_start_mailto_is_external() {
        let mut out = String::new();
        HtmlBackend::link_start("mailto:dev@example.com", "", &mut out);
        assert_eq!(
            out,
            r#"<a href="mailto:dev@example.com" target="_blank" rel="noopener noreferrer">"#
        );
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        HtmlBackend::image("image.png", "Alt text", "", &mut out);
        assert_eq!(out, r#"<img src="image.png" alt="Alt text">"#);
    }
}
