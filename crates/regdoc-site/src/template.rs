//! HTML page template for a module version's docs page.
//!
//! The markup carries the `data-*` hooks `assets/docs.js` binds to: nav links
//! (`data-nav-id`), collapsible subtrees (`data-nav-children`) and copy-link
//! buttons emitted by the document renderer.

use std::fmt::Write;

use regdoc_renderer::escape_html;
use regdoc_stardoc::NavNode;

/// Where module authors learn how to publish API docs.
pub const STARDOC_GUIDE_URL: &str =
    "https://github.com/bazelbuild/bazel-central-registry/blob/main/docs/stardoc.md";

/// Entry in the version switcher.
pub struct VersionLink {
    pub version: String,
    pub href: String,
    pub is_current: bool,
    pub yank_reason: Option<String>,
}

/// All data needed to render a docs page.
pub struct PageData {
    pub module: String,
    pub version: String,
    pub versions: Vec<VersionLink>,
    pub navigation: Vec<NavNode>,
    /// Rendered documents, concatenated. Empty when the version has no docs.
    pub content_html: String,
    /// Relative path from the page to the site root, ending in `/`.
    pub asset_prefix: String,
}

/// Render a complete docs page.
pub fn render_page(page: &PageData) -> String {
    let mut html = String::with_capacity(16384);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        html,
        "<title>{} {} API docs</title>",
        escape_html(&page.module),
        escape_html(&page.version)
    );
    let _ = writeln!(
        html,
        "<link rel=\"stylesheet\" href=\"{}assets/docs.css\">",
        escape_html(&page.asset_prefix)
    );
    let _ = writeln!(
        html,
        "<script defer src=\"{}assets/docs.js\"></script>",
        escape_html(&page.asset_prefix)
    );
    html.push_str("</head>\n<body>\n");

    render_header(&mut html, page);

    html.push_str("<div class=\"docs-layout\">\n");
    if !page.navigation.is_empty() {
        render_sidebar(&mut html, &page.navigation);
    }
    html.push_str("<main class=\"docs-content\">\n");
    if page.content_html.is_empty() {
        render_empty_state(&mut html);
    } else {
        html.push_str(&page.content_html);
        html.push('\n');
    }
    html.push_str("</main>\n</div>\n");

    html.push_str("</body>\n</html>");
    html
}

fn render_header(html: &mut String, page: &PageData) {
    html.push_str("<header class=\"docs-header\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"module-name\">{}</h1>",
        escape_html(&page.module)
    );
    let _ = writeln!(
        html,
        "<p class=\"module-version\">API docs @{}</p>",
        escape_html(&page.version)
    );
    render_version_switcher(html, &page.versions);
    html.push_str("</header>\n");
}

fn render_version_switcher(html: &mut String, versions: &[VersionLink]) {
    if versions.len() < 2 {
        return;
    }
    html.push_str("<nav class=\"version-switcher\" aria-label=\"Versions\">\n<ul>\n");
    for link in versions {
        let mut classes = String::from("version-link");
        if link.is_current {
            classes.push_str(" current");
        }
        if link.yank_reason.is_some() {
            classes.push_str(" yanked");
        }
        let title = link
            .yank_reason
            .as_ref()
            .map(|reason| format!(" title=\"Yanked: {}\"", escape_html(reason)))
            .unwrap_or_default();
        let _ = writeln!(
            html,
            "<li><a href=\"{}\" class=\"{classes}\"{title}>{}</a></li>",
            escape_html(&link.href),
            escape_html(&link.version),
        );
    }
    html.push_str("</ul>\n</nav>\n");
}

fn render_sidebar(html: &mut String, items: &[NavNode]) {
    html.push_str("<aside class=\"docs-sidebar\">\n<nav aria-label=\"Contents\">\n<ul>\n");
    render_nav_items(html, items);
    html.push_str("</ul>\n</nav>\n</aside>\n");
}

/// Render navigation items recursively. Subtrees start collapsed.
fn render_nav_items(html: &mut String, items: &[NavNode]) {
    for item in items {
        let id = escape_html(&item.id);
        let _ = writeln!(
            html,
            "<li class=\"nav-item nav-level-{} nav-{}\">",
            item.level,
            item.kind.as_str()
        );

        let expander = if item.children.is_empty() {
            ""
        } else {
            " data-has-children aria-expanded=\"false\""
        };
        let _ = writeln!(
            html,
            "<a href=\"#{id}\" class=\"nav-link\" data-nav-id=\"{id}\"{expander}>{}</a>",
            escape_html(&item.label),
        );

        if !item.children.is_empty() {
            let _ = writeln!(
                html,
                "<ul class=\"nav-children\" data-nav-children=\"{id}\" hidden>"
            );
            render_nav_items(html, &item.children);
            html.push_str("</ul>\n");
        }

        html.push_str("</li>\n");
    }
}

fn render_empty_state(html: &mut String) {
    html.push_str("<div class=\"docs-empty\">\n");
    html.push_str("<h2>No API Documentation Available</h2>\n");
    html.push_str("<p>This module version does not publish Stardoc API docs.</p>\n");
    let _ = writeln!(
        html,
        "<p>Module authors can learn how to add them in the \
         <a href=\"{STARDOC_GUIDE_URL}\" target=\"_blank\" rel=\"noopener noreferrer\">\
         Stardoc guide</a>.</p>"
    );
    html.push_str("</div>\n");
}

#[cfg(test)]
mod tests {
    use regdoc_stardoc::EntityKind;

    use super::*;

    fn page(content_html: &str, navigation: Vec<NavNode>) -> PageData {
        PageData {
            module: "rules_pkg".to_owned(),
            version: "1.1.0".to_owned(),
            versions: Vec::new(),
            navigation,
            content_html: content_html.to_owned(),
            asset_prefix: "../../../".to_owned(),
        }
    }

    fn leaf(id: &str, kind: EntityKind) -> NavNode {
        NavNode {
            id: id.to_owned(),
            label: id.to_owned(),
            kind,
            level: 1,
            children: Vec::new(),
        }
    }

    #[test]
    fn render_page_contains_header_and_content() {
        let html = render_page(&page("<article>docs</article>", Vec::new()));
        assert!(html.contains("<h1 class=\"module-name\">rules_pkg</h1>"));
        assert!(html.contains("API docs @1.1.0"));
        assert!(html.contains("<article>docs</article>"));
        assert!(html.contains("<title>rules_pkg 1.1.0 API docs</title>"));
        assert!(!html.contains("No API Documentation Available"));
    }

    #[test]
    fn render_page_links_assets_relative_to_root() {
        let html = render_page(&page("<p>x</p>", Vec::new()));
        assert!(html.contains("href=\"../../../assets/docs.css\""));
        assert!(html.contains("src=\"../../../assets/docs.js\""));
    }

    #[test]
    fn render_page_empty_state() {
        let html = render_page(&page("", Vec::new()));
        assert!(html.contains("No API Documentation Available"));
        assert!(html.contains(STARDOC_GUIDE_URL));
        assert!(!html.contains("docs-sidebar"));
    }

    #[test]
    fn render_page_navigation_collapsed() {
        let navigation = vec![NavNode {
            id: "pkg-defs-bzl".to_owned(),
            label: "//pkg:defs.bzl".to_owned(),
            kind: EntityKind::File,
            level: 0,
            children: vec![leaf("rule-my_rule", EntityKind::Rule)],
        }];
        let html = render_page(&page("<p>x</p>", navigation));

        assert!(html.contains(
            "<a href=\"#pkg-defs-bzl\" class=\"nav-link\" data-nav-id=\"pkg-defs-bzl\" \
             data-has-children aria-expanded=\"false\">//pkg:defs.bzl</a>"
        ));
        assert!(html.contains(
            "<ul class=\"nav-children\" data-nav-children=\"pkg-defs-bzl\" hidden>"
        ));
        assert!(html.contains(
            "<a href=\"#rule-my_rule\" class=\"nav-link\" data-nav-id=\"rule-my_rule\">rule-my_rule</a>"
        ));
        assert!(html.contains("nav-item nav-level-1 nav-rule"));
    }

    #[test]
    fn render_page_version_switcher() {
        let mut data = page("<p>x</p>", Vec::new());
        data.versions = vec![
            VersionLink {
                version: "1.1.0".to_owned(),
                href: "../1.1.0/".to_owned(),
                is_current: true,
                yank_reason: None,
            },
            VersionLink {
                version: "1.0.0".to_owned(),
                href: "../1.0.0/".to_owned(),
                is_current: false,
                yank_reason: Some("<broken>".to_owned()),
            },
        ];
        let html = render_page(&data);
        assert!(html.contains(
            "<li><a href=\"../1.1.0/\" class=\"version-link current\">1.1.0</a></li>"
        ));
        assert!(html.contains(
            "<li><a href=\"../1.0.0/\" class=\"version-link yanked\" \
             title=\"Yanked: &lt;broken&gt;\">1.0.0</a></li>"
        ));
    }

    #[test]
    fn render_page_single_version_has_no_switcher() {
        let mut data = page("<p>x</p>", Vec::new());
        data.versions = vec![VersionLink {
            version: "1.1.0".to_owned(),
            href: "./".to_owned(),
            is_current: true,
            yank_reason: None,
        }];
        assert!(!render_page(&data).contains("version-switcher"));
    }

    #[test]
    fn render_page_escapes_module_name() {
        let mut data = page("", Vec::new());
        data.module = "<evil>".to_owned();
        let html = render_page(&data);
        assert!(html.contains("&lt;evil&gt;"));
        assert!(!html.contains("<evil>"));
    }
}
