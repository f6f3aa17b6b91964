//! Fence info parsing and highlighter language selection.

/// Language tags that have no highlighter grammar of their own.
///
/// Starlark is syntactically a Python subset, so Python highlighting is
/// used for it.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("starlark", "python"),
    ("bazel", "python"),
    ("bzl", "python"),
];

/// Extract the language tag from a fence info string.
///
/// Format: `language [attributes...]`. Returns `None` for an empty info
/// string.
pub(crate) fn fence_language(info: &str) -> Option<String> {
    info.split_whitespace().next().map(str::to_owned)
}

/// Map a fence language to the highlighter language used for it.
pub fn highlight_language(lang: &str) -> &str {
    LANGUAGE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(lang))
        .map_or(lang, |(_, target)| *target)
}
