//! URL-fragment anchors for documented entities.
//!
//! [`anchor`] is the single source of ids for both the rendered sections and
//! the navigation tree. [`AnchorIndex`] assigns ids across a whole collection
//! and resolves collisions with a numeric suffix, the same way heading ids
//! are deduplicated in rendered markdown (`faq`, `faq-1`, `faq-2`).

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::collection::DocumentCollection;
use crate::model::DocumentInfo;

/// Kind of a documented entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    File,
    Function,
    Rule,
    Provider,
    Aspect,
}

impl EntityKind {
    /// Anchor prefix and serialized name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Function => "function",
            Self::Rule => "rule",
            Self::Provider => "provider",
            Self::Aspect => "aspect",
        }
    }
}

/// Compute the anchor of an entity.
///
/// Leading slashes are stripped, every character outside `[A-Za-z0-9_-]`
/// becomes `-`, and the result is lowercased. Files use the cleaned name
/// as-is; other kinds are prefixed with `{kind}-`.
///
/// A name that cleans to nothing gets a placeholder: `module` for files and
/// `{kind}-unnamed` otherwise.
pub fn anchor(kind: EntityKind, raw_name: &str) -> String {
    let cleaned: String = raw_name
        .trim_start_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    match (kind, cleaned.is_empty()) {
        (EntityKind::File, false) => cleaned,
        (EntityKind::File, true) => "module".to_owned(),
        (_, false) => format!("{}-{cleaned}", kind.as_str()),
        (_, true) => format!("{}-unnamed", kind.as_str()),
    }
}

/// Hands out unique ids, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
struct AnchorAllocator {
    taken: HashSet<String>,
    counts: HashMap<String, usize>,
}

impl AnchorAllocator {
    fn allocate(&mut self, base: String) -> String {
        if self.taken.insert(base.clone()) {
            return base;
        }
        let count = self.counts.entry(base.clone()).or_insert(0);
        loop {
            *count += 1;
            let candidate = format!("{base}-{count}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    fn allocate_all<'a>(
        &mut self,
        kind: EntityKind,
        names: impl Iterator<Item = &'a str>,
    ) -> Vec<String> {
        names.map(|name| self.allocate(anchor(kind, name))).collect()
    }
}

/// Resolved anchors of one document, parallel to its entity lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentAnchors {
    pub file: String,
    pub functions: Vec<String>,
    pub rules: Vec<String>,
    pub providers: Vec<String>,
    pub aspects: Vec<String>,
}

impl DocumentAnchors {
    /// Anchors for a document rendered on its own.
    pub fn for_document(doc: &DocumentInfo) -> Self {
        Self::allocate(doc, &mut AnchorAllocator::default())
    }

    fn allocate(doc: &DocumentInfo, allocator: &mut AnchorAllocator) -> Self {
        Self {
            file: allocator.allocate(anchor(EntityKind::File, &doc.file)),
            functions: allocator.allocate_all(
                EntityKind::Function,
                doc.functions.iter().map(|f| f.name.as_str()),
            ),
            rules: allocator
                .allocate_all(EntityKind::Rule, doc.rules.iter().map(|r| r.name.as_str())),
            providers: allocator.allocate_all(
                EntityKind::Provider,
                doc.providers.iter().map(|p| p.name.as_str()),
            ),
            aspects: allocator.allocate_all(
                EntityKind::Aspect,
                doc.aspects.iter().map(|a| a.name.as_str()),
            ),
        }
    }
}

/// Unique anchors for every entity in a collection.
///
/// Ids are assigned in collection order, so the first occurrence of a
/// colliding name keeps the plain anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnchorIndex {
    documents: Vec<DocumentAnchors>,
}

impl AnchorIndex {
    pub fn build(collection: &DocumentCollection) -> Self {
        let mut allocator = AnchorAllocator::default();
        let documents = collection
            .documents()
            .iter()
            .map(|doc| DocumentAnchors::allocate(doc, &mut allocator))
            .collect();
        Self { documents }
    }

    /// Anchors of the document at `index` in collection order.
    pub fn document(&self, index: usize) -> Option<&DocumentAnchors> {
        self.documents.get(index)
    }

    pub fn documents(&self) -> &[DocumentAnchors] {
        &self.documents
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{FunctionInfo, RuleInfo};

    #[test]
    fn test_file_anchor() {
        assert_eq!(anchor(EntityKind::File, "//pkg:defs.bzl"), "pkg-defs-bzl");
        assert_eq!(
            anchor(EntityKind::File, "pkg/defs.binaryproto"),
            "pkg-defs-binaryproto"
        );
    }

    #[test]
    fn test_leading_slash_insensitive() {
        assert_eq!(
            anchor(EntityKind::File, "//foo/bar.bzl"),
            anchor(EntityKind::File, "foo/bar.bzl")
        );
    }

    #[test]
    fn test_kind_prefix_and_lowercase() {
        assert_eq!(anchor(EntityKind::Rule, "my_rule"), "rule-my_rule");
        assert_eq!(anchor(EntityKind::Function, "Pkg.Files"), "function-pkg-files");
        assert_eq!(anchor(EntityKind::Provider, "FooInfo"), "provider-fooinfo");
        assert_eq!(anchor(EntityKind::Aspect, "a-b_c"), "aspect-a-b_c");
    }

    #[test]
    fn test_non_ascii_replaced() {
        assert_eq!(anchor(EntityKind::Rule, "réglé"), "rule-r-gl-");
    }

    #[test]
    fn test_empty_names() {
        assert_eq!(anchor(EntityKind::File, ""), "module");
        assert_eq!(anchor(EntityKind::File, "///"), "module");
        assert_eq!(anchor(EntityKind::Rule, ""), "rule-unnamed");
    }

    #[test]
    fn test_allocator_suffixes_collisions() {
        let mut allocator = AnchorAllocator::default();
        assert_eq!(allocator.allocate("rule-foo".to_owned()), "rule-foo");
        assert_eq!(allocator.allocate("rule-foo".to_owned()), "rule-foo-1");
        assert_eq!(allocator.allocate("rule-foo".to_owned()), "rule-foo-2");
    }

    #[test]
    fn test_allocator_skips_taken_suffix() {
        let mut allocator = AnchorAllocator::default();
        assert_eq!(allocator.allocate("rule-foo-1".to_owned()), "rule-foo-1");
        assert_eq!(allocator.allocate("rule-foo".to_owned()), "rule-foo");
        assert_eq!(allocator.allocate("rule-foo".to_owned()), "rule-foo-2");
    }

    #[test]
    fn test_index_resolves_case_collisions() {
        let doc = DocumentInfo {
            file: "//a:a.bzl".to_owned(),
            rules: vec![
                RuleInfo {
                    name: "Foo".to_owned(),
                    ..Default::default()
                },
                RuleInfo {
                    name: "foo".to_owned(),
                    ..Default::default()
                },
            ],
            functions: vec![FunctionInfo {
                name: "foo".to_owned(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let collection = DocumentCollection::from_documents(vec![doc]);
        let index = AnchorIndex::build(&collection);
        let anchors = index.document(0).unwrap();

        assert_eq!(anchors.file, "a-a-bzl");
        assert_eq!(anchors.functions, vec!["function-foo"]);
        assert_eq!(anchors.rules, vec!["rule-foo", "rule-foo-1"]);
    }

    #[test]
    fn test_index_unique_across_documents() {
        let docs = vec![
            DocumentInfo {
                file: "//a:x.bzl".to_owned(),
                ..Default::default()
            },
            DocumentInfo {
                file: "a/x.bzl".to_owned(),
                ..Default::default()
            },
        ];
        let collection = DocumentCollection::from_documents(docs);
        let index = AnchorIndex::build(&collection);

        let files: Vec<&str> = index.documents().iter().map(|d| d.file.as_str()).collect();
        assert_eq!(files, vec!["a-x-bzl", "a-x-bzl-1"]);
    }
}
