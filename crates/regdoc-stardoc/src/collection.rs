//! Ordered collection of decoded documents.

use serde::{Deserialize, Serialize};

use crate::model::DocumentInfo;

/// Documents of one module version, sorted ascending by file.
///
/// The order depends only on document content, never on the order entries
/// appeared in the archive. Documents sharing a file are all kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentCollection {
    documents: Vec<DocumentInfo>,
}

impl DocumentCollection {
    /// Build a collection, sorting `documents` by file.
    pub fn from_documents(mut documents: Vec<DocumentInfo>) -> Self {
        // Full ordering as tiebreak so duplicate files still sort deterministically
        documents.sort_by(|a, b| a.file.cmp(&b.file).then_with(|| a.cmp(b)));
        Self { documents }
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_documents(self) -> Vec<DocumentInfo> {
        self.documents
    }
}

impl FromIterator<DocumentInfo> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = DocumentInfo>>(iter: I) -> Self {
        Self::from_documents(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a DocumentInfo;
    type IntoIter = std::slice::Iter<'a, DocumentInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(file: &str, docstring: Option<&str>) -> DocumentInfo {
        DocumentInfo {
            file: file.to_owned(),
            module_docstring: docstring.map(str::to_owned),
            ..Default::default()
        }
    }

    fn files(collection: &DocumentCollection) -> Vec<&str> {
        collection.documents().iter().map(|d| d.file.as_str()).collect()
    }

    #[test]
    fn test_sorted_by_file() {
        let collection = DocumentCollection::from_documents(vec![
            doc("//c:c.bzl", None),
            doc("//a:a.bzl", None),
            doc("//b:b.bzl", None),
        ]);
        assert_eq!(files(&collection), vec!["//a:a.bzl", "//b:b.bzl", "//c:c.bzl"]);
    }

    #[test]
    fn test_duplicate_files_kept_in_stable_order() {
        let forward = DocumentCollection::from_documents(vec![
            doc("//a:a.bzl", Some("second")),
            doc("//a:a.bzl", Some("first")),
        ]);
        let reverse = DocumentCollection::from_documents(vec![
            doc("//a:a.bzl", Some("first")),
            doc("//a:a.bzl", Some("second")),
        ]);
        assert_eq!(forward.len(), 2);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_empty() {
        let collection = DocumentCollection::default();
        assert!(collection.is_empty());
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn test_serializes_as_array() {
        let collection: DocumentCollection = vec![doc("//a:a.bzl", None)].into_iter().collect();
        let json = serde_json::to_string(&collection).unwrap();
        assert!(json.starts_with('['));
        let back: DocumentCollection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, collection);
    }
}
