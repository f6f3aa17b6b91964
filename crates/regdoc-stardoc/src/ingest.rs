//! Archive ingestion: from docs archive bytes to a document collection.

use regdoc_archive::{ArchiveDecoder, ArchiveError, ArchiveSource};

use crate::collection::DocumentCollection;
use crate::decode::{decode_descriptor, is_descriptor};
use crate::model::DocumentInfo;

/// Decode every descriptor in a compressed docs archive.
///
/// Members that are not descriptors are ignored. Members that fail to
/// decode are skipped so that one bad descriptor never hides the rest.
///
/// # Errors
///
/// Returns [`ArchiveError::Corrupt`] if the archive container is invalid.
pub fn load_collection(bytes: &[u8]) -> Result<DocumentCollection, ArchiveError> {
    let mut decoder = ArchiveDecoder::new(bytes);
    let mut documents = Vec::new();

    for entry in decoder.entries()? {
        let entry = entry?;
        if !is_descriptor(&entry) {
            continue;
        }
        match decode_descriptor(&entry.content) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::debug!(entry = %entry.name, error = %e, "Skipping undecodable descriptor");
            }
        }
    }

    Ok(DocumentCollection::from_documents(documents))
}

/// Fetch and decode the docs archive at `url`.
///
/// Never fails: an unavailable or corrupt archive yields no documents and
/// a warning, so a module without usable docs still gets a page.
pub fn build_doc_page(source: &dyn ArchiveSource, url: &str) -> Vec<DocumentInfo> {
    let bytes = match source.fetch(url) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Failed to fetch docs archive");
            return Vec::new();
        }
    };

    match load_collection(&bytes) {
        Ok(collection) => {
            tracing::debug!(url = %url, documents = collection.len(), "Loaded docs archive");
            collection.into_documents()
        }
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Ignoring corrupt docs archive");
            Vec::new()
        }
    }
}
