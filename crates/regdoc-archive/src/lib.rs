//! Docs archive decoding and fetching for regdoc.
//!
//! A docs archive is a gzip-compressed tar file published alongside a module
//! version. This crate provides:
//! - [`ArchiveDecoder`]: streams entries out of the compressed archive
//! - [`ArchiveSource`]: fetches archive bytes from a URL or local path
//!
//! # Example
//!
//! ```no_run
//! use regdoc_archive::{ArchiveDecoder, EntryKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("docs.tar.gz")?;
//! let mut decoder = ArchiveDecoder::new(bytes.as_slice());
//! for entry in decoder.entries()? {
//!     let entry = entry?;
//!     if entry.kind == EntryKind::File {
//!         println!("{} ({} bytes)", entry.name, entry.content.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod decoder;
mod fetch;

pub use decoder::{ArchiveDecoder, ArchiveEntry, ArchiveError, Entries, EntryKind, read_entries};
pub use fetch::{ArchiveSource, FetchError, UrlArchiveSource};
