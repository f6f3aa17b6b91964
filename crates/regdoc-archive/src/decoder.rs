//! Streaming decoder for gzip-compressed tar archives.
//!
//! Entries are produced lazily, in archive order, from a single pass over the
//! compressed stream. The sequence cannot be restarted: a decoder yields its
//! entries once.

use std::io::Read;

use flate2::read::GzDecoder;
use tar::Archive;

/// Kind of an archive member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory, link, or any other non-regular member.
    Other,
}

/// A single archive member with its content read into memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Member path as stored in the archive.
    pub name: String,
    /// Member kind.
    pub kind: EntryKind,
    /// File content. Empty for non-file members.
    pub content: Vec<u8>,
}

/// Error returned when the archive itself cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The gzip stream or a tar header is invalid.
    #[error("archive is corrupt: {0}")]
    Corrupt(#[source] std::io::Error),
}

/// Decoder over a gzip-compressed tar byte stream.
pub struct ArchiveDecoder<R: Read> {
    archive: Archive<GzDecoder<R>>,
}

impl<R: Read> ArchiveDecoder<R> {
    /// Create a decoder reading compressed bytes from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            archive: Archive::new(GzDecoder::new(reader)),
        }
    }

    /// Start iterating the archive members.
    ///
    /// Fails if called a second time, since the underlying stream has
    /// already been consumed.
    pub fn entries(&mut self) -> Result<Entries<'_, R>, ArchiveError> {
        let inner = self.archive.entries().map_err(ArchiveError::Corrupt)?;
        Ok(Entries { inner, done: false })
    }
}

/// Lazy iterator over archive members.
///
/// A member whose content cannot be read is skipped. A broken header or
/// compression stream yields one [`ArchiveError::Corrupt`] and ends the
/// iteration.
pub struct Entries<'a, R: 'a + Read> {
    inner: tar::Entries<'a, GzDecoder<R>>,
    done: bool,
}

impl<R: Read> Iterator for Entries<'_, R> {
    type Item = Result<ArchiveEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let mut entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    self.done = true;
                    return Some(Err(ArchiveError::Corrupt(e)));
                }
            };

            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let kind = if entry.header().entry_type().is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };

            let mut content = Vec::new();
            if kind == EntryKind::File
                && let Err(e) = entry.read_to_end(&mut content)
            {
                tracing::debug!(entry = %name, error = %e, "Skipping unreadable archive entry");
                continue;
            }

            return Some(Ok(ArchiveEntry {
                name,
                kind,
                content,
            }));
        }
    }
}

/// Decode every member of a compressed archive held in memory.
///
/// # Errors
///
/// Returns [`ArchiveError::Corrupt`] if the gzip stream or any tar header is
/// invalid. Unreadable member contents are skipped, not reported.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut decoder = ArchiveDecoder::new(bytes);
    decoder.entries()?.collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;

    use super::*;

    fn gzip_tar(files: &[(&str, &[u8])]) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_reads_files_in_archive_order() {
        let bytes = gzip_tar(&[("b.binaryproto", b"second"), ("a.binaryproto", b"first")]);

        let entries = read_entries(&bytes).unwrap();

        assert_eq!(
            entries,
            vec![
                ArchiveEntry {
                    name: "b.binaryproto".to_owned(),
                    kind: EntryKind::File,
                    content: b"second".to_vec(),
                },
                ArchiveEntry {
                    name: "a.binaryproto".to_owned(),
                    kind: EntryKind::File,
                    content: b"first".to_vec(),
                },
            ]
        );
    }

    #[test]
    fn test_directories_are_other_entries() {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        builder
            .append_data(&mut header, "pkg/", std::io::empty())
            .unwrap();
        let bytes = builder.into_inner().unwrap().finish().unwrap();

        let entries = read_entries(&bytes).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, EntryKind::Other);
        assert!(entries[0].content.is_empty());
    }

    #[test]
    fn test_nested_paths_preserved() {
        let bytes = gzip_tar(&[("pkg/sub/defs.binaryproto", b"x")]);
        let entries = read_entries(&bytes).unwrap();
        assert_eq!(entries[0].name, "pkg/sub/defs.binaryproto");
    }

    #[test]
    fn test_empty_archive_has_no_entries() {
        let bytes = gzip_tar(&[]);
        assert!(read_entries(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_non_gzip_input_is_corrupt() {
        let err = read_entries(b"this is not a gzip stream").unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt(_)));
    }

    #[test]
    fn test_gzip_without_tar_is_corrupt() {
        let bytes = gzip(&[b'x'; 600]);
        let err = read_entries(&bytes).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt(_)));
    }

    #[test]
    fn test_iteration_stops_after_corruption() {
        let mut decoder = ArchiveDecoder::new(&b"garbage"[..]);
        let mut entries = decoder.entries().unwrap();
        assert!(matches!(entries.next(), Some(Err(ArchiveError::Corrupt(_)))));
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_entries_are_lazy() {
        let bytes = gzip_tar(&[("one", b"1"), ("two", b"2"), ("three", b"3")]);
        let mut decoder = ArchiveDecoder::new(bytes.as_slice());
        let first = decoder.entries().unwrap().next().unwrap().unwrap();
        assert_eq!(first.name, "one");
    }
}
