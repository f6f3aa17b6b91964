//! Fetching docs archives from URLs or the local filesystem.

use std::path::Path;
use std::time::Duration;

use ureq::Agent;

/// Error returned when an archive cannot be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, body over size limit).
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    /// Server answered with a non-success status.
    #[error("HTTP error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Reading a local archive failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Source of docs archive bytes.
///
/// Implementations must be usable from several build workers at once.
pub trait ArchiveSource: Send + Sync {
    /// Retrieve the complete archive behind `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Archive source for `http(s)://` URLs, `file://` URLs and plain paths.
pub struct UrlArchiveSource {
    agent: Agent,
    max_size: u64,
}

impl UrlArchiveSource {
    /// Create a source with the given request timeout and body size limit.
    pub fn new(timeout: Duration, max_size: u64) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self { agent, max_size }
    }

    fn fetch_http(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.agent.get(url).call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let mut body = response.into_body();
        let bytes = body.with_config().limit(self.max_size).read_to_vec()?;
        tracing::debug!(url = %url, size = bytes.len(), "Fetched docs archive");
        Ok(bytes)
    }
}

impl ArchiveSource for UrlArchiveSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        match local_path(url) {
            Some(path) => Ok(std::fs::read(path)?),
            None => self.fetch_http(url),
        }
    }
}

/// Map a `file://` URL or a scheme-less string to a filesystem path.
fn local_path(url: &str) -> Option<&Path> {
    if let Some(rest) = url.strip_prefix("file://") {
        return Some(Path::new(rest));
    }
    if url.contains("://") {
        None
    } else {
        Some(Path::new(url))
    }
}
