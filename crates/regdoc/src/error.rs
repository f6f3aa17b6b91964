//! CLI error types.

use regdoc_archive::{ArchiveError, FetchError};
use regdoc_config::ConfigError;
use regdoc_site::{BuildError, RegistryError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} module versions failed to build")]
    BuildFailed(usize),

    #[error("{0}")]
    Validation(String),
}
