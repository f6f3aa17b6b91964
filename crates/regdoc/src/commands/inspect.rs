//! `regdoc inspect` command implementation.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use regdoc_archive::{ArchiveSource, UrlArchiveSource};
use regdoc_config::Config;
use regdoc_site::{LocalRegistry, ModuleRegistry, select_version};
use regdoc_stardoc::{AnchorIndex, DocumentCollection, build_navigation, load_collection};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    /// Docs archive URL or path.
    #[arg(required_unless_present = "module")]
    source: Option<String>,

    /// Resolve the archive from the registry for this module instead.
    #[arg(short, long, conflicts_with = "source")]
    module: Option<String>,

    /// Module version to resolve (default: latest).
    #[arg(long = "module-version", value_name = "VERSION", requires = "module")]
    module_version: Option<String>,

    /// Print the navigation tree instead of the documents.
    #[arg(long)]
    nav: bool,

    /// Path to configuration file (default: auto-discover regdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl InspectArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let url = match (&self.source, &self.module) {
            (Some(source), _) => source.clone(),
            (None, Some(module)) => {
                let registry = LocalRegistry::new(&config.registry_resolved.path);
                resolve_docs_url(&registry, module, self.module_version.as_deref())?
            }
            (None, None) => {
                return Err(CliError::Validation(
                    "either an archive or --module is required".to_owned(),
                ));
            }
        };
        output.setting("Archive", &url);

        let source = UrlArchiveSource::new(
            Duration::from_secs(config.fetch.timeout_secs),
            config.fetch.max_archive_size,
        );
        let bytes = source.fetch(&url)?;
        let collection = load_collection(&bytes)?;
        output.archive_summary(&collection);

        let json = to_json(&collection, self.nav)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        Ok(())
    }
}

/// Look up the docs archive of a module version in the registry.
fn resolve_docs_url(
    registry: &dyn ModuleRegistry,
    module: &str,
    version: Option<&str>,
) -> Result<String, CliError> {
    let versions: Vec<String> = registry
        .versions(module)?
        .into_iter()
        .map(|v| v.version)
        .collect();

    let Some(selected) = select_version(&versions, version) else {
        return Err(CliError::Validation(match version {
            Some(v) => format!("{module} has no version {v}"),
            None => format!("{module} has no versions"),
        }));
    };

    registry.docs_url(module, selected)?.ok_or_else(|| {
        CliError::Validation(format!("{module}@{selected} publishes no docs archive"))
    })
}

/// Pretty JSON of the documents, or of their navigation tree.
fn to_json(collection: &DocumentCollection, nav: bool) -> Result<String, serde_json::Error> {
    if nav {
        let anchors = AnchorIndex::build(collection);
        serde_json::to_string_pretty(&build_navigation(collection, &anchors))
    } else {
        serde_json::to_string_pretty(collection)
    }
}
