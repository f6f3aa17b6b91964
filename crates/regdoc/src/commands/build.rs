//! `regdoc build` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use regdoc_archive::UrlArchiveSource;
use regdoc_config::{CliSettings, Config};
use regdoc_site::{LocalRegistry, StaticSiteBuilder};

use super::reference_links;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover regdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local registry checkout (overrides config).
    #[arg(short, long)]
    registry: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Module to build. Repeat for several; default is every module.
    #[arg(short, long = "module")]
    modules: Vec<String>,

    /// Archive download timeout in seconds (overrides config).
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            registry_path: self.registry,
            output_dir: self.output_dir,
            modules: (!self.modules.is_empty()).then_some(self.modules),
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let output_dir = config.build_resolved.output_dir.clone();
        output.setting("Registry", &config.registry_resolved.path.display());
        output.setting("Output", &output_dir.display());

        let registry = LocalRegistry::new(&config.registry_resolved.path);
        let source = UrlArchiveSource::new(
            Duration::from_secs(config.fetch.timeout_secs),
            config.fetch.max_archive_size,
        );
        let builder = StaticSiteBuilder::new(&registry, &source, output_dir.clone())
            .with_links(reference_links(&config.links));

        let report = builder.build(&config.build_resolved.modules)?;

        output.build_report(&report, &output_dir);
        if !report.failures.is_empty() {
            return Err(CliError::BuildFailed(report.failures.len()));
        }
        Ok(())
    }
}
