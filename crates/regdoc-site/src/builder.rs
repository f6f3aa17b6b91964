//! Static site builder: one docs page per module version.
//!
//! Output layout under the output directory:
//!
//! ```text
//! assets/docs.css
//! assets/docs.js
//! docs/<module>/index.html            latest version
//! docs/<module>/<version>/index.html
//! docs/<module>/<version>/docs.json   normalized documents
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regdoc_archive::ArchiveSource;
use regdoc_renderer::{ReferenceLinks, RenderError, render_document};
use regdoc_stardoc::{AnchorIndex, DocumentCollection, NavNode, build_doc_page, build_navigation};

use crate::registry::{ModuleRegistry, ModuleVersion, RegistryError};
use crate::template::{PageData, VersionLink, render_page};

/// Stylesheet shared by every page.
pub const DOCS_CSS: &str = include_str!("../assets/docs.css");

/// Browser binding of the navigation controller and copy-link buttons.
pub const DOCS_JS: &str = include_str!("../assets/docs.js");

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Module {0} has no versions")]
    NoVersions(String),

    #[error("Invalid module or version name: {0:?}")]
    InvalidName(String),
}

/// Outcome of building one version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionReport {
    pub version: String,
    /// Number of documents on the page. Zero means the empty-state page.
    pub documents: usize,
}

/// Outcome of building one module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleReport {
    pub module: String,
    pub versions: Vec<VersionReport>,
}

/// A module or version that failed to build.
#[derive(Debug)]
pub struct BuildFailure {
    pub module: String,
    pub version: Option<String>,
    pub error: BuildError,
}

/// Summary of a site build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub modules: Vec<ModuleReport>,
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    /// Total number of pages written, excluding latest-version aliases.
    pub fn page_count(&self) -> usize {
        self.modules.iter().map(|m| m.versions.len()).sum()
    }
}

/// Where a page sits relative to the module directory.
#[derive(Clone, Copy)]
enum PageLocation {
    /// `docs/<module>/index.html`
    Module,
    /// `docs/<module>/<version>/index.html`
    Version,
}

impl PageLocation {
    fn asset_prefix(self) -> &'static str {
        match self {
            Self::Module => "../../",
            Self::Version => "../../../",
        }
    }

    fn version_href(self, version: &str) -> String {
        match self {
            Self::Module => format!("{version}/"),
            Self::Version => format!("../{version}/"),
        }
    }
}

/// Rendered body of one version, before it is wrapped in a page.
struct RenderedVersion {
    version: String,
    documents: usize,
    navigation: Vec<NavNode>,
    content_html: String,
}

/// Builds the static docs site from registry metadata and docs archives.
pub struct StaticSiteBuilder<'a> {
    registry: &'a dyn ModuleRegistry,
    source: &'a dyn ArchiveSource,
    links: ReferenceLinks,
    output_dir: PathBuf,
}

impl<'a> StaticSiteBuilder<'a> {
    pub fn new(
        registry: &'a dyn ModuleRegistry,
        source: &'a dyn ArchiveSource,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            registry,
            source,
            links: ReferenceLinks::default(),
            output_dir: output_dir.into(),
        }
    }

    /// Set the reference documentation linked from attribute types.
    #[must_use]
    pub fn with_links(mut self, links: ReferenceLinks) -> Self {
        self.links = links;
        self
    }

    /// Build every module in `modules`, or every registry module if empty.
    ///
    /// Failures of single modules or versions are collected in the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the shared assets cannot be written or the module
    /// list cannot be read from the registry.
    pub fn build(&self, modules: &[String]) -> Result<BuildReport, BuildError> {
        self.write_assets()?;

        let modules = if modules.is_empty() {
            self.registry.module_names()?
        } else {
            modules.to_vec()
        };

        let mut report = BuildReport::default();
        for module in &modules {
            match self.build_module(module, &mut report.failures) {
                Ok(module_report) => report.modules.push(module_report),
                Err(error) => {
                    tracing::warn!(module = %module, error = %error, "Failed to build module");
                    report.failures.push(BuildFailure {
                        module: module.clone(),
                        version: None,
                        error,
                    });
                }
            }
        }

        tracing::info!(
            modules = report.modules.len(),
            pages = report.page_count(),
            failures = report.failures.len(),
            "Site build finished"
        );
        Ok(report)
    }

    /// Write `assets/docs.css` and `assets/docs.js`.
    pub fn write_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.output_dir.join("assets");
        fs::create_dir_all(&assets_dir)?;
        fs::write(assets_dir.join("docs.css"), DOCS_CSS)?;
        fs::write(assets_dir.join("docs.js"), DOCS_JS)?;
        Ok(())
    }

    /// Build all versions of one module in parallel.
    ///
    /// Version failures are appended to `failures`; the module still
    /// succeeds with the versions that built.
    fn build_module(
        &self,
        module: &str,
        failures: &mut Vec<BuildFailure>,
    ) -> Result<ModuleReport, BuildError> {
        check_name(module)?;
        let versions = self.registry.versions(module)?;
        let Some(latest) = versions.first() else {
            return Err(BuildError::NoVersions(module.to_owned()));
        };

        let results: Vec<(String, Result<RenderedVersion, BuildError>)> = versions
            .par_iter()
            .map(|v| (v.version.clone(), self.build_version(module, v, &versions)))
            .collect();

        let mut built = Vec::with_capacity(results.len());
        for (version, result) in results {
            match result {
                Ok(rendered) => built.push(rendered),
                Err(error) => {
                    tracing::warn!(
                        module,
                        version = %version,
                        error = %error,
                        "Failed to build version"
                    );
                    failures.push(BuildFailure {
                        module: module.to_owned(),
                        version: Some(version),
                        error,
                    });
                }
            }
        }

        if let Some(rendered) = built.iter().find(|r| r.version == latest.version) {
            let html = self.page(module, rendered, &versions, PageLocation::Module);
            fs::write(self.module_dir(module).join("index.html"), html)?;
        }

        Ok(ModuleReport {
            module: module.to_owned(),
            versions: built
                .into_iter()
                .map(|r| VersionReport {
                    version: r.version,
                    documents: r.documents,
                })
                .collect(),
        })
    }

    /// Ingest, render and write one version.
    fn build_version(
        &self,
        module: &str,
        version: &ModuleVersion,
        versions: &[ModuleVersion],
    ) -> Result<RenderedVersion, BuildError> {
        check_name(&version.version)?;

        let documents = match self.registry.docs_url(module, &version.version)? {
            Some(url) => build_doc_page(self.source, &url),
            None => Vec::new(),
        };
        let collection = DocumentCollection::from_documents(documents);
        let anchors = AnchorIndex::build(&collection);

        let mut content_html = String::new();
        for (doc, doc_anchors) in collection.documents().iter().zip(anchors.documents()) {
            content_html.push_str(&render_document(doc, doc_anchors, &self.links)?);
            content_html.push('\n');
        }

        let rendered = RenderedVersion {
            version: version.version.clone(),
            documents: collection.len(),
            navigation: build_navigation(&collection, &anchors),
            content_html,
        };

        let dir = self.module_dir(module).join(&version.version);
        fs::create_dir_all(&dir)?;
        fs::write(
            dir.join("docs.json"),
            serde_json::to_string_pretty(&collection)?,
        )?;
        fs::write(
            dir.join("index.html"),
            self.page(module, &rendered, versions, PageLocation::Version),
        )?;

        tracing::debug!(
            module,
            version = %version.version,
            documents = rendered.documents,
            "Built version page"
        );
        Ok(rendered)
    }

    fn page(
        &self,
        module: &str,
        rendered: &RenderedVersion,
        versions: &[ModuleVersion],
        location: PageLocation,
    ) -> String {
        let version_links = versions
            .iter()
            .map(|v| VersionLink {
                version: v.version.clone(),
                href: location.version_href(&v.version),
                is_current: v.version == rendered.version,
                yank_reason: v.yank_reason.clone(),
            })
            .collect();

        render_page(&PageData {
            module: module.to_owned(),
            version: rendered.version.clone(),
            versions: version_links,
            navigation: rendered.navigation.clone(),
            content_html: rendered.content_html.clone(),
            asset_prefix: location.asset_prefix().to_owned(),
        })
    }

    fn module_dir(&self, module: &str) -> PathBuf {
        self.output_dir.join("docs").join(module)
    }

    /// Output directory the site is written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Module and version names become path components.
fn check_name(name: &str) -> Result<(), BuildError> {
    if name.is_empty() || name == "." || name.contains("..") || name.contains(['/', '\\']) {
        return Err(BuildError::InvalidName(name.to_owned()));
    }
    Ok(())
}
