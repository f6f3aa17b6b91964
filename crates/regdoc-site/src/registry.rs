//! Registry metadata: which modules exist, their versions, and where each
//! version publishes its docs archive.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Error returned when registry metadata cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One published version of a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleVersion {
    pub version: String,
    /// Reason the version was yanked, if it was.
    pub yank_reason: Option<String>,
}

/// Read access to registry metadata.
pub trait ModuleRegistry: Send + Sync {
    /// Names of every module in the registry, sorted.
    fn module_names(&self) -> Result<Vec<String>, RegistryError>;

    /// Versions of `module`, latest first.
    fn versions(&self, module: &str) -> Result<Vec<ModuleVersion>, RegistryError>;

    /// Docs archive URL published for one version, if any.
    fn docs_url(&self, module: &str, version: &str) -> Result<Option<String>, RegistryError>;
}

#[derive(Deserialize)]
struct MetadataJson {
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    yanked_versions: HashMap<String, String>,
}

#[derive(Deserialize)]
struct SourceJson {
    #[serde(default)]
    docs_url: Option<String>,
}

/// Registry backed by a local checkout.
///
/// Layout: `modules/<module>/metadata.json` lists versions and
/// `modules/<module>/<version>/source.json` may carry a `docs_url`.
pub struct LocalRegistry {
    modules_dir: PathBuf,
}

impl LocalRegistry {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            modules_dir: root.as_ref().join("modules"),
        }
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| RegistryError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ModuleRegistry for LocalRegistry {
    fn module_names(&self) -> Result<Vec<String>, RegistryError> {
        let entries = fs::read_dir(&self.modules_dir).map_err(|source| RegistryError::Io {
            path: self.modules_dir.clone(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join("metadata.json").is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    fn versions(&self, module: &str) -> Result<Vec<ModuleVersion>, RegistryError> {
        let path = self.modules_dir.join(module).join("metadata.json");
        if !path.is_file() {
            return Err(RegistryError::ModuleNotFound(module.to_owned()));
        }

        let mut metadata: MetadataJson = Self::read_json(&path)?;
        let versions = sort_versions(metadata.versions)
            .into_iter()
            .map(|version| ModuleVersion {
                yank_reason: metadata.yanked_versions.remove(&version),
                version,
            })
            .collect();
        Ok(versions)
    }

    fn docs_url(&self, module: &str, version: &str) -> Result<Option<String>, RegistryError> {
        let path = self
            .modules_dir
            .join(module)
            .join(version)
            .join("source.json");
        if !path.is_file() {
            tracing::debug!(module, version, "No source.json for version");
            return Ok(None);
        }

        let source: SourceJson = Self::read_json(&path)?;
        Ok(source.docs_url.filter(|url| !url.is_empty()))
    }
}

/// Sort versions latest first.
///
/// Dot-separated components compare numerically when both are numbers and
/// lexically otherwise. A pre-release (`1.0.0-rc1`) sorts below its release.
pub fn sort_versions(mut versions: Vec<String>) -> Vec<String> {
    versions.sort_by(|a, b| compare_versions(b, a));
    versions
}

/// Pick the requested version, or the latest when none is requested.
///
/// `versions` must already be sorted latest first. Returns `None` when the
/// list is empty or the requested version is not in it.
pub fn select_version<'a>(versions: &'a [String], requested: Option<&str>) -> Option<&'a str> {
    match requested {
        Some(wanted) => versions
            .iter()
            .find(|v| v.as_str() == wanted)
            .map(String::as_str),
        None => versions.first().map(String::as_str),
    }
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_release, a_pre) = split_prerelease(a);
    let (b_release, b_pre) = split_prerelease(b);

    compare_components(a_release, b_release).then_with(|| match (a_pre, b_pre) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a_pre), Some(b_pre)) => compare_components(a_pre, b_pre),
    })
}

fn split_prerelease(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((release, pre)) => (release, Some(pre)),
        None => (version, None),
    }
}

fn compare_components(a: &str, b: &str) -> Ordering {
    let mut a_parts = a.split(['.', '-']);
    let mut b_parts = b.split(['.', '-']);
    loop {
        match (a_parts.next(), b_parts.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => x.cmp(y),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_sort_versions_numeric() {
        assert_eq!(
            sort_versions(strings(&["1.2.0", "1.10.0", "1.9.1", "0.5"])),
            strings(&["1.10.0", "1.9.1", "1.2.0", "0.5"])
        );
    }

    #[test]
    fn test_sort_versions_prerelease_below_release() {
        assert_eq!(
            sort_versions(strings(&["2.0.0-rc1", "1.9.0", "2.0.0", "2.0.0-rc2"])),
            strings(&["2.0.0", "2.0.0-rc2", "2.0.0-rc1", "1.9.0"])
        );
    }

    #[test]
    fn test_sort_versions_registry_suffix() {
        assert_eq!(
            sort_versions(strings(&["1.0.0", "1.0.0.bcr.1", "1.0.0.bcr.2"])),
            strings(&["1.0.0.bcr.2", "1.0.0.bcr.1", "1.0.0"])
        );
    }

    #[test]
    fn test_select_version() {
        let versions = strings(&["2.0.0", "1.0.0"]);
        assert_eq!(select_version(&versions, None), Some("2.0.0"));
        assert_eq!(select_version(&versions, Some("1.0.0")), Some("1.0.0"));
        assert_eq!(select_version(&versions, Some("3.0.0")), None);
        assert_eq!(select_version(&[], None), None);
    }

    #[test]
    fn test_local_registry() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "modules/rules_pkg/metadata.json",
            r#"{"versions": ["1.0.0", "1.1.0"], "yanked_versions": {"1.0.0": "broken"}}"#,
        );
        write(
            dir.path(),
            "modules/rules_pkg/1.1.0/source.json",
            r#"{"url": "https://example.com/src.tar.gz", "docs_url": "https://example.com/docs.tar.gz"}"#,
        );
        write(
            dir.path(),
            "modules/rules_pkg/1.0.0/source.json",
            r#"{"url": "https://example.com/src.tar.gz"}"#,
        );
        write(dir.path(), "modules/apple/metadata.json", r#"{"versions": []}"#);
        fs::create_dir_all(dir.path().join("modules/not_a_module")).unwrap();

        let registry = LocalRegistry::new(dir.path());

        assert_eq!(registry.module_names().unwrap(), strings(&["apple", "rules_pkg"]));
        assert_eq!(
            registry.versions("rules_pkg").unwrap(),
            vec![
                ModuleVersion {
                    version: "1.1.0".to_owned(),
                    yank_reason: None,
                },
                ModuleVersion {
                    version: "1.0.0".to_owned(),
                    yank_reason: Some("broken".to_owned()),
                },
            ]
        );
        assert_eq!(
            registry.docs_url("rules_pkg", "1.1.0").unwrap().as_deref(),
            Some("https://example.com/docs.tar.gz")
        );
        assert_eq!(registry.docs_url("rules_pkg", "1.0.0").unwrap(), None);
        assert_eq!(registry.docs_url("rules_pkg", "0.1.0").unwrap(), None);
    }

    #[test]
    fn test_unknown_module() {
        let dir = TempDir::new().unwrap();
        let registry = LocalRegistry::new(dir.path());
        assert!(matches!(
            registry.versions("nope"),
            Err(RegistryError::ModuleNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_invalid_metadata() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "modules/bad/metadata.json", "{not json");
        let registry = LocalRegistry::new(dir.path());
        assert!(matches!(
            registry.versions("bad"),
            Err(RegistryError::Json { .. })
        ));
    }
}
