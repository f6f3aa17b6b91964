//! Configuration management for regdoc.
//!
//! Parses `regdoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `registry.path` and `build.output_dir`, which also expand a leading `~`
//! - `build.modules`, where one entry may expand to several module names
//! - `links.labels_url`, `links.name_url` and `links.dict_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use expand::{FieldKind, expand_field, expand_module_list};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override registry checkout path.
    pub registry_path: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override the list of modules to build.
    pub modules: Option<Vec<String>>,
    /// Override the archive fetch timeout.
    pub timeout_secs: Option<u64>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "regdoc.toml";

/// Default upper bound for a downloaded docs archive (64 MiB).
const DEFAULT_MAX_ARCHIVE_SIZE: u64 = 64 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry configuration (paths are relative strings from TOML).
    registry: RegistryConfigRaw,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Archive fetch configuration.
    pub fetch: FetchConfig,
    /// Reference documentation links for attribute types.
    pub links: LinksConfig,

    /// Resolved registry configuration (set after loading).
    #[serde(skip)]
    pub registry_resolved: RegistryConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw registry configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RegistryConfigRaw {
    path: Option<String>,
}

/// Resolved registry configuration with absolute paths.
#[derive(Debug, Default)]
pub struct RegistryConfig {
    /// Local checkout of the module registry.
    pub path: PathBuf,
}

/// Raw build configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
    modules: Option<Vec<String>>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory the static site is written to.
    pub output_dir: PathBuf,
    /// Modules to build. Empty means every module in the registry.
    pub modules: Vec<String>,
}

/// Archive fetch configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP timeout in seconds for downloading one docs archive.
    pub timeout_secs: u64,
    /// Maximum accepted archive size in bytes.
    pub max_archive_size: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_archive_size: DEFAULT_MAX_ARCHIVE_SIZE,
        }
    }
}

/// Reference documentation targets for attribute type links.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// Target for label-typed attributes.
    pub labels_url: String,
    /// Target for name-typed attributes.
    pub name_url: String,
    /// Target for dictionary-typed attributes.
    pub dict_url: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            labels_url: "https://bazel.build/concepts/labels".to_owned(),
            name_url: "https://bazel.build/concepts/labels#target-names".to_owned(),
            dict_url: "https://bazel.build/rules/lib/dict".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`registry.path`").
        field: String,
        /// Error message (e.g., "${`BCR_CHECKOUT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `regdoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(path) = &settings.registry_path {
            self.registry_resolved.path.clone_from(path);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(modules) = &settings.modules {
            self.build_resolved.modules.clone_from(modules);
        }
        if let Some(timeout) = settings.timeout_secs {
            self.fetch.timeout_secs = timeout;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            registry: RegistryConfigRaw::default(),
            build: BuildConfigRaw::default(),
            fetch: FetchConfig::default(),
            links: LinksConfig::default(),
            registry_resolved: RegistryConfig {
                path: base.join("registry"),
            },
            build_resolved: BuildConfig {
                output_dir: base.join("site"),
                modules: Vec::new(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_fetch()?;
        self.validate_links()?;
        for module in &self.build_resolved.modules {
            require_non_empty(module, "build.modules")?;
        }
        Ok(())
    }

    fn validate_fetch(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.fetch.max_archive_size == 0 {
            return Err(ConfigError::Validation(
                "fetch.max_archive_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_links(&self) -> Result<(), ConfigError> {
        for (value, field) in [
            (&self.links.labels_url, "links.labels_url"),
            (&self.links.name_url, "links.name_url"),
            (&self.links.dict_url, "links.dict_url"),
        ] {
            require_non_empty(value, field)?;
            require_http_url(value, field)?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = &mut self.registry.path {
            expand_field(path, "registry.path", FieldKind::Path)?;
        }
        if let Some(dir) = &mut self.build.output_dir {
            expand_field(dir, "build.output_dir", FieldKind::Path)?;
        }
        if let Some(modules) = &mut self.build.modules {
            expand_module_list(modules)?;
        }

        expand_field(
            &mut self.links.labels_url,
            "links.labels_url",
            FieldKind::Url,
        )?;
        expand_field(&mut self.links.name_url, "links.name_url", FieldKind::Url)?;
        expand_field(&mut self.links.dict_url, "links.dict_url", FieldKind::Url)?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.registry_resolved = RegistryConfig {
            path: resolve(self.registry.path.as_deref(), "registry"),
        };
        self.build_resolved = BuildConfig {
            output_dir: resolve(self.build.output_dir.as_deref(), "site"),
            modules: self.build.modules.clone().unwrap_or_default(),
        };
    }
}
