//! Environment expansion for `regdoc.toml` values.
//!
//! Every expanded field accepts `${VAR}` and `${VAR:-default}`. An unset
//! variable without a default is an error naming the field. Bare `$VAR` is
//! left as written. On top of that:
//!
//! - path fields expand a leading `~` to the home directory, after variable
//!   expansion, so `${BCR_CHECKOUT:-~/bcr}` works
//! - module list entries may expand to several module names

use std::path::PathBuf;

use crate::ConfigError;

/// How an expanded value is used.
#[derive(Clone, Copy, Debug)]
pub(crate) enum FieldKind {
    /// Filesystem path, resolved against the config directory afterwards.
    Path,
    /// Reference link target.
    Url,
}

/// Expand `value` in place.
pub(crate) fn expand_field(
    value: &mut String,
    field: &str,
    kind: FieldKind,
) -> Result<(), ConfigError> {
    if value.contains("${") {
        *value = expand_vars(value, field)?;
    }
    if matches!(kind, FieldKind::Path) && value.starts_with('~') {
        *value = shellexpand::tilde_with_context(value.as_str(), || {
            home_dir().and_then(|home| home.into_os_string().into_string().ok())
        })
        .into_owned();
    }
    Ok(())
}

/// Expand the entries of `build.modules`.
///
/// An entry that references a variable is split on commas and whitespace
/// after expansion, so `["${REGDOC_MODULES}"]` with
/// `REGDOC_MODULES="rules_go rules_cc"` selects both modules. An entry that
/// expands to nothing selects nothing. Literal entries are kept as written.
pub(crate) fn expand_module_list(modules: &mut Vec<String>) -> Result<(), ConfigError> {
    let mut expanded = Vec::with_capacity(modules.len());
    for entry in modules.drain(..) {
        if entry.contains("${") {
            let names = expand_vars(&entry, "build.modules")?;
            expanded.extend(
                names
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned),
            );
        } else {
            expanded.push(entry);
        }
    }
    *modules = expanded;
    Ok(())
}

fn expand_vars(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

struct UnsetVar(String);
