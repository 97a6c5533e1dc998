//! Layered configuration resolution: file defaults, then runtime overrides.

use std::path::Path;

use thiserror::Error;

use crate::config::document::{Configuration, TreePath, WriteError};
use crate::config::loader::{load_config, ConfigError};
use crate::config::overrides::OverrideSet;

/// An override that could not be written into the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("override `{name}` cannot be written to `{target}`: {source}")]
pub struct OverrideError {
    pub name: &'static str,
    pub target: TreePath,
    #[source]
    pub source: WriteError,
}

/// Load `base_path` and apply `overrides` on top of it.
///
/// Nothing is returned unless every step succeeds.
pub fn resolve(base_path: &Path, overrides: &OverrideSet) -> Result<Configuration, ConfigError> {
    let base = load_config(base_path)?;
    apply_overrides(base, overrides).map_err(|source| ConfigError::Override {
        path: base_path.to_path_buf(),
        source,
    })
}

/// Apply every present override in order. Unset ones are skipped.
pub fn apply_overrides(
    mut config: Configuration,
    overrides: &OverrideSet,
) -> Result<Configuration, OverrideError> {
    for entry in overrides.present() {
        config
            .set(&entry.target, entry.value.to_value())
            .map_err(|source| OverrideError {
                name: entry.name,
                target: entry.target.clone(),
                source,
            })?;
        tracing::debug!(
            parameter = entry.name,
            target = %entry.target,
            value = ?entry.value,
            "Runtime override applied"
        );
    }
    Ok(config)
}
