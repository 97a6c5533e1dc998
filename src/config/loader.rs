//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

use crate::config::document::Configuration;
use crate::config::resolver::OverrideError;

/// File name of the configuration shipped with the node.
pub const DEFAULT_CONFIG_FILE: &str = "config/config.yaml";

/// Error type for configuration loading and resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("the format of config file {} is wrong, please check (e.g. indentation): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("the format of config file {} is wrong: {source}", .path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {} must contain a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("failed to apply runtime override to {}: {source}", .path.display())]
    Override {
        path: PathBuf,
        #[source]
        source: OverrideError,
    },
}

impl ConfigError {
    /// The config file this error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Io { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::ParseToml { path, .. }
            | ConfigError::NotAMapping { path }
            | ConfigError::Override { path, .. } => path,
        }
    }
}

/// Document syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Path of the configuration installed alongside the node.
pub fn default_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_FILE)
}

/// Pick the config file to load. An empty override keeps the default.
pub fn resolve_config_path(override_path: &str) -> PathBuf {
    if override_path.is_empty() {
        default_config_path()
    } else {
        PathBuf::from(override_path)
    }
}

/// Load and parse a configuration document.
pub fn load_config(path: &Path) -> Result<Configuration, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        DocumentFormat::Toml => toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?,
    };

    Configuration::from_value(value).ok_or_else(|| ConfigError::NotAMapping {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_override_keeps_default() {
        assert_eq!(resolve_config_path(""), default_config_path());
        assert!(default_config_path().ends_with("config/config.yaml"));
    }

    #[test]
    fn explicit_override_wins() {
        assert_eq!(resolve_config_path("/etc/lidar.yaml"), PathBuf::from("/etc/lidar.yaml"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.TOML")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("config")), DocumentFormat::Yaml);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("/nonexistent/rslidar/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(err.path(), Path::new("/nonexistent/rslidar/config.yaml"));
        assert!(err.to_string().contains("/nonexistent/rslidar/config.yaml"));
    }

    #[test]
    fn bad_indentation_is_parse_error() {
        let file = write_temp(".yaml", "lidar:\n  - driver:\n      lidar_type: RS16\n     msop_port: 6699\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), file.path());
    }

    #[test]
    fn scalar_root_is_rejected() {
        let file = write_temp(".yaml", "just a string\n");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::NotAMapping { .. }));
    }

    #[test]
    fn toml_document_loads_into_tree() {
        let file = write_temp(
            ".toml",
            "[common]\nmsg_source = 1\n\n[[lidar]]\n[lidar.driver]\nlidar_type = \"RS16\"\nmsop_port = 6699\n",
        );
        let config = load_config(file.path()).unwrap();
        let value = config.as_value();
        assert_eq!(value["lidar"][0]["driver"]["lidar_type"], Value::from("RS16"));
        assert_eq!(value["lidar"][0]["driver"]["msop_port"], Value::from(6699));
        assert_eq!(value["common"]["msg_source"], Value::from(1));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let file = write_temp(".toml", "[lidar\nmsop_port = ");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
