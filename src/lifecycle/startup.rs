//! Startup orchestration.
//!
//! # Responsibilities
//! - Choose the config file from runtime parameters
//! - Resolve the configuration with runtime overrides applied
//! - Print the version banner
//!
//! # Design Decisions
//! - Fail fast: any configuration error is fatal
//! - The path reported as loaded is the path that was read

use std::path::PathBuf;

use crate::config::{resolve, resolve_config_path, ConfigError, Configuration, OverrideSet};
use crate::runtime::RuntimeParams;

/// Outcome of configuration resolution.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// File the base document was read from.
    pub path: PathBuf,
    pub config: Configuration,
}

/// Resolve the node's configuration from its runtime parameters.
pub fn load_configuration(params: &RuntimeParams) -> Result<ResolvedConfig, ConfigError> {
    let path = resolve_config_path(&params.config_path);
    let overrides = OverrideSet::from_params(params);

    let config = resolve(&path, &overrides)?;
    tracing::info!(
        path = %path.display(),
        overrides = overrides.present().count(),
        "Config loaded"
    );

    Ok(ResolvedConfig { path, config })
}

/// Version banner lines.
pub fn banner() -> Vec<String> {
    let rule = "*".repeat(56);
    let frame = format!("**********{}**********", " ".repeat(36));
    let title = format!("RSLidar_SDK Version: v{}", env!("CARGO_PKG_VERSION"));
    vec![
        rule.clone(),
        frame.clone(),
        format!("**********{:^36}**********", title),
        frame,
        rule,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_path_is_loaded_and_reported() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"lidar:\n  - driver:\n      lidar_type: RS16\n").unwrap();

        let params = RuntimeParams {
            config_path: file.path().to_string_lossy().into_owned(),
            lidar_type: "RS128".into(),
            ..RuntimeParams::default()
        };
        let resolved = load_configuration(&params).unwrap();
        assert_eq!(resolved.path, file.path());
        assert_eq!(
            resolved.config.as_value()["lidar"][0]["driver"]["lidar_type"],
            serde_yaml::Value::from("RS128")
        );
    }

    #[test]
    fn empty_path_uses_installed_config() {
        let resolved = load_configuration(&RuntimeParams::default()).unwrap();
        assert_eq!(resolved.path, crate::config::loader::default_config_path());
    }

    #[test]
    fn missing_file_is_fatal() {
        let params = RuntimeParams {
            config_path: "/nonexistent/config.yaml".into(),
            ..RuntimeParams::default()
        };
        let err = load_configuration(&params).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/config.yaml"));
    }

    #[test]
    fn banner_lines_have_equal_width() {
        let lines = banner();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|line| line.chars().count() == 56));
        assert!(lines[2].contains(env!("CARGO_PKG_VERSION")));
    }
}
