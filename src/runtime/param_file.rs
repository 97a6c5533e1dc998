//! Parameter-file host: parameters from a YAML file.
//!
//! Two layouts are accepted. A flat mapping:
//!
//! ```yaml
//! lidar_type: RS32
//! msop_port: 6699
//! ```
//!
//! or the node-scoped layout produced by middleware launch tooling:
//!
//! ```yaml
//! rslidar_sdk_node:
//!   ros__parameters:
//!     lidar_type: RS32
//! ```
//!
//! A table scoped to another node, or a node entry without
//! `ros__parameters`, is rejected. Unknown flat keys are logged and ignored.

use std::fs;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};

use crate::runtime::{HostRuntime, RuntimeError, RuntimeParams};

/// Node name used to find a node-scoped parameter table.
pub const NODE_NAME: &str = "rslidar_sdk_node";

/// Key that holds a node's parameters in the node-scoped layout.
const PARAMETERS_KEY: &str = "ros__parameters";

/// Parameters read from the flat layout.
const PARAMETER_NAMES: [&str; 5] = ["lidar_type", "msop_port", "difop_port", "frame_id", "config_path"];

/// Host runtime that reads its parameters from a file at `init`.
#[derive(Debug, Clone)]
pub struct ParamFileRuntime {
    path: PathBuf,
    params: Option<RuntimeParams>,
}

impl ParamFileRuntime {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            params: None,
        }
    }
}

impl HostRuntime for ParamFileRuntime {
    fn name(&self) -> &'static str {
        "param-file"
    }

    fn init(&mut self) -> Result<(), RuntimeError> {
        let content = fs::read_to_string(&self.path).map_err(|source| RuntimeError::Io {
            path: self.path.clone(),
            source,
        })?;
        let doc: Value = serde_yaml::from_str(&content).map_err(|source| RuntimeError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let params = parse_params(&doc)?;
        tracing::info!(path = %self.path.display(), "Runtime parameters loaded");
        self.params = Some(params);
        Ok(())
    }

    fn parameters(&self) -> Result<RuntimeParams, RuntimeError> {
        self.params
            .clone()
            .ok_or(RuntimeError::NotInitialized("param-file"))
    }
}

/// Extract the runtime parameters from a parsed parameter document.
pub fn parse_params(doc: &Value) -> Result<RuntimeParams, RuntimeError> {
    let empty = Mapping::new();
    let table = match doc {
        Value::Null => &empty,
        Value::Mapping(root) => parameter_table(root)?,
        _ => {
            return Err(RuntimeError::InvalidParameter {
                name: "<root>",
                reason: "must be a mapping".to_string(),
            })
        }
    };

    let defaults = RuntimeParams::default();
    Ok(RuntimeParams {
        lidar_type: text(table, "lidar_type", defaults.lidar_type)?,
        msop_port: integer(table, "msop_port", defaults.msop_port)?,
        difop_port: integer(table, "difop_port", defaults.difop_port)?,
        frame_id: text(table, "frame_id", defaults.frame_id)?,
        config_path: text(table, "config_path", defaults.config_path)?,
    })
}

/// Pick the parameter table out of the document root.
fn parameter_table(root: &Mapping) -> Result<&Mapping, RuntimeError> {
    if let Some(node) = root.get(NODE_NAME) {
        return node
            .get(PARAMETERS_KEY)
            .and_then(Value::as_mapping)
            .ok_or_else(|| RuntimeError::InvalidParameter {
                name: NODE_NAME,
                reason: format!("must contain a `{}` mapping", PARAMETERS_KEY),
            });
    }

    for (key, value) in root {
        let scoped = value.get(PARAMETERS_KEY).is_some();
        match key.as_str() {
            Some(name) if PARAMETER_NAMES.contains(&name) => {}
            Some(name) if scoped => {
                return Err(RuntimeError::InvalidParameter {
                    name: NODE_NAME,
                    reason: format!("not found; parameters are scoped to node `{}`", name),
                });
            }
            _ => tracing::warn!(key = ?key, "Ignoring unknown runtime parameter"),
        }
    }
    Ok(root)
}

fn text(table: &Mapping, name: &'static str, unset: String) -> Result<String, RuntimeError> {
    match table.get(name) {
        None | Some(Value::Null) => Ok(unset),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RuntimeError::InvalidParameter {
            name,
            reason: format!("must be a string, got {:?}", other),
        }),
    }
}

fn integer(table: &Mapping, name: &'static str, unset: i64) -> Result<i64, RuntimeError> {
    match table.get(name) {
        None | Some(Value::Null) => Ok(unset),
        Some(value) => value.as_i64().ok_or_else(|| RuntimeError::InvalidParameter {
            name,
            reason: format!("must be an integer, got {:?}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(yaml: &str) -> Result<RuntimeParams, RuntimeError> {
        parse_params(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn flat_layout() {
        let params = parse("lidar_type: RS32\nmsop_port: 6700\nframe_id: front\n").unwrap();
        assert_eq!(params.lidar_type, "RS32");
        assert_eq!(params.msop_port, 6700);
        assert_eq!(params.difop_port, -1);
        assert_eq!(params.frame_id, "front");
        assert_eq!(params.config_path, "");
    }

    #[test]
    fn node_scoped_layout() {
        let params = parse(
            "rslidar_sdk_node:\n  ros__parameters:\n    difop_port: 7789\n    config_path: /opt/lidar.yaml\n",
        )
        .unwrap();
        assert_eq!(params.difop_port, 7789);
        assert_eq!(params.config_path, "/opt/lidar.yaml");
        assert_eq!(params.lidar_type, "");
    }

    #[test]
    fn node_without_parameters_is_rejected() {
        assert!(matches!(
            parse("rslidar_sdk_node:\n  lidar_type: RS32\n"),
            Err(RuntimeError::InvalidParameter { name: NODE_NAME, .. })
        ));
    }

    #[test]
    fn other_node_name_is_rejected() {
        let err = parse("rslidar_node:\n  ros__parameters:\n    lidar_type: RS32\n").unwrap_err();
        assert!(matches!(err, RuntimeError::InvalidParameter { name: NODE_NAME, .. }));
        assert!(err.to_string().contains("`rslidar_node`"));
    }

    #[test]
    fn unknown_flat_keys_are_ignored() {
        let params = parse("lidar_type: RS32\nuse_sim_time: false\n").unwrap();
        assert_eq!(params.lidar_type, "RS32");
        assert_eq!(params.msop_port, -1);
    }

    #[test]
    fn empty_file_is_all_unset() {
        assert_eq!(parse("").unwrap(), RuntimeParams::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(matches!(
            parse("msop_port: \"6699\"\n"),
            Err(RuntimeError::InvalidParameter { name: "msop_port", .. })
        ));
        assert!(matches!(
            parse("lidar_type: 16\n"),
            Err(RuntimeError::InvalidParameter { name: "lidar_type", .. })
        ));
        assert!(matches!(
            parse("- a\n- b\n"),
            Err(RuntimeError::InvalidParameter { name: "<root>", .. })
        ));
    }

    #[test]
    fn parameters_require_init() {
        let runtime = ParamFileRuntime::new("/unused.yaml");
        assert!(matches!(
            runtime.parameters(),
            Err(RuntimeError::NotInitialized(_))
        ));
    }

    #[test]
    fn init_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"lidar_type: RSM1\n").unwrap();

        let mut runtime = ParamFileRuntime::new(file.path());
        runtime.init().unwrap();
        assert_eq!(runtime.parameters().unwrap().lidar_type, "RSM1");
    }

    #[test]
    fn init_reports_missing_file() {
        let mut runtime = ParamFileRuntime::new("/nonexistent/params.yaml");
        assert!(matches!(runtime.init(), Err(RuntimeError::Io { .. })));
    }
}
