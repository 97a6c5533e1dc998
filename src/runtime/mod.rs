//! Host runtime integration.
//!
//! # Responsibilities
//! - Bring up the host environment the node runs in
//! - Supply the runtime parameters that override the config file
//! - Tear the host environment down after shutdown
//!
//! # Design Decisions
//! - One trait, one implementation per integration target
//! - The variant is chosen once, at composition time in `main`
//! - Parameters the host does not supply come back as their unset sentinel

pub mod param_file;
pub mod standalone;

use std::path::PathBuf;

use clap::ValueEnum;
use thiserror::Error;

use crate::args::Args;
use crate::config::overrides::{UNSET_INTEGER, UNSET_TEXT};

pub use param_file::ParamFileRuntime;
pub use standalone::StandaloneRuntime;

/// Runtime inputs that can override the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeParams {
    /// Device model override.
    pub lidar_type: String,
    /// MSOP port override.
    pub msop_port: i64,
    /// DIFOP port override.
    pub difop_port: i64,
    /// Output frame id override.
    pub frame_id: String,
    /// Config file path override.
    pub config_path: String,
}

impl Default for RuntimeParams {
    fn default() -> Self {
        Self {
            lidar_type: UNSET_TEXT.to_string(),
            msop_port: UNSET_INTEGER,
            difop_port: UNSET_INTEGER,
            frame_id: UNSET_TEXT.to_string(),
            config_path: UNSET_TEXT.to_string(),
        }
    }
}

/// Errors raised by a host runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read parameter file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse parameter file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("parameter `{name}` {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("the param-file runtime needs --params-file")]
    MissingParamsFile,

    #[error("{0} runtime used before init")]
    NotInitialized(&'static str),
}

/// Capabilities the node needs from its host environment.
pub trait HostRuntime: Send {
    /// Integration name, for logs.
    fn name(&self) -> &'static str;

    /// Bring the host environment up. Called once, before `parameters`.
    fn init(&mut self) -> Result<(), RuntimeError> {
        Ok(())
    }

    /// Runtime parameters; missing ones carry their unset sentinel.
    fn parameters(&self) -> Result<RuntimeParams, RuntimeError>;

    /// Notify the host that the node is going down. Called once, from the
    /// main task, after the sensor manager has been stopped.
    fn shutdown(&mut self) {}
}

/// Available host integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RuntimeKind {
    /// Command-line flags and environment variables.
    #[default]
    Standalone,
    /// A YAML parameter file.
    ParamFile,
}

/// Build the host runtime selected on the command line.
pub fn build(args: &Args) -> Result<Box<dyn HostRuntime>, RuntimeError> {
    match args.runtime {
        RuntimeKind::Standalone => Ok(Box::new(StandaloneRuntime::from_args(args))),
        RuntimeKind::ParamFile => {
            let path = args.params_file.clone().ok_or(RuntimeError::MissingParamsFile)?;
            Ok(Box::new(ParamFileRuntime::new(path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn default_params_are_sentinels() {
        let params = RuntimeParams::default();
        assert_eq!(params.lidar_type, "");
        assert_eq!(params.msop_port, -1);
        assert_eq!(params.difop_port, -1);
        assert_eq!(params.frame_id, "");
        assert_eq!(params.config_path, "");
    }

    #[test]
    fn builds_selected_runtime() {
        let args = Args::try_parse_from(["rslidar-node"]).unwrap();
        assert_eq!(build(&args).unwrap().name(), "standalone");

        let args = Args::try_parse_from([
            "rslidar-node",
            "--runtime",
            "param-file",
            "--params-file",
            "/tmp/params.yaml",
        ])
        .unwrap();
        assert_eq!(build(&args).unwrap().name(), "param-file");
    }

    #[test]
    fn param_file_runtime_requires_path() {
        let args = Args::try_parse_from(["rslidar-node", "--runtime", "param-file"]).unwrap();
        assert!(matches!(build(&args), Err(RuntimeError::MissingParamsFile)));
    }
}
