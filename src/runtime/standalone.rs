//! Standalone host: parameters from flags and environment variables.

use crate::args::Args;
use crate::runtime::{HostRuntime, RuntimeError, RuntimeParams};

/// Host runtime for running the node without any middleware.
#[derive(Debug, Clone)]
pub struct StandaloneRuntime {
    params: RuntimeParams,
}

impl StandaloneRuntime {
    pub fn new(params: RuntimeParams) -> Self {
        Self { params }
    }

    pub fn from_args(args: &Args) -> Self {
        Self::new(RuntimeParams {
            lidar_type: args.lidar_type.clone(),
            msop_port: args.msop_port,
            difop_port: args.difop_port,
            frame_id: args.frame_id.clone(),
            config_path: args.config_path.clone(),
        })
    }
}

impl HostRuntime for StandaloneRuntime {
    fn name(&self) -> &'static str {
        "standalone"
    }

    fn parameters(&self) -> Result<RuntimeParams, RuntimeError> {
        Ok(self.params.clone())
    }

    fn shutdown(&mut self) {
        tracing::debug!(runtime = self.name(), "Host runtime shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn flags_become_params() {
        let args = Args::try_parse_from([
            "rslidar-node",
            "--lidar-type",
            "RS32",
            "--msop-port",
            "6700",
            "--frame-id",
            "front",
        ])
        .unwrap();
        let params = StandaloneRuntime::from_args(&args).parameters().unwrap();
        assert_eq!(params.lidar_type, "RS32");
        assert_eq!(params.msop_port, 6700);
        assert_eq!(params.difop_port, -1);
        assert_eq!(params.frame_id, "front");
        assert_eq!(params.config_path, "");
    }

    #[test]
    fn explicit_sentinel_is_accepted() {
        let args = Args::try_parse_from(["rslidar-node", "--msop-port", "-1"]).unwrap();
        let params = StandaloneRuntime::from_args(&args).parameters().unwrap();
        assert_eq!(params, RuntimeParams::default());
    }
}
