//! RoboSense LiDAR driver node.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐   params   ┌──────────────┐  Configuration  ┌────────────────────┐
//!   │ host runtime │──────────▶│   config     │───────────────▶│ lifecycle          │
//!   │ (standalone /│            │ load+override│                 │ controller         │
//!   │  param-file) │            └──────────────┘                 │  initialize/start  │
//!   └──────▲───────┘                                             │  wait for shutdown │
//!          │ shutdown()                                          └─────────┬──────────┘
//!          │                                                               │ manager
//!          │            ┌──────────────────┐   trigger   ┌───────────────┐ │
//!          └────────────│ main: stop + exit│◀────────────│ SIGINT/SIGTERM│ ▼
//!                       └──────────────────┘  (wakes)    └───────────────┘ sensor
//! ```

use std::process::ExitCode;

use clap::Parser;

use rslidar_node::args::Args;
use rslidar_node::lifecycle::startup::{banner, load_configuration};
use rslidar_node::lifecycle::{LifecycleController, ShutdownSignal};
use rslidar_node::observability::logging;
use rslidar_node::runtime;
use rslidar_node::sensor::{SensorManager, UdpSensorManager};

/// Exit status for a configuration that cannot be loaded (-1 as a byte).
const EXIT_CONFIG_ERROR: u8 = 255;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init();

    for line in banner() {
        println!("{}", line);
    }

    let mut host = match runtime::build(&args) {
        Ok(host) => host,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up host runtime");
            return ExitCode::FAILURE;
        }
    };

    let params = match host.init().and_then(|()| host.parameters()) {
        Ok(params) => params,
        Err(e) => {
            tracing::error!(runtime = host.name(), error = %e, "Failed to read runtime parameters");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(runtime = host.name(), ?params, "Runtime parameters");

    let resolved = match load_configuration(&params) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::error!(path = %e.path().display(), error = %e, "Failed to load configuration");
            host.shutdown();
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    if args.check_config {
        return match resolved.config.to_yaml_string() {
            Ok(yaml) => {
                print!("{}", yaml);
                host.shutdown();
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to render configuration");
                host.shutdown();
                ExitCode::FAILURE
            }
        };
    }

    let mut controller = LifecycleController::new(ShutdownSignal::new());
    let status = match controller.run(&resolved.config, UdpSensorManager::new).await {
        Ok(mut manager) => {
            manager.stop();
            manager.closed().await;
            match controller.finish() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "Teardown out of order");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            tracing::error!(stage = e.stage(), error = %e, "Startup failed");
            ExitCode::FAILURE
        }
    };

    host.shutdown();
    tracing::info!("RoboSense-LiDAR-Driver stopped");
    status
}
