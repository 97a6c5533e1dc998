use std::path::PathBuf;

use clap::Parser;

use crate::runtime::RuntimeKind;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
pub struct Args {
    /// Host runtime integration that supplies the parameters below.
    #[arg(long, env = "RSLIDAR_RUNTIME", value_enum, default_value_t = RuntimeKind::Standalone)]
    pub runtime: RuntimeKind,

    /// Parameter file read by the param-file runtime.
    #[arg(long, env = "RSLIDAR_PARAMS_FILE")]
    pub params_file: Option<PathBuf>,

    /// Config file to load.  Empty uses config/config.yaml from the
    /// installation directory.
    #[arg(long, env = "RSLIDAR_CONFIG_FILE", default_value = "")]
    pub config_path: String,

    /// Override lidar_type of the first lidar.  Empty keeps the file value.
    #[arg(long, env = "RSLIDAR_LIDAR_TYPE", default_value = "")]
    pub lidar_type: String,

    /// Override msop_port of the first lidar.  -1 keeps the file value.
    #[arg(long, env = "RSLIDAR_MSOP_PORT", default_value_t = -1)]
    pub msop_port: i64,

    /// Override difop_port of the first lidar.  -1 keeps the file value.
    #[arg(long, env = "RSLIDAR_DIFOP_PORT", default_value_t = -1)]
    pub difop_port: i64,

    /// Override ros_frame_id of the first lidar.  Empty keeps the file value.
    #[arg(long, env = "RSLIDAR_FRAME_ID", default_value = "")]
    pub frame_id: String,

    /// Resolve the configuration, print it and exit.
    #[arg(long)]
    pub check_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_leave_everything_unset() {
        let args = Args::try_parse_from(["rslidar-node"]).unwrap();
        assert_eq!(args.runtime, RuntimeKind::Standalone);
        assert!(args.params_file.is_none());
        assert_eq!(args.config_path, "");
        assert_eq!(args.msop_port, -1);
        assert_eq!(args.difop_port, -1);
        assert!(!args.check_config);
    }

    #[test]
    fn non_integer_port_is_rejected() {
        assert!(Args::try_parse_from(["rslidar-node", "--msop-port", "abc"]).is_err());
    }
}
