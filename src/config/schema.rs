//! Typed views of the configuration document.
//!
//! The resolved document stays a generic tree; these types are what the
//! sensor manager deserializes it into when it initializes. All types derive
//! Serde traits, and every field has a default so partial documents load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::document::Configuration;

/// Root of the driver-facing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DriverSettings {
    /// Settings shared by every lidar.
    pub common: CommonConfig,

    /// One entry per connected lidar.
    pub lidar: Vec<LidarConfig>,
}

impl DriverSettings {
    /// Deserialize the driver view out of a resolved document.
    pub fn from_config(config: &Configuration) -> Result<Self, serde_yaml::Error> {
        config.deserialize()
    }
}

/// Packet source selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommonConfig {
    /// 1: online lidar, 2: packets from middleware, 3: pcap file.
    pub msg_source: u8,

    /// Republish raw packets.
    pub send_packet_ros: bool,

    /// Publish assembled point clouds.
    pub send_point_cloud_ros: bool,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            msg_source: MSG_SOURCE_ONLINE,
            send_packet_ros: false,
            send_point_cloud_ros: true,
        }
    }
}

/// `msg_source` value for a live sensor on the network.
pub const MSG_SOURCE_ONLINE: u8 = 1;

/// A single lidar entry.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LidarConfig {
    pub driver: DriverConfig,
    pub ros: RosConfig,
}

/// Network and device settings for one lidar.
///
/// Ports are kept as signed integers so that out-of-range values survive
/// deserialization and get reported by validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Device model, e.g. "RS16" or "RSHELIOS".
    pub lidar_type: String,

    /// Point-cloud (MSOP) packet port.
    pub msop_port: i64,

    /// Device info (DIFOP) packet port.
    pub difop_port: i64,

    /// Local address to bind the packet sockets to.
    pub host_address: String,

    /// Use the sensor's timestamps instead of host time.
    pub use_lidar_clock: bool,

    /// Hold point clouds until the first DIFOP packet arrives.
    pub wait_for_difop: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            lidar_type: "RS16".to_string(),
            msop_port: 6699,
            difop_port: 7788,
            host_address: "0.0.0.0".to_string(),
            use_lidar_clock: false,
            wait_for_difop: true,
        }
    }
}

/// Middleware-facing naming for one lidar.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RosConfig {
    pub ros_frame_id: String,
    pub ros_recv_packet_topic: String,
    pub ros_send_packet_topic: String,
    pub ros_send_point_cloud_topic: String,
}

impl Default for RosConfig {
    fn default() -> Self {
        Self {
            ros_frame_id: "rslidar".to_string(),
            ros_recv_packet_topic: "/rslidar_packets".to_string(),
            ros_send_packet_topic: "/rslidar_packets".to_string(),
            ros_send_point_cloud_topic: "/rslidar_points".to_string(),
        }
    }
}

/// Supported device models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LidarType {
    Rs16,
    Rs32,
    RsBp,
    RsHelios,
    RsHelios16P,
    Rs48,
    Rs80,
    Rs128,
    RsP48,
    RsP80,
    RsP128,
    RsM1,
    RsM2,
    RsM3,
    RsE1,
    RsMx,
    RsAiry,
}

impl LidarType {
    pub const ALL: [LidarType; 17] = [
        LidarType::Rs16,
        LidarType::Rs32,
        LidarType::RsBp,
        LidarType::RsHelios,
        LidarType::RsHelios16P,
        LidarType::Rs48,
        LidarType::Rs80,
        LidarType::Rs128,
        LidarType::RsP48,
        LidarType::RsP80,
        LidarType::RsP128,
        LidarType::RsM1,
        LidarType::RsM2,
        LidarType::RsM3,
        LidarType::RsE1,
        LidarType::RsMx,
        LidarType::RsAiry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LidarType::Rs16 => "RS16",
            LidarType::Rs32 => "RS32",
            LidarType::RsBp => "RSBP",
            LidarType::RsHelios => "RSHELIOS",
            LidarType::RsHelios16P => "RSHELIOS_16P",
            LidarType::Rs48 => "RS48",
            LidarType::Rs80 => "RS80",
            LidarType::Rs128 => "RS128",
            LidarType::RsP48 => "RSP48",
            LidarType::RsP80 => "RSP80",
            LidarType::RsP128 => "RSP128",
            LidarType::RsM1 => "RSM1",
            LidarType::RsM2 => "RSM2",
            LidarType::RsM3 => "RSM3",
            LidarType::RsE1 => "RSE1",
            LidarType::RsMx => "RSMX",
            LidarType::RsAiry => "RSAIRY",
        }
    }
}

impl fmt::Display for LidarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LidarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LidarType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
