//! Semantic validation of the driver settings.
//!
//! # Responsibilities
//! - Check value ranges (ports, addresses) that serde cannot express
//! - Check that the lidar model is one the driver knows
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: `DriverSettings → Result<(), Vec<ValidationError>>`
//! - Runs inside the sensor manager, never during config resolution

use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::{DriverSettings, LidarType};

/// A single semantic problem in the driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no lidar entries configured")]
    NoLidars,

    #[error("lidar[{index}]: unknown lidar_type `{value}`")]
    UnknownLidarType { index: usize, value: String },

    #[error("lidar[{index}]: {field} {value} is outside 1..=65535")]
    PortOutOfRange {
        index: usize,
        field: &'static str,
        value: i64,
    },

    #[error("lidar[{index}]: msop_port and difop_port are both {port}")]
    PortClash { index: usize, port: i64 },

    #[error("lidar[{index}]: host_address `{value}` is not an IP address")]
    InvalidHostAddress { index: usize, value: String },
}

/// Validate every lidar entry, collecting all problems.
pub fn validate_settings(settings: &DriverSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.lidar.is_empty() {
        errors.push(ValidationError::NoLidars);
    }

    for (index, lidar) in settings.lidar.iter().enumerate() {
        let driver = &lidar.driver;

        if driver.lidar_type.parse::<LidarType>().is_err() {
            errors.push(ValidationError::UnknownLidarType {
                index,
                value: driver.lidar_type.clone(),
            });
        }

        for (field, value) in [("msop_port", driver.msop_port), ("difop_port", driver.difop_port)] {
            if !(1..=i64::from(u16::MAX)).contains(&value) {
                errors.push(ValidationError::PortOutOfRange { index, field, value });
            }
        }

        if driver.msop_port == driver.difop_port {
            errors.push(ValidationError::PortClash {
                index,
                port: driver.msop_port,
            });
        }

        if driver.host_address.parse::<IpAddr>().is_err() {
            errors.push(ValidationError::InvalidHostAddress {
                index,
                value: driver.host_address.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
