//! Runtime overrides layered on top of the config file.
//!
//! # Design Decisions
//! - Each override is independently present or absent
//! - Absence is an in-band sentinel: `""` for text, `-1` for integers
//! - Overrides keep insertion order so resolution is reproducible

use serde_yaml::Value;

use crate::config::document::TreePath;
use crate::runtime::RuntimeParams;

/// Sentinel for an unset text override.
pub const UNSET_TEXT: &str = "";

/// Sentinel for an unset integer override.
pub const UNSET_INTEGER: i64 = -1;

/// Scalar carried by an override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideValue {
    Text(String),
    Integer(i64),
}

impl OverrideValue {
    /// True when the value is its type's unset sentinel.
    pub fn is_unset(&self) -> bool {
        match self {
            OverrideValue::Text(text) => text == UNSET_TEXT,
            OverrideValue::Integer(n) => *n == UNSET_INTEGER,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            OverrideValue::Text(text) => Value::String(text.clone()),
            OverrideValue::Integer(n) => Value::from(*n),
        }
    }
}

impl From<&str> for OverrideValue {
    fn from(text: &str) -> Self {
        OverrideValue::Text(text.to_string())
    }
}

impl From<String> for OverrideValue {
    fn from(text: String) -> Self {
        OverrideValue::Text(text)
    }
}

impl From<i64> for OverrideValue {
    fn from(n: i64) -> Self {
        OverrideValue::Integer(n)
    }
}

/// A single targeted override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    /// Runtime parameter name the value came from.
    pub name: &'static str,
    pub target: TreePath,
    pub value: OverrideValue,
}

/// Ordered list of overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideSet {
    entries: Vec<Override>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an override. Later entries win when targets coincide.
    pub fn with(
        mut self,
        name: &'static str,
        target: TreePath,
        value: impl Into<OverrideValue>,
    ) -> Self {
        self.entries.push(Override {
            name,
            target,
            value: value.into(),
        });
        self
    }

    /// Build the node's override set from runtime parameters.
    ///
    /// Order: device type, MSOP port, DIFOP port, frame id. All of them
    /// target the first lidar entry.
    pub fn from_params(params: &RuntimeParams) -> Self {
        Self::new()
            .with("lidar_type", lidar_type_path(), params.lidar_type.as_str())
            .with("msop_port", msop_port_path(), params.msop_port)
            .with("difop_port", difop_port_path(), params.difop_port)
            .with("frame_id", frame_id_path(), params.frame_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter()
    }

    /// Overrides whose value is not the unset sentinel.
    pub fn present(&self) -> impl Iterator<Item = &Override> {
        self.entries.iter().filter(|o| !o.value.is_unset())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn first_lidar() -> TreePath {
    TreePath::root().key("lidar").index(0)
}

pub fn lidar_type_path() -> TreePath {
    first_lidar().key("driver").key("lidar_type")
}

pub fn msop_port_path() -> TreePath {
    first_lidar().key("driver").key("msop_port")
}

pub fn difop_port_path() -> TreePath {
    first_lidar().key("driver").key("difop_port")
}

pub fn frame_id_path() -> TreePath {
    first_lidar().key("ros").key("ros_frame_id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_are_unset() {
        assert!(OverrideValue::from("").is_unset());
        assert!(OverrideValue::from(-1_i64).is_unset());
        assert!(!OverrideValue::from("RS32").is_unset());
        assert!(!OverrideValue::from(0_i64).is_unset());
        assert!(!OverrideValue::from(-2_i64).is_unset());
    }

    #[test]
    fn params_map_in_fixed_order() {
        let params = RuntimeParams {
            lidar_type: "RS32".into(),
            msop_port: 7000,
            ..RuntimeParams::default()
        };
        let set = OverrideSet::from_params(&params);
        let names: Vec<_> = set.iter().map(|o| o.name).collect();
        assert_eq!(names, ["lidar_type", "msop_port", "difop_port", "frame_id"]);

        let present: Vec<_> = set.present().map(|o| o.name).collect();
        assert_eq!(present, ["lidar_type", "msop_port"]);
    }

    #[test]
    fn default_params_are_all_unset() {
        let set = OverrideSet::from_params(&RuntimeParams::default());
        assert_eq!(set.len(), 4);
        assert_eq!(set.present().count(), 0);
    }

    #[test]
    fn targets() {
        assert_eq!(lidar_type_path().to_string(), "lidar[0].driver.lidar_type");
        assert_eq!(difop_port_path().to_string(), "lidar[0].driver.difop_port");
        assert_eq!(frame_id_path().to_string(), "lidar[0].ros.ros_frame_id");
    }
}
