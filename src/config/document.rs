//! Configuration document tree.
//!
//! # Responsibilities
//! - Hold the parsed configuration as a mapping/sequence/scalar tree
//! - Address nodes by path (`lidar[0].driver.msop_port`)
//! - Write scalar values into the tree, creating missing mappings on the way
//!
//! # Design Decisions
//! - The root is always a mapping; anything else is rejected at load time
//! - A sequence only grows by appending at its current length
//! - Writing through a scalar is an error, never a silent replacement

use std::fmt;

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// One step of a [`TreePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Mapping key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

/// Location of a node inside a [`Configuration`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TreePath(Vec<PathSegment>);

impl TreePath {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Extend the path with a mapping key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    /// Extend the path with a sequence index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// Failure to write a value at a [`TreePath`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error("`{at}` is not a mapping")]
    NotAMapping { at: String },

    #[error("`{at}` is not a sequence")]
    NotASequence { at: String },

    #[error("index {index} is past the end of `{at}` (length {len})")]
    IndexOutOfRange { at: String, index: usize, len: usize },
}

/// A parsed configuration document.
///
/// Built once during startup and then shared read-only with the sensor
/// manager.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration(Value);

impl Configuration {
    /// Wrap a parsed tree. Returns `None` unless the root is a mapping.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(_) => Some(Self(value)),
            _ => None,
        }
    }

    /// An empty document.
    pub fn empty() -> Self {
        Self(Value::Mapping(Mapping::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up the node at `path`.
    pub fn get(&self, path: &TreePath) -> Option<&Value> {
        path.segments()
            .iter()
            .try_fold(&self.0, |node, segment| match segment {
                PathSegment::Key(key) => node.get(key.as_str()),
                PathSegment::Index(index) => node.get(*index),
            })
    }

    /// Replace the node at `path` with `value`.
    ///
    /// Missing mapping entries and null nodes along the way are created.
    pub fn set(&mut self, path: &TreePath, value: Value) -> Result<(), WriteError> {
        let mut node = &mut self.0;
        let mut walked = TreePath::root();
        for segment in path.segments() {
            node = descend(node, segment, &walked)?;
            walked.push(segment.clone());
        }
        *node = value;
        Ok(())
    }

    /// Deserialize the whole document into a typed view.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_yaml::Error> {
        serde_yaml::from_value(self.0.clone())
    }

    /// Render the document back to YAML.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.0)
    }
}

fn descend<'a>(
    node: &'a mut Value,
    segment: &PathSegment,
    at: &TreePath,
) -> Result<&'a mut Value, WriteError> {
    if node.is_null() {
        *node = match segment {
            PathSegment::Key(_) => Value::Mapping(Mapping::new()),
            PathSegment::Index(_) => Value::Sequence(Vec::new()),
        };
    }

    match (segment, node) {
        (PathSegment::Key(key), Value::Mapping(map)) => Ok(map
            .entry(Value::String(key.clone()))
            .or_insert(Value::Null)),
        (PathSegment::Index(index), Value::Sequence(seq)) => {
            let len = seq.len();
            if *index == len {
                seq.push(Value::Null);
            }
            seq.get_mut(*index).ok_or_else(|| WriteError::IndexOutOfRange {
                at: at.to_string(),
                index: *index,
                len,
            })
        }
        (PathSegment::Key(_), _) => Err(WriteError::NotAMapping { at: at.to_string() }),
        (PathSegment::Index(_), _) => Err(WriteError::NotASequence { at: at.to_string() }),
    }
}
