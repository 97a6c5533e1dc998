//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML, or TOML by extension)
//!     → loader.rs (read & parse into a tree)
//!     → resolver.rs (apply runtime overrides in fixed order)
//!     → Configuration (immutable from here on)
//!     → handed to the sensor manager
//!
//! Inside the sensor manager:
//!     → schema.rs (typed driver view)
//!     → validation.rs (semantic checks)
//! ```
//!
//! # Design Decisions
//! - A malformed file is fatal; no partial or defaulted document
//! - Overrides carry an in-band "unset" sentinel and skip when unset
//! - Resolution never validates semantics; that belongs to the consumer

pub mod document;
pub mod loader;
pub mod overrides;
pub mod resolver;
pub mod schema;
pub mod validation;

pub use document::{Configuration, TreePath};
pub use loader::{load_config, resolve_config_path, ConfigError};
pub use overrides::{OverrideSet, OverrideValue};
pub use resolver::resolve;
pub use schema::DriverSettings;
