//! Parsing and validation of `quiver.toml` configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`QuiverConfig`]: where package sources live, which marker names the
//! scanner looks for, and how bundles are assembled.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, validate_config, CONFIG_FILE};
pub use types::*;
