//! Parsing and validation of `vtrace.toml` analysis configuration files.
//!
//! This crate reads the configuration file into a strongly-typed
//! [`VtraceConfig`] and turns it into concrete report paths with
//! [`resolve_inputs`], discovering unnamed inputs in a run directory.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_inputs, ResolvedInputs};
pub use types::*;
