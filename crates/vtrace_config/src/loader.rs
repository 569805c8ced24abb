//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VtraceConfig;
use std::path::Path;

/// The configuration file name looked up in a run directory.
pub const CONFIG_FILE_NAME: &str = "vtrace.toml";

/// Highest decimal precision a timing report can meaningfully state.
const MAX_PRECISION: u32 = 12;

/// Loads and validates `<dir>/vtrace.toml`.
pub fn load_config(dir: &Path) -> Result<VtraceConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<VtraceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `vtrace.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VtraceConfig, ConfigError> {
    let config: VtraceConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &VtraceConfig) -> Result<(), ConfigError> {
    if config.analysis.precision > MAX_PRECISION {
        return Err(ConfigError::ValidationError(format!(
            "analysis.precision must be at most {MAX_PRECISION}, got {}",
            config.analysis.precision
        )));
    }
    if config.analysis.max_paths == Some(0) {
        return Err(ConfigError::ValidationError(
            "analysis.max_paths must be at least 1".to_string(),
        ));
    }
    let inputs = &config.inputs;
    for (field, value) in [
        ("inputs.netlist", &inputs.netlist),
        ("inputs.hierarchy", &inputs.hierarchy),
        ("inputs.placement", &inputs.placement),
        ("inputs.timing", &inputs.timing),
    ] {
        if value.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::MissingField(field.to_string()));
        }
    }
    Ok(())
}
