//! Error types for configuration loading and input resolution.

/// Errors that can occur when loading a `vtrace.toml` or resolving its inputs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration or walking the search directory.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// A required report was neither named nor found in the search directory.
    #[error("no {kind} file given and none found under '{search_dir}'")]
    MissingInput {
        /// Which input is missing (e.g. "placement").
        kind: String,
        /// The directory that was searched.
        search_dir: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_field() {
        let err = ConfigError::MissingField("inputs.timing".to_string());
        assert_eq!(format!("{err}"), "missing required field: inputs.timing");
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("precision must be at most 12".to_string());
        assert_eq!(
            format!("{err}"),
            "validation error: precision must be at most 12"
        );
    }

    #[test]
    fn display_missing_input() {
        let err = ConfigError::MissingInput {
            kind: "packed netlist".to_string(),
            search_dir: "run/latest".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "no packed netlist file given and none found under 'run/latest'"
        );
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let display = format!("{}", ConfigError::IoError(io_err));
        assert!(display.starts_with("failed to read configuration:"));
    }
}
