//! Error types for simulation construction and configuration

use std::path::PathBuf;

/// Errors surfaced while building bodies or loading configuration.
///
/// Interaction misses (ray/plane or ray/geometry) are not errors; they are
/// `Option`-shaped outcomes handled locally by the interaction controller.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid parameter '{field}': {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("failed to read config '{path}'")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl SimError {
    pub fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type using SimError
pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = SimError::invalid_parameter("mass", "must be positive");
        let msg = format!("{}", err);
        assert!(msg.contains("mass"));
        assert!(msg.contains("must be positive"));
    }
}
