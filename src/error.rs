//! Error types for the sanctions network core.
//!
//! All errors are strongly typed using thiserror. Only configuration problems
//! and worker failures are errors: empty inputs, dangling references and
//! unreachable nodes are ordinary outcomes reported through return values.

use thiserror::Error;

/// Validation errors raised for invalid configuration or parameters.
///
/// These are fatal and surfaced immediately. Values are never clamped.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A 0-100 threshold outside its range.
    #[error("Threshold '{name}' value {value} is out of range [0, 100]")]
    ThresholdOutOfRange {
        /// Setting name.
        name: String,
        /// Rejected value.
        value: i64,
    },

    /// An identifier kind name that maps to no [`crate::IdentifierKind`].
    #[error("Unknown identifier kind: '{kind}'")]
    UnknownIdentifierKind {
        /// The unrecognized name.
        kind: String,
    },

    /// Any other out-of-range setting.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidField {
        /// Setting name.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An environment override that does not parse.
    #[error("Environment variable {name}='{value}' is invalid: {reason}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Raw value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl ValidationError {
    /// Checks that a 0..=100 threshold is in range.
    pub fn check_threshold(name: &str, value: i64) -> Result<u32, Self> {
        if (0..=100).contains(&value) {
            // Range checked above.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(value as u32)
        } else {
            Err(Self::ThresholdOutOfRange {
                name: name.to_string(),
                value,
            })
        }
    }
}

/// Execution errors from the parallel matching runtime.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A matcher thread panicked.
    #[error("Matcher worker {worker} panicked")]
    WorkerPanicked {
        /// Index of the first worker that panicked.
        worker: usize,
    },

    /// A work or result channel closed early.
    #[error("Channel disconnected during {stage}")]
    Disconnected {
        /// Pipeline stage that observed the disconnect.
        stage: String,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum SanctionsError {
    /// Invalid configuration or parameters.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Parallel matcher failure.
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Configuration file could not be read.
    #[error("Failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Configuration file is not valid JSON for [`crate::ResolutionConfig`].
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Unexpected runtime failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Description.
        message: String,
    },
}

impl SanctionsError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an execution error.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// Returns true if this is a configuration loading error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::ConfigIo(_) | Self::ConfigParse(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for sanctions network operations.
pub type SanctionsResult<T> = Result<T, SanctionsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_out_of_range_message() {
        let err = ValidationError::ThresholdOutOfRange {
            name: "name_match_threshold".to_string(),
            value: 150,
        };
        let msg = format!("{err}");
        assert!(msg.contains("name_match_threshold"));
        assert!(msg.contains("150"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_check_threshold_bounds() {
        assert_eq!(ValidationError::check_threshold("t", 0).unwrap(), 0);
        assert_eq!(ValidationError::check_threshold("t", 100).unwrap(), 100);
        assert!(ValidationError::check_threshold("t", -1).is_err());
        assert!(ValidationError::check_threshold("t", 101).is_err());
    }

    #[test]
    fn test_unknown_identifier_kind() {
        let err = ValidationError::UnknownIdentifierKind {
            kind: "passport".to_string(),
        };
        assert!(format!("{err}").contains("passport"));
    }

    #[test]
    fn test_sanctions_error_from_validation() {
        let err: SanctionsError = ValidationError::InvalidField {
            field: "max_path_depth".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_execution());
    }

    #[test]
    fn test_sanctions_error_from_execution() {
        let err: SanctionsError = ExecutionError::WorkerPanicked { worker: 3 }.into();
        assert!(err.is_execution());
        assert!(format!("{err}").contains("worker 3"));
    }

    #[test]
    fn test_sanctions_error_internal() {
        let err = SanctionsError::internal("unexpected state");
        assert!(err.is_internal());
        assert!(format!("{err}").contains("unexpected state"));
    }

    #[test]
    fn test_sanctions_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: SanctionsError = json_err.into();
        assert!(err.is_config());
    }
}
