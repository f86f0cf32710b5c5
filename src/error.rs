//! Error types for sparql-temporal.
//!
//! All errors are strongly typed using thiserror. Validation errors are
//! raised at the input boundary (parse/normalize) and stop a value from being
//! accepted; compile errors signal a caller contract violation.

use thiserror::Error;

/// Validation errors that occur while turning raw user text into a range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither side of the input is a date.
    #[error("No valid date received (start: '{start}', stop: '{stop}')")]
    InvalidDate {
        /// Raw start text.
        start: String,
        /// Raw stop text.
        stop: String,
    },

    /// Both sides are dates but the start comes after the stop.
    #[error("Invalid range: start ({start}) is after stop ({stop})")]
    RangeOrder {
        /// Parsed start.
        start: String,
        /// Parsed stop.
        stop: String,
    },

    /// Text or fields that do not name a calendar instant.
    #[error("Invalid instant: {reason}")]
    InvalidInstant {
        /// What was wrong.
        reason: String,
    },

    /// A malformed value for a named field.
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: String,
        /// What was wrong.
        reason: String,
    },
}

/// Errors raised while compiling a range into graph patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The range has no bound at all.
    #[error("Cannot compile a range with neither a start nor a stop bound")]
    EmptyRange,

    /// Not a SPARQL variable name.
    #[error("Invalid variable name '{name}'")]
    InvalidVariable {
        /// The rejected name.
        name: String,
    },

    /// Not a usable IRI or prefixed name.
    #[error("Invalid IRI '{iri}'")]
    InvalidIri {
        /// The rejected value.
        iri: String,
    },

    /// No accepted value at this index.
    #[error("No accepted value at index {index} (holding {len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of accepted values.
        len: usize,
    },
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed or unknown configuration content.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// Parser message.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read configuration from {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// OS error message.
        message: String,
    },

    /// Granularity other than `day` or `year`.
    #[error("Unknown granularity '{value}' (expected 'day' or 'year')")]
    UnknownGranularity {
        /// The rejected value.
        value: String,
    },
}

/// Top-level error type for sparql-temporal.
#[derive(Debug, Error)]
pub enum TemporalError {
    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Compilation failed.
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// Configuration failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TemporalError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a compile error.
    #[must_use]
    pub const fn is_compile(&self) -> bool {
        matches!(self, Self::Compile(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if the user can fix this by editing their input.
    ///
    /// Compile and configuration errors are programming or deployment
    /// mistakes and should not be shown to the user.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(ValidationError::InvalidDate { .. } | ValidationError::RangeOrder { .. })
        )
    }
}

/// Result type alias for sparql-temporal operations.
pub type TemporalResult<T> = Result<T, TemporalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_invalid_date() {
        let err = ValidationError::InvalidDate {
            start: "abc".to_string(),
            stop: String::new(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("No valid date"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_validation_error_range_order() {
        let err = ValidationError::RangeOrder {
            start: "2021-05-05T00:00:00Z".to_string(),
            stop: "2019-01-01T23:59:59Z".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("after"));
        assert!(msg.contains("2021-05-05"));
    }

    #[test]
    fn test_compile_error_index() {
        let err = CompileError::IndexOutOfRange { index: 3, len: 1 };
        let msg = format!("{err}");
        assert!(msg.contains('3'));
        assert!(msg.contains("holding 1"));
    }

    #[test]
    fn test_temporal_error_from_validation() {
        let err: TemporalError = ValidationError::RangeOrder {
            start: "a".to_string(),
            stop: "b".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(err.is_user_facing());
        assert!(!err.is_compile());
    }

    #[test]
    fn test_temporal_error_from_compile() {
        let err: TemporalError = CompileError::EmptyRange.into();
        assert!(err.is_compile());
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_temporal_error_from_config() {
        let err: TemporalError = ConfigError::UnknownGranularity {
            value: "month".to_string(),
        }
        .into();
        assert!(err.is_config());
        assert!(format!("{err}").contains("month"));
    }

    #[test]
    fn test_invalid_instant_is_not_user_facing() {
        let err: TemporalError = ValidationError::InvalidInstant {
            reason: "month 13".to_string(),
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_user_facing());
    }
}
