//! Range checks shared by the engine config and scores.

use thiserror::Error;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric field outside its allowed range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the field.
        field: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Field that fails a non-range rule.
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Name of the field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Collects failures so a file reports all of its problems in one go.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Require `min <= value <= max`. NaN always fails.
    pub(crate) fn range(&mut self, field: impl Into<String>, value: f64, min: f64, max: f64) {
        if !(value >= min && value <= max) {
            self.errors.push(ValidationError::OutOfRange {
                field: field.into(),
                value,
                min,
                max,
            });
        }
    }

    pub(crate) fn require(&mut self, ok: bool, field: impl Into<String>, reason: &str) {
        if !ok {
            self.errors.push(ValidationError::Invalid {
                field: field.into(),
                reason: reason.to_string(),
            });
        }
    }

    pub(crate) fn finish(mut self) -> ValidationResult<()> {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ValidationError::Multiple(self.errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_checks_pass() {
        assert_eq!(Checks::new().finish(), Ok(()));
    }

    #[test]
    fn single_failure_is_not_wrapped() {
        let mut checks = Checks::new();
        checks.range("volume", 1.5, 0.0, 1.0);
        assert!(matches!(
            checks.finish(),
            Err(ValidationError::OutOfRange { ref field, .. }) if field == "volume"
        ));
    }

    #[test]
    fn nan_is_out_of_range() {
        let mut checks = Checks::new();
        checks.range("volume", f64::NAN, 0.0, 1.0);
        assert!(checks.finish().is_err());
    }

    #[test]
    fn failures_are_collected() {
        let mut checks = Checks::new();
        checks.range("volume", -1.0, 0.0, 1.0);
        checks.require(false, "channels", "must be at least 1");
        let err = checks.finish().unwrap_err();
        match &err {
            ValidationError::Multiple(all) => assert_eq!(all.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
        let msg = err.to_string();
        assert!(msg.contains("volume"));
        assert!(msg.contains("invalid value for 'channels': must be at least 1"));
    }
}
