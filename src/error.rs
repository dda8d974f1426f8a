//! Error types for kernel and benchmark setup failures.
//!
//! Kernels fail only on preconditions: mismatched operand shapes or a
//! non-positive block size / stride. Numeric disagreement between two
//! kernels is not an error; it comes back as a
//! [`Verdict`](crate::harness::Verdict) on the comparison.

use std::fmt;

/// Errors returned by the matrix-level entry points and the config loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operand dimensions don't fit the requested operation.
    ShapeMismatch {
        /// The operation that rejected its operands.
        op: &'static str,
        /// Shape the operation needed, as `rows x cols`.
        expected: (usize, usize),
        /// Shape it was handed.
        found: (usize, usize),
    },
    /// A size, block edge, stride or range bound that can't be used.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value, rendered.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A `CACHEBLOCK_*` environment override couldn't be parsed.
    Config {
        /// The environment variable.
        key: String,
        /// Its raw value.
        value: String,
        /// Human-readable error message.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ShapeMismatch {
                op,
                expected,
                found,
            } => write!(
                f,
                "{}: shape mismatch (expected {}x{}, found {}x{})",
                op, expected.0, expected.1, found.0, found.1
            ),
            Error::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid {} = {}: {}", name, value, reason),
            Error::Config { key, value, reason } => {
                write!(f, "bad config {}={:?}: {}", key, value, reason)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Creates a shape mismatch error.
pub fn shape_mismatch(op: &'static str, expected: (usize, usize), found: (usize, usize)) -> Error {
    Error::ShapeMismatch {
        op,
        expected,
        found,
    }
}

/// Creates an invalid parameter error.
pub fn invalid_parameter(
    name: &'static str,
    value: impl fmt::Display,
    reason: &'static str,
) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason,
    }
}

/// Creates a config error.
pub fn config_error(
    key: impl Into<String>,
    value: impl Into<String>,
    reason: impl Into<String>,
) -> Error {
    Error::Config {
        key: key.into(),
        value: value.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_display() {
        let error = shape_mismatch("multiply", (3, 4), (5, 4));
        let display = error.to_string();
        assert!(display.contains("multiply"));
        assert!(display.contains("expected 3x4"));
        assert!(display.contains("found 5x4"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = invalid_parameter("block_size", 0, "must be at least 1");
        assert_eq!(
            error.to_string(),
            "invalid block_size = 0: must be at least 1"
        );
    }

    #[test]
    fn test_config_display() {
        let error = config_error("CACHEBLOCK_SEED", "abc", "invalid digit found in string");
        let display = error.to_string();
        assert!(display.contains("CACHEBLOCK_SEED"));
        assert!(display.contains("\"abc\""));
    }

    #[test]
    fn test_error_equality() {
        let error1 = invalid_parameter("stride", 0, "must be at least 1");
        let error2 = invalid_parameter("stride", 0, "must be at least 1");
        let error3 = invalid_parameter("stride", 3, "must be at least 1");

        assert_eq!(error1, error2);
        assert_ne!(error1, error3);
    }

    #[test]
    fn test_error_trait_implementation() {
        let error = shape_mismatch("transpose", (2, 2), (2, 3));
        let _: &dyn std::error::Error = &error;
        assert!(std::error::Error::source(&error).is_none());
    }
}
