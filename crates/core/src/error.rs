//! Error types for unit handling, registry construction and scaling
//!
//! Every failure in this crate is deterministic: the same inputs always fail
//! the same way, so nothing here is retried. Errors are surfaced to the caller
//! immediately.

use crate::core_types::BaseDimension;

/// Errors produced by the unit layer, the scale factories and the
/// conversion operations
#[derive(Debug, Clone, PartialEq)]
pub enum ScalingError {
    /// Invalid registry input (e.g. a unit handed to the dimensionless system)
    Validation(String),
    /// Unit decomposes into a basis dimension the registry has no scale for
    DimensionMismatch {
        /// Unit that failed to decompose
        unit: String,
        /// Offending basis dimension
        dimension: BaseDimension,
    },
    /// Conversion between units of different physical dimension
    IncompatibleUnits {
        /// Source unit
        from: String,
        /// Target unit
        to: String,
    },
    /// Malformed unit expression or unknown unit symbol
    UnitParse {
        /// Text that failed to parse
        input: String,
        /// What went wrong
        reason: String,
    },
    /// Arithmetic between a dimensional and a non-dimensional wrapper
    StateMismatch,
    /// Payload index outside the stored array
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Payload length
        len: usize,
    },
    /// Scale configuration could not be read or parsed
    Config(String),
    /// Unit table was already fixed when custom units were registered
    AlreadyInitialized,
}

impl std::fmt::Display for ScalingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalingError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            ScalingError::DimensionMismatch { unit, dimension } => write!(
                f,
                "Unit '{unit}' has a {dimension} component; only length, mass, time, temperature and amount can be scaled"
            ),
            ScalingError::IncompatibleUnits { from, to } => {
                write!(f, "Cannot convert '{from}' to '{to}': dimensions differ")
            }
            ScalingError::UnitParse { input, reason } => {
                write!(f, "Failed to parse unit '{input}': {reason}")
            }
            ScalingError::StateMismatch => write!(
                f,
                "Cannot combine a dimensional quantity with a non-dimensional one"
            ),
            ScalingError::IndexOutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds for payload of length {len}")
            }
            ScalingError::Config(msg) => write!(f, "Invalid scale configuration: {msg}"),
            ScalingError::AlreadyInitialized => {
                write!(f, "Unit table is already initialized")
            }
        }
    }
}

impl std::error::Error for ScalingError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ScalingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = ScalingError::Validation("quantity length should not have units".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: quantity length should not have units"
        );
    }

    #[test]
    fn test_dimension_mismatch_names_dimension() {
        let err = ScalingError::DimensionMismatch {
            unit: "A".into(),
            dimension: BaseDimension::Current,
        };
        assert!(err.to_string().contains("current"));
    }
}
