//! Error types for the engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while building or driving engine components
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Numeric parameter rejected by the math layer
    #[error("Math error: {source}")]
    Math {
        #[from]
        /// Source math error
        source: rcn_math::MathError,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for invalid configuration
        reason: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Signaling restriction that the activation can never honor
    #[error("Signaling restriction {restriction} is incompatible with {activation} activation")]
    IncompatibleRestriction {
        /// Requested restriction
        restriction: String,
        /// Activation kind
        activation: String,
    },

    /// Output buffer cannot hold the requested values
    #[error("Buffer too small: {required} values required, {available} available")]
    BufferTooSmall {
        /// Slots required
        required: usize,
        /// Slots available
        available: usize,
    },
}

impl EngineError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an incompatible restriction error
    pub fn incompatible_restriction(
        restriction: impl Into<String>,
        activation: impl Into<String>,
    ) -> Self {
        Self::IncompatibleRestriction {
            restriction: restriction.into(),
            activation: activation.into(),
        }
    }

    /// Create a buffer too small error
    pub fn buffer_too_small(required: usize, available: usize) -> Self {
        Self::BufferTooSmall {
            required,
            available,
        }
    }
}

/// Fail unless `value` lies in `min..=max`
pub(crate) fn check_range(parameter: &str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(EngineError::invalid_parameter(
            parameter,
            value.to_string(),
            format!("{}..={}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = EngineError::invalid_config("no predictors");
        assert!(matches!(err, EngineError::InvalidConfiguration { .. }));

        let err = EngineError::invalid_parameter("abs_val_code_length", "0", "1..=32");
        assert!(matches!(err, EngineError::InvalidParameter { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::buffer_too_small(8, 3);
        let msg = format!("{}", err);
        assert!(msg.contains("8 values required"));

        let err = EngineError::incompatible_restriction("AnalogOnly", "Spiking");
        assert!(err.to_string().contains("AnalogOnly"));
    }

    #[test]
    fn test_math_error_conversion() {
        let err: EngineError = rcn_math::MathError::invalid_parameter("alpha", 0.0, "> 0.0").into();
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("len", 1, 1, 32).is_ok());
        assert!(check_range("len", 32, 1, 32).is_ok());
        let msg = check_range("len", 33, 1, 32).unwrap_err().to_string();
        assert!(msg.contains("len") && msg.contains("1..=32"), "unexpected: {}", msg);
    }
}
