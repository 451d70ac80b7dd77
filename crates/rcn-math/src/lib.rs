//! Numeric building blocks for reservoir neuron dynamics
//!
//! This crate provides the pieces a reservoir neuron delegates to: analog
//! transfer functions, spiking membrane models, value intervals used to
//! normalize heterogeneous activation states, and running statistics.

#![deny(missing_docs)]
#![warn(clippy::all)]

use thiserror::Error;

pub mod activation;
pub mod interval;
pub mod spiking;
pub mod stats;

pub use activation::{ActivationFunction, AnalogActivation};
pub use interval::Interval;
pub use spiking::{MembraneParams, SpikingMembrane, SpikingModel};
pub use stats::BasicStat;

/// Floating point type used throughout the engine
pub type Float = f64;

/// Result type for math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Errors raised while validating numeric parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Parameter outside of its allowed domain
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: &'static str,
        /// Offending value
        value: String,
        /// Constraint description
        constraint: &'static str,
    },

    /// Interval whose bounds are reversed or not finite
    #[error("Invalid interval [{min}, {max}] (expected finite bounds with min <= max)")]
    InvalidInterval {
        /// Lower bound
        min: Float,
        /// Upper bound
        max: Float,
    },
}

impl MathError {
    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: &'static str,
        value: impl ToString,
        constraint: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
            constraint,
        }
    }
}

/// Fail with [`MathError::InvalidParameter`] unless `value` is finite and `> 0`
pub(crate) fn require_positive(parameter: &'static str, value: Float) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MathError::invalid_parameter(parameter, value, "> 0.0"))
    }
}

/// Fail with [`MathError::InvalidParameter`] unless `value` is finite
pub(crate) fn require_finite(parameter: &'static str, value: Float) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MathError::invalid_parameter(parameter, value, "finite"))
    }
}
