//! Analog activation functions for reservoir neurons
//!
//! Every function here has a bounded output range so that a neuron can
//! rescale its state into `[0, 1]` regardless of which function it uses.

use crate::{interval::Interval, require_positive, Float, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Activation function trait for neural computations
pub trait ActivationFunction {
    /// Apply activation function to input
    fn activate(&self, x: Float) -> Float;

    /// Compute derivative of activation function
    fn derivative(&self, x: Float) -> Float;

    /// Range of values `activate` can produce
    fn output_range(&self) -> Interval;

    /// Apply activation to a slice of values in-place
    fn activate_slice(&self, values: &mut [Float]) {
        for x in values {
            *x = self.activate(*x);
        }
    }
}

/// Stateless analog transfer functions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnalogActivation {
    /// Hyperbolic tangent: f(x) = tanh(x)
    TanH,
    /// Logistic sigmoid: f(x) = 1 / (1 + e^(-x))
    Sigmoid,
    /// Elliot sigmoid (softsign): f(x) = sx / (1 + |sx|)
    ElliotSig {
        /// Steepness of the curve
        slope: Float,
    },
    /// Inverse square root unit: f(x) = x / sqrt(1 + αx²)
    Isru {
        /// Alpha parameter, bounds the output to ±1/sqrt(α)
        alpha: Float,
    },
    /// Square nonlinearity, piecewise quadratic saturating at ±1
    Sqnl,
    /// Gaussian bump: f(x) = e^(-x²)
    Gaussian,
    /// Sine wave: f(x) = sin(x)
    Sinusoid,
}

impl Default for AnalogActivation {
    fn default() -> Self {
        Self::TanH
    }
}

impl AnalogActivation {
    /// Validate function parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::ElliotSig { slope } => require_positive("slope", slope),
            Self::Isru { alpha } => require_positive("alpha", alpha),
            _ => Ok(()),
        }
    }

    /// Short name of the function
    pub fn name(&self) -> &'static str {
        match self {
            Self::TanH => "TanH",
            Self::Sigmoid => "Sigmoid",
            Self::ElliotSig { .. } => "ElliotSig",
            Self::Isru { .. } => "ISRU",
            Self::Sqnl => "SQNL",
            Self::Gaussian => "Gaussian",
            Self::Sinusoid => "Sinusoid",
        }
    }
}

impl ActivationFunction for AnalogActivation {
    fn activate(&self, x: Float) -> Float {
        match *self {
            Self::TanH => x.tanh(),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::ElliotSig { slope } => {
                let sx = slope * x;
                sx / (1.0 + sx.abs())
            }
            Self::Isru { alpha } => x / (1.0 + alpha * x * x).sqrt(),
            Self::Sqnl => {
                if x > 2.0 {
                    1.0
                } else if x >= 0.0 {
                    x - x * x / 4.0
                } else if x >= -2.0 {
                    x + x * x / 4.0
                } else {
                    -1.0
                }
            }
            Self::Gaussian => (-x * x).exp(),
            Self::Sinusoid => x.sin(),
        }
    }

    fn derivative(&self, x: Float) -> Float {
        match *self {
            Self::TanH => {
                let t = x.tanh();
                1.0 - t * t
            }
            Self::Sigmoid => {
                let s = self.activate(x);
                s * (1.0 - s)
            }
            Self::ElliotSig { slope } => {
                let d = 1.0 + (slope * x).abs();
                slope / (d * d)
            }
            Self::Isru { alpha } => {
                let r = 1.0 / (1.0 + alpha * x * x).sqrt();
                r * r * r
            }
            Self::Sqnl => {
                if x > 2.0 || x < -2.0 {
                    0.0
                } else {
                    1.0 - x.abs() / 2.0
                }
            }
            Self::Gaussian => -2.0 * x * (-x * x).exp(),
            Self::Sinusoid => x.cos(),
        }
    }

    fn output_range(&self) -> Interval {
        match *self {
            Self::Sigmoid | Self::Gaussian => Interval::UNIT,
            Self::Isru { alpha } => {
                let bound = 1.0 / alpha.sqrt();
                Interval::from_bounds(-bound, bound)
            }
            Self::TanH | Self::ElliotSig { .. } | Self::Sqnl | Self::Sinusoid => {
                Interval::SYMMETRIC_UNIT
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AnalogActivation; 7] = [
        AnalogActivation::TanH,
        AnalogActivation::Sigmoid,
        AnalogActivation::ElliotSig { slope: 1.0 },
        AnalogActivation::Isru { alpha: 4.0 },
        AnalogActivation::Sqnl,
        AnalogActivation::Gaussian,
        AnalogActivation::Sinusoid,
    ];

    #[test]
    fn test_outputs_stay_in_range() {
        for f in ALL {
            let range = f.output_range();
            for i in -100..=100 {
                let x = i as Float * 0.37;
                let y = f.activate(x);
                assert!(range.contains(y), "{} produced {} outside {:?}", f.name(), y, range);
            }
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-6;
        for f in ALL {
            for &x in &[-1.3, -0.4, 0.25, 1.1] {
                let numeric = (f.activate(x + h) - f.activate(x - h)) / (2.0 * h);
                assert!(
                    (numeric - f.derivative(x)).abs() < 1e-4,
                    "{} derivative mismatch at {}",
                    f.name(),
                    x
                );
            }
        }
    }

    #[test]
    fn test_validation() {
        assert!(AnalogActivation::ElliotSig { slope: 0.0 }.validate().is_err());
        assert!(AnalogActivation::Isru { alpha: -1.0 }.validate().is_err());
        assert!(AnalogActivation::Isru { alpha: 1.0 }.validate().is_ok());
        assert!(AnalogActivation::TanH.validate().is_ok());
    }

    #[test]
    fn test_activate_slice() {
        let mut values = [0.0, 100.0, -100.0];
        AnalogActivation::Sqnl.activate_slice(&mut values);
        assert_eq!(values, [0.0, 1.0, -1.0]);
    }
}
