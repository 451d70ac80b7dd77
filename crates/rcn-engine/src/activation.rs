//! Activation units owned by hidden neurons

use crate::error::Result;
use rcn_math::{
    ActivationFunction, AnalogActivation, Float, Interval, MembraneParams, SpikingMembrane,
    SpikingModel,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Signal family of an activation, also used to pick a signal view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivationKind {
    /// Continuous output
    Analog,
    /// Binary spike output
    Spiking,
}

impl ActivationKind {
    /// Short name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Analog => "Analog",
            Self::Spiking => "Spiking",
        }
    }
}

/// Activation selection and parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ActivationConfig {
    /// Stateless transfer function
    Analog(AnalogActivation),
    /// Spiking membrane
    Spiking {
        /// Shared membrane parameters
        membrane: MembraneParams,
        /// Membrane dynamics
        model: SpikingModel,
    },
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self::Analog(AnalogActivation::TanH)
    }
}

impl ActivationConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Analog(f) => f.validate()?,
            Self::Spiking { membrane, model } => {
                membrane.validate()?;
                model.validate()?;
            }
        }
        Ok(())
    }

    /// Signal family of the configured activation
    pub fn kind(&self) -> ActivationKind {
        match self {
            Self::Analog(_) => ActivationKind::Analog,
            Self::Spiking { .. } => ActivationKind::Spiking,
        }
    }

    /// Short name of the configured activation
    pub fn name(&self) -> &'static str {
        match self {
            Self::Analog(f) => f.name(),
            Self::Spiking { model, .. } => model.name(),
        }
    }
}

/// Runtime activation unit
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    /// Stateless transfer function
    Analog(AnalogActivation),
    /// Stateful spiking membrane
    Spiking(SpikingMembrane),
}

impl Activation {
    /// Build an activation unit from its configuration
    pub fn new(config: &ActivationConfig) -> Result<Self> {
        config.validate()?;
        Ok(match *config {
            ActivationConfig::Analog(f) => Self::Analog(f),
            ActivationConfig::Spiking { membrane, model } => {
                Self::Spiking(SpikingMembrane::new(membrane, model)?)
            }
        })
    }

    /// Signal family
    pub fn kind(&self) -> ActivationKind {
        match self {
            Self::Analog(_) => ActivationKind::Analog,
            Self::Spiking(_) => ActivationKind::Spiking,
        }
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        if let Self::Spiking(membrane) = self {
            membrane.reset();
        }
    }

    /// Range used to normalize the internal state into `[0, 1]`
    pub fn state_range(&self) -> Interval {
        match self {
            Self::Analog(f) => f.output_range(),
            Self::Spiking(membrane) => membrane.state_range(),
        }
    }

    /// Normalize an internal state into `[0, 1]`
    pub fn normalize(&self, state: Float) -> Float {
        self.state_range().normalize(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_range() {
        let analog = Activation::new(&ActivationConfig::Analog(AnalogActivation::TanH)).unwrap();
        assert_eq!(analog.kind(), ActivationKind::Analog);
        assert_eq!(analog.normalize(0.0), 0.5);

        let spiking = Activation::new(&ActivationConfig::Spiking {
            membrane: MembraneParams::default(),
            model: SpikingModel::LeakyIf { time_scale: 8.0, resistance: 2.0 },
        })
        .unwrap();
        assert_eq!(spiking.kind(), ActivationKind::Spiking);
        assert_eq!(spiking.state_range(), Interval::new(-70.0, -50.0).unwrap());
    }

    #[test]
    fn test_invalid_config() {
        let cfg = ActivationConfig::Analog(AnalogActivation::ElliotSig { slope: -2.0 });
        assert!(Activation::new(&cfg).is_err());
        assert_eq!(cfg.kind(), ActivationKind::Analog);
    }
}
