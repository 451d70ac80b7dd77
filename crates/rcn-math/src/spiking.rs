//! Spiking membrane models
//!
//! A membrane integrates stimulation once per computation cycle and emits a
//! spike (`1.0`) when its potential reaches the firing threshold. After a
//! spike the potential returns to the reset value and the membrane stays
//! silent for a configurable number of refractory cycles.

use crate::{interval::Interval, require_finite, require_positive, Float, MathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Membrane potential is kept inside ±this bound so that strongly driven
/// quadratic models cannot overflow to infinity.
pub const POTENTIAL_BOUND: Float = 1e20;

/// Parameters shared by every membrane model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MembraneParams {
    /// Potential the membrane relaxes towards
    pub resting_potential: Float,
    /// Potential right after a spike
    pub reset_potential: Float,
    /// Potential at which a spike is emitted
    pub firing_threshold: Float,
    /// Number of silent cycles after a spike
    pub refractory_periods: u32,
    /// Multiplier applied to incoming stimulation
    pub stimuli_coeff: Float,
}

impl Default for MembraneParams {
    fn default() -> Self {
        Self {
            resting_potential: -70.0,
            reset_potential: -70.0,
            firing_threshold: -50.0,
            refractory_periods: 1,
            stimuli_coeff: 1.0,
        }
    }
}

impl MembraneParams {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        require_finite("resting_potential", self.resting_potential)?;
        require_finite("reset_potential", self.reset_potential)?;
        require_finite("firing_threshold", self.firing_threshold)?;
        require_positive("stimuli_coeff", self.stimuli_coeff)?;
        if self.reset_potential > self.resting_potential {
            return Err(MathError::invalid_parameter(
                "reset_potential",
                format!("{} (with resting_potential={})", self.reset_potential, self.resting_potential),
                "<= resting_potential",
            ));
        }
        if self.firing_threshold <= self.resting_potential {
            return Err(MathError::invalid_parameter(
                "firing_threshold",
                format!("{} (with resting_potential={})", self.firing_threshold, self.resting_potential),
                "> resting_potential",
            ));
        }
        Ok(())
    }
}

/// Membrane dynamics evaluated once per cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpikingModel {
    /// Integrate stimulation directly, decaying towards rest by a fixed fraction
    SimpleIf {
        /// Membrane resistance
        resistance: Float,
        /// Fraction of the distance to rest lost every cycle, in `[0, 1]`
        decay_rate: Float,
    },
    /// Leaky integrate-and-fire: dV = (-(V - V_rest) + R·I) / τ
    LeakyIf {
        /// Membrane time scale in cycles
        time_scale: Float,
        /// Membrane resistance
        resistance: Float,
    },
    /// Izhikevich two-variable model
    Izhikevich {
        /// Time scale of the recovery variable (a)
        recovery_time_scale: Float,
        /// Sensitivity of recovery to subthreshold potential (b)
        recovery_sensitivity: Float,
        /// Recovery increment after a spike (d)
        recovery_reset: Float,
    },
}

impl SpikingModel {
    /// Classic regular-spiking Izhikevich parameters
    pub const REGULAR_SPIKING: Self = Self::Izhikevich {
        recovery_time_scale: 0.02,
        recovery_sensitivity: 0.2,
        recovery_reset: 8.0,
    };

    /// Validate model parameters
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::SimpleIf { resistance, decay_rate } => {
                require_positive("resistance", resistance)?;
                if !(0.0..=1.0).contains(&decay_rate) {
                    return Err(MathError::invalid_parameter("decay_rate", decay_rate, "0.0..=1.0"));
                }
                Ok(())
            }
            Self::LeakyIf { time_scale, resistance } => {
                require_positive("time_scale", time_scale)?;
                require_positive("resistance", resistance)
            }
            Self::Izhikevich {
                recovery_time_scale,
                recovery_sensitivity,
                recovery_reset,
            } => {
                require_positive("recovery_time_scale", recovery_time_scale)?;
                require_positive("recovery_sensitivity", recovery_sensitivity)?;
                require_finite("recovery_reset", recovery_reset)
            }
        }
    }

    /// Short name of the model
    pub fn name(&self) -> &'static str {
        match self {
            Self::SimpleIf { .. } => "SimpleIF",
            Self::LeakyIf { .. } => "LeakyIF",
            Self::Izhikevich { .. } => "IzhikevichIF",
        }
    }
}

/// Stateful spiking membrane
#[derive(Debug, Clone, PartialEq)]
pub struct SpikingMembrane {
    params: MembraneParams,
    model: SpikingModel,
    potential: Float,
    recovery: Float,
    refractory_left: u32,
}

impl SpikingMembrane {
    /// Create a new membrane at rest
    pub fn new(params: MembraneParams, model: SpikingModel) -> Result<Self> {
        params.validate()?;
        model.validate()?;
        let mut membrane = Self {
            params,
            model,
            potential: 0.0,
            recovery: 0.0,
            refractory_left: 0,
        };
        membrane.reset();
        Ok(membrane)
    }

    /// Return to the resting state
    pub fn reset(&mut self) {
        self.potential = self.params.resting_potential;
        self.recovery = match self.model {
            SpikingModel::Izhikevich { recovery_sensitivity, .. } => {
                recovery_sensitivity * self.params.resting_potential
            }
            _ => 0.0,
        };
        self.refractory_left = 0;
    }

    /// Integrate one cycle of stimulation; returns `1.0` on a spike, `0.0` otherwise
    pub fn compute(&mut self, stimuli: Float) -> Float {
        if self.refractory_left > 0 {
            self.refractory_left -= 1;
            return 0.0;
        }

        let input = stimuli * self.params.stimuli_coeff;
        let rest = self.params.resting_potential;
        match self.model {
            SpikingModel::SimpleIf { resistance, decay_rate } => {
                self.potential = rest + (self.potential - rest) * (1.0 - decay_rate) + resistance * input;
            }
            SpikingModel::LeakyIf { time_scale, resistance } => {
                self.potential += (-(self.potential - rest) + resistance * input) / time_scale;
            }
            SpikingModel::Izhikevich {
                recovery_time_scale,
                recovery_sensitivity,
                ..
            } => {
                // Two half steps on v for numerical stability
                for _ in 0..2 {
                    let v = self.potential;
                    self.potential += 0.5 * (0.04 * v * v + 5.0 * v + 140.0 - self.recovery + input);
                    self.potential = self.potential.clamp(-POTENTIAL_BOUND, POTENTIAL_BOUND);
                }
                self.recovery +=
                    recovery_time_scale * (recovery_sensitivity * self.potential - self.recovery);
            }
        }
        self.potential = self.potential.clamp(-POTENTIAL_BOUND, POTENTIAL_BOUND);

        if self.potential >= self.params.firing_threshold {
            self.potential = self.params.reset_potential;
            if let SpikingModel::Izhikevich { recovery_reset, .. } = self.model {
                self.recovery += recovery_reset;
            }
            self.refractory_left = self.params.refractory_periods;
            1.0
        } else {
            0.0
        }
    }

    /// Current membrane potential
    pub fn potential(&self) -> Float {
        self.potential
    }

    /// Range used to normalize the membrane potential
    pub fn state_range(&self) -> Interval {
        Interval::from_bounds(self.params.reset_potential, self.params.firing_threshold)
    }

    /// Check whether the membrane is currently refractory
    pub fn is_refractory(&self) -> bool {
        self.refractory_left > 0
    }

    /// Membrane parameters
    pub fn params(&self) -> &MembraneParams {
        &self.params
    }

    /// Membrane model
    pub fn model(&self) -> &SpikingModel {
        &self.model
    }
}
