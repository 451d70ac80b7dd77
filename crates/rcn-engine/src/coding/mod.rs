//! Analog-to-spike coders
//!
//! A coder turns a value in `[-1, 1]` into a fixed-size binary pattern made
//! of `num_components` parallel channels, each `base_code_length` slots
//! long. The layout never changes after construction, and `encode` writes
//! into a buffer owned by the coder, so encoding does not allocate.
//!
//! The available algorithms are a closed set selected through
//! [`SpikeCoderConfig`]:
//!
//! - **Bintree**: magnitude as a fixed-point binary fraction
//! - **Potentiometer**: thermometer code over geometric thresholds
//! - **Gaussian receptors**: one latency-coded spike per receptor
//! - **Directional arrows**: strength of recent upward/downward movement
//! - **Signal strength**: strength code of the magnitude, one channel per sign

mod arrows;
mod bintree;
mod gaussian;
mod potentiometer;
mod strength;

pub use arrows::{ArrowDirection, DirArrowsConfig};
pub use bintree::BintreeConfig;
pub use gaussian::GaussianReceptorsConfig;
pub use potentiometer::PotentiometerConfig;
pub use strength::{strength_code, strength_code_into, SignalStrengthConfig};

use crate::error::Result;
use rcn_math::Float;

use arrows::DirArrowsCoder;
use bintree::BintreeCoder;
use gaussian::GaussianReceptorsCoder;
use potentiometer::PotentiometerCoder;
use strength::SignalStrengthCoder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum bits of a fixed-point magnitude code
pub const MAX_ABS_VAL_CODE_LENGTH: usize = 32;

/// Maximum number of time slots of a latency/strength code
pub const MAX_TIME_POINTS: usize = 128;

/// Maximum number of virtual receptors
pub const MAX_RECEPTORS: usize = 1024;

/// Default lowest potentiometer threshold
pub const DEFAULT_LOWEST_THRESHOLD: Float = 1e-5;

/// Fixed-layout binary spike pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpikePattern {
    base_code_length: usize,
    num_components: usize,
    bits: Vec<u8>,
}

impl SpikePattern {
    /// Create an all-zero pattern
    pub fn new(base_code_length: usize, num_components: usize) -> Self {
        Self {
            base_code_length,
            num_components,
            bits: vec![0; base_code_length * num_components],
        }
    }

    /// Slots per component
    pub fn base_code_length(&self) -> usize {
        self.base_code_length
    }

    /// Number of parallel components
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Total number of slots
    pub fn total_code_length(&self) -> usize {
        self.bits.len()
    }

    /// Slots of one component
    pub fn component(&self, index: usize) -> &[u8] {
        let start = index * self.base_code_length;
        &self.bits[start..start + self.base_code_length]
    }

    pub(crate) fn component_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.base_code_length;
        &mut self.bits[start..start + self.base_code_length]
    }

    /// All slots, component after component
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of set slots
    pub fn spike_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b != 0).count()
    }

    /// Index of the first set slot of a component
    pub fn first_spike(&self, component: usize) -> Option<usize> {
        self.component(component).iter().position(|&b| b != 0)
    }

    /// Iterate over the components
    pub fn components(&self) -> impl Iterator<Item = &[u8]> {
        self.bits.chunks(self.base_code_length.max(1))
    }

    pub(crate) fn clear(&mut self) {
        self.bits.fill(0);
    }
}

/// Coder selection and parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpikeCoderConfig {
    /// Fixed-point binary fraction
    Bintree(BintreeConfig),
    /// Geometric threshold thermometer
    Potentiometer(PotentiometerConfig),
    /// Gaussian receptive fields
    GaussianReceptors(GaussianReceptorsConfig),
    /// Receptors sensitive to rising values
    UpDirArrows(DirArrowsConfig),
    /// Receptors sensitive to falling values
    DownDirArrows(DirArrowsConfig),
    /// Sign-split strength code
    SignalStrength(SignalStrengthConfig),
}

impl SpikeCoderConfig {
    /// Validate parameters of the selected coder
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Bintree(cfg) => cfg.validate(),
            Self::Potentiometer(cfg) => cfg.validate(),
            Self::GaussianReceptors(cfg) => cfg.validate(),
            Self::UpDirArrows(cfg) | Self::DownDirArrows(cfg) => cfg.validate(),
            Self::SignalStrength(cfg) => cfg.validate(),
        }
    }

    /// Short name of the selected coder
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bintree(_) => "Bintree",
            Self::Potentiometer(_) => "Potentiometer",
            Self::GaussianReceptors(_) => "GaussianReceptors",
            Self::UpDirArrows(_) => "UpDirArrows",
            Self::DownDirArrows(_) => "DownDirArrows",
            Self::SignalStrength(_) => "SignalStrength",
        }
    }
}

#[derive(Debug, Clone)]
enum CoderVariant {
    Bintree(BintreeCoder),
    Potentiometer(PotentiometerCoder),
    GaussianReceptors(GaussianReceptorsCoder),
    DirArrows(DirArrowsCoder),
    SignalStrength(SignalStrengthCoder),
}

/// Analog-to-spike coder
#[derive(Debug, Clone)]
pub struct SpikeCoder {
    variant: CoderVariant,
    pattern: SpikePattern,
}

impl SpikeCoder {
    /// Create a coder from a validated configuration
    pub fn new(config: &SpikeCoderConfig) -> Result<Self> {
        config.validate()?;
        let variant = match config {
            SpikeCoderConfig::Bintree(cfg) => CoderVariant::Bintree(BintreeCoder::new(cfg)),
            SpikeCoderConfig::Potentiometer(cfg) => {
                CoderVariant::Potentiometer(PotentiometerCoder::new(cfg))
            }
            SpikeCoderConfig::GaussianReceptors(cfg) => {
                CoderVariant::GaussianReceptors(GaussianReceptorsCoder::new(cfg))
            }
            SpikeCoderConfig::UpDirArrows(cfg) => {
                CoderVariant::DirArrows(DirArrowsCoder::new(cfg, ArrowDirection::Up))
            }
            SpikeCoderConfig::DownDirArrows(cfg) => {
                CoderVariant::DirArrows(DirArrowsCoder::new(cfg, ArrowDirection::Down))
            }
            SpikeCoderConfig::SignalStrength(cfg) => {
                CoderVariant::SignalStrength(SignalStrengthCoder::new(cfg))
            }
        };
        let (base, components) = match &variant {
            CoderVariant::Bintree(c) => c.layout(),
            CoderVariant::Potentiometer(c) => c.layout(),
            CoderVariant::GaussianReceptors(c) => c.layout(),
            CoderVariant::DirArrows(c) => c.layout(),
            CoderVariant::SignalStrength(c) => c.layout(),
        };
        log::debug!(
            "Created {} spike coder: {} component(s) x {} slot(s)",
            config.name(),
            components,
            base
        );
        Ok(Self {
            variant,
            pattern: SpikePattern::new(base, components),
        })
    }

    /// Clear internal history and the output pattern
    pub fn reset(&mut self) {
        if let CoderVariant::DirArrows(c) = &mut self.variant {
            c.reset();
        }
        self.pattern.clear();
    }

    /// Encode a value from `[-1, 1]`.
    ///
    /// NaN is treated as `0` and out-of-range values are clamped.
    pub fn encode(&mut self, value: Float) -> &SpikePattern {
        let value = sanitize(value);
        self.pattern.clear();
        match &mut self.variant {
            CoderVariant::Bintree(c) => c.encode_into(value, &mut self.pattern),
            CoderVariant::Potentiometer(c) => c.encode_into(value, &mut self.pattern),
            CoderVariant::GaussianReceptors(c) => c.encode_into(value, &mut self.pattern),
            CoderVariant::DirArrows(c) => c.encode_into(value, &mut self.pattern),
            CoderVariant::SignalStrength(c) => c.encode_into(value, &mut self.pattern),
        }
        &self.pattern
    }

    /// Pattern produced by the last `encode` call
    pub fn pattern(&self) -> &SpikePattern {
        &self.pattern
    }

    /// Slots per component
    pub fn base_code_length(&self) -> usize {
        self.pattern.base_code_length()
    }

    /// Number of parallel components
    pub fn num_components(&self) -> usize {
        self.pattern.num_components()
    }

    /// Total number of slots
    pub fn total_code_length(&self) -> usize {
        self.pattern.total_code_length()
    }
}

fn sanitize(value: Float) -> Float {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Map `[-1, 1]` onto `[0, 1]`
pub(crate) fn to_unit(value: Float) -> Float {
    ((value + 1.0) / 2.0).clamp(0.0, 1.0)
}
