//! Fixed-point binary fraction coder

use super::{to_unit, SpikePattern, MAX_ABS_VAL_CODE_LENGTH};
use crate::error::{check_range, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of the bintree coder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BintreeConfig {
    /// Number of fraction bits, `1..=32`
    pub abs_val_code_length: usize,
    /// Encode `|value|` into the positive or negative half of a doubled buffer
    /// instead of encoding `(value + 1) / 2`
    pub halved: bool,
}

impl Default for BintreeConfig {
    fn default() -> Self {
        Self {
            abs_val_code_length: 8,
            halved: false,
        }
    }
}

impl BintreeConfig {
    /// Create new bintree parameters with validation
    pub fn new(abs_val_code_length: usize, halved: bool) -> Result<Self> {
        let cfg = Self {
            abs_val_code_length,
            halved,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        check_range(
            "abs_val_code_length",
            self.abs_val_code_length,
            1,
            MAX_ABS_VAL_CODE_LENGTH,
        )
    }
}

#[derive(Debug, Clone)]
pub(super) struct BintreeCoder {
    code_length: usize,
    halved: bool,
    levels: u64,
}

impl BintreeCoder {
    pub(super) fn new(cfg: &BintreeConfig) -> Self {
        Self {
            code_length: cfg.abs_val_code_length,
            halved: cfg.halved,
            levels: 1u64 << cfg.abs_val_code_length,
        }
    }

    pub(super) fn layout(&self) -> (usize, usize) {
        if self.halved {
            (self.code_length * 2, 1)
        } else {
            (self.code_length, 1)
        }
    }

    pub(super) fn encode_into(&self, value: Float, pattern: &mut SpikePattern) {
        let bits = pattern.component_mut(0);
        if self.halved {
            let (positive, negative) = bits.split_at_mut(self.code_length);
            let half = if value < 0.0 { negative } else { positive };
            self.write_fraction(value.abs(), half);
        } else {
            self.write_fraction(to_unit(value), bits);
        }
    }

    /// Write `x` in `[0, 1]` as a binary fraction, most significant bit first
    fn write_fraction(&self, x: Float, out: &mut [u8]) {
        let quantized = ((x * self.levels as Float) as u64).min(self.levels - 1);
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = ((quantized >> (self.code_length - 1 - i)) & 1) as u8;
        }
    }
}
