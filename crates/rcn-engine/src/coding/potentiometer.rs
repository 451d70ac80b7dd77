//! Geometric-threshold thermometer coder

use super::{to_unit, SpikePattern, DEFAULT_LOWEST_THRESHOLD, MAX_ABS_VAL_CODE_LENGTH};
use crate::error::{check_range, EngineError, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of the potentiometer coder
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PotentiometerConfig {
    /// Number of thresholds, `1..=32`
    pub abs_val_code_length: usize,
    /// Most sensitive threshold, in `(0, 1)`
    pub lowest_threshold: Float,
    /// Encode `|value|` into the positive or negative half of a doubled buffer
    /// instead of encoding `(value + 1) / 2`
    pub halved: bool,
}

impl Default for PotentiometerConfig {
    fn default() -> Self {
        Self {
            abs_val_code_length: 16,
            lowest_threshold: DEFAULT_LOWEST_THRESHOLD,
            halved: true,
        }
    }
}

impl PotentiometerConfig {
    /// Create new potentiometer parameters with validation
    pub fn new(abs_val_code_length: usize, lowest_threshold: Float, halved: bool) -> Result<Self> {
        let cfg = Self {
            abs_val_code_length,
            lowest_threshold,
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
        )?;
        if !(self.lowest_threshold > 0.0 && self.lowest_threshold < 1.0) {
            return Err(EngineError::invalid_parameter(
                "lowest_threshold",
                self.lowest_threshold.to_string(),
                "0.0 < x < 1.0",
            ));
        }
        Ok(())
    }

    /// Threshold table: geometric from `lowest_threshold` up to `1`,
    /// most sensitive first
    pub fn thresholds(&self) -> Vec<Float> {
        let n = self.abs_val_code_length;
        if n == 1 {
            return vec![self.lowest_threshold];
        }
        let step = (1.0 / self.lowest_threshold).powf(1.0 / (n - 1) as Float);
        (0..n)
            .map(|i| self.lowest_threshold * step.powi(i as i32))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub(super) struct PotentiometerCoder {
    thresholds: Vec<Float>,
    halved: bool,
}

impl PotentiometerCoder {
    pub(super) fn new(cfg: &PotentiometerConfig) -> Self {
        Self {
            thresholds: cfg.thresholds(),
            halved: cfg.halved,
        }
    }

    pub(super) fn layout(&self) -> (usize, usize) {
        let n = self.thresholds.len();
        if self.halved {
            (n * 2, 1)
        } else {
            (n, 1)
        }
    }

    pub(super) fn encode_into(&self, value: Float, pattern: &mut SpikePattern) {
        let n = self.thresholds.len();
        let bits = pattern.component_mut(0);
        if self.halved {
            let half = if value < 0.0 { &mut bits[n..] } else { &mut bits[..n] };
            self.fill(value.abs(), half);
        } else {
            self.fill(to_unit(value), bits);
        }
    }

    fn fill(&self, magnitude: Float, out: &mut [u8]) {
        for (slot, &threshold) in out.iter_mut().zip(&self.thresholds) {
            *slot = u8::from(magnitude > threshold);
        }
    }
}
