//! Strength code and the signal-strength coder
//!
//! The strength code represents `x` in `[0, 1]` by both frequency and
//! latency: a stronger `x` sets more slots and sets the first one earlier.
//! Spike `k` starts at a far virtual position `(k + 1)·L + 1` and is pulled
//! linearly towards slot `k` as `x` approaches 1; it is written only if it
//! lands inside the `L` real slots.

use super::{SpikePattern, MAX_TIME_POINTS};
use crate::error::{check_range, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Write the strength code of `x` into `out`, overwriting its contents
pub fn strength_code_into(x: Float, out: &mut [u8]) {
    out.fill(0);
    let len = out.len();
    if len == 0 {
        return;
    }
    let x = if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) };
    let l = len as Float;
    for k in 0..len {
        let near = k as Float;
        let far = (near + 1.0) * l + 1.0;
        let position = (far - x * (far - near)).round();
        if position >= l {
            // positions grow with k
            break;
        }
        out[position as usize] = 1;
    }
}

/// Strength code of `x` with `len` slots
pub fn strength_code(x: Float, len: usize) -> Vec<u8> {
    let mut out = vec![0; len];
    strength_code_into(x, &mut out);
    out
}

/// Parameters of the signal-strength coder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalStrengthConfig {
    /// Slots per sign component, `1..=128`
    pub code_length: usize,
}

impl Default for SignalStrengthConfig {
    fn default() -> Self {
        Self { code_length: 8 }
    }
}

impl SignalStrengthConfig {
    /// Create new signal-strength parameters with validation
    pub fn new(code_length: usize) -> Result<Self> {
        let cfg = Self { code_length };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        check_range("code_length", self.code_length, 1, MAX_TIME_POINTS)
    }
}

#[derive(Debug, Clone)]
pub(super) struct SignalStrengthCoder {
    code_length: usize,
}

impl SignalStrengthCoder {
    pub(super) fn new(cfg: &SignalStrengthConfig) -> Self {
        Self {
            code_length: cfg.code_length,
        }
    }

    pub(super) fn layout(&self) -> (usize, usize) {
        (self.code_length, 2)
    }

    /// Component 0 carries non-negative values, component 1 negative ones
    pub(super) fn encode_into(&self, value: Float, pattern: &mut SpikePattern) {
        let component = usize::from(value < 0.0);
        strength_code_into(value.abs(), pattern.component_mut(component));
    }
}
