//! Closed value intervals and linear rescaling between them

use crate::{Float, MathError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    min: Float,
    max: Float,
}

impl Interval {
    /// The unit interval `[0, 1]`
    pub const UNIT: Self = Self { min: 0.0, max: 1.0 };

    /// The symmetric unit interval `[-1, 1]`
    pub const SYMMETRIC_UNIT: Self = Self { min: -1.0, max: 1.0 };

    /// Create a new interval, rejecting reversed or non-finite bounds
    pub fn new(min: Float, max: Float) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(MathError::InvalidInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// Interval with bounds already known to be valid
    pub(crate) const fn from_bounds(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// Lower bound
    pub fn min(&self) -> Float {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> Float {
        self.max
    }

    /// Width of the interval
    pub fn span(&self) -> Float {
        self.max - self.min
    }

    /// Midpoint of the interval
    pub fn mid(&self) -> Float {
        self.min + self.span() / 2.0
    }

    /// Check whether `value` lies inside the interval
    pub fn contains(&self, value: Float) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the interval. NaN maps to the lower bound.
    pub fn clamp(&self, value: Float) -> Float {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Linearly map `value` from `from` into this interval.
    ///
    /// Values outside `from` are clamped first, so the result always lies
    /// inside `self`. A zero-width source interval maps to the midpoint.
    pub fn rescale(&self, value: Float, from: &Interval) -> Float {
        let span = from.span();
        if span <= 0.0 {
            return self.mid();
        }
        let ratio = (from.clamp(value) - from.min) / span;
        self.clamp(self.min + ratio * self.span())
    }

    /// Map `value` from this interval into `[0, 1]`
    pub fn normalize(&self, value: Float) -> Float {
        Self::UNIT.rescale(value, self)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::SYMMETRIC_UNIT
    }
}
