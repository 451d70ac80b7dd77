//! Running descriptive statistics
//!
//! [`BasicStat`] accumulates samples one at a time without storing them,
//! which makes it suitable for per-cycle neuron statistics.

use crate::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Running count, sum, extremes and spread of a sample stream
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BasicStat {
    count: u64,
    sum: Float,
    sum_of_squares: Float,
    min: Float,
    max: Float,
}

impl Default for BasicStat {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicStat {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            min: 0.0,
            max: 0.0,
        }
    }

    /// Discard all samples
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Add a sample. Non-finite samples are ignored.
    pub fn add(&mut self, value: Float) {
        if !value.is_finite() {
            return;
        }
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
        self.sum_of_squares += value * value;
    }

    /// Add every sample of a slice
    pub fn add_all(&mut self, values: &[Float]) {
        for &v in values {
            self.add(v);
        }
    }

    /// Number of samples
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if no samples were added
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sum of samples
    pub fn sum(&self) -> Float {
        self.sum
    }

    /// Smallest sample (0 when empty)
    pub fn min(&self) -> Float {
        self.min
    }

    /// Largest sample (0 when empty)
    pub fn max(&self) -> Float {
        self.max
    }

    /// Difference between largest and smallest sample
    pub fn span(&self) -> Float {
        self.max - self.min
    }

    /// Arithmetic mean (0 when empty)
    pub fn mean(&self) -> Float {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as Float
        }
    }

    /// Population variance (0 when empty)
    pub fn variance(&self) -> Float {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_of_squares / self.count as Float - mean * mean).max(0.0)
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> Float {
        self.variance().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stat() {
        let stat = BasicStat::new();
        assert!(stat.is_empty());
        assert_eq!(stat.mean(), 0.0);
        assert_eq!(stat.std_dev(), 0.0);
        assert_eq!(stat.min(), 0.0);
        assert_eq!(stat.max(), 0.0);
    }

    #[test]
    fn test_running_values() {
        let mut stat = BasicStat::new();
        stat.add_all(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stat.count(), 8);
        assert_eq!(stat.mean(), 5.0);
        assert!((stat.std_dev() - 2.0).abs() < 1e-12);
        assert_eq!(stat.min(), 2.0);
        assert_eq!(stat.max(), 9.0);
        assert_eq!(stat.span(), 7.0);
    }

    #[test]
    fn test_negative_only_extremes() {
        let mut stat = BasicStat::new();
        stat.add(-3.0);
        stat.add(-1.0);
        assert_eq!(stat.max(), -1.0);
        assert_eq!(stat.min(), -3.0);
    }

    #[test]
    fn test_non_finite_ignored_and_reset() {
        let mut stat = BasicStat::new();
        stat.add(Float::NAN);
        stat.add(Float::INFINITY);
        assert!(stat.is_empty());

        stat.add(1.0);
        stat.reset();
        stat.reset();
        assert_eq!(stat, BasicStat::new());
    }
}
