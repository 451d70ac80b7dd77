//! Gaussian receptive field coder

use super::{to_unit, SpikePattern, MAX_RECEPTORS, MAX_TIME_POINTS};
use crate::error::{check_range, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width (standard deviation) of every receptor's bell
pub const RECEPTOR_WIDTH: Float = 0.5;

/// Parameters of the Gaussian receptors coder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianReceptorsConfig {
    /// Number of receptors, `1..=1024`
    pub num_of_receptors: usize,
    /// Latency slots per receptor, `1..=128`
    pub num_of_time_points: usize,
}

impl Default for GaussianReceptorsConfig {
    fn default() -> Self {
        Self {
            num_of_receptors: 5,
            num_of_time_points: 10,
        }
    }
}

impl GaussianReceptorsConfig {
    /// Create new receptor parameters with validation
    pub fn new(num_of_receptors: usize, num_of_time_points: usize) -> Result<Self> {
        let cfg = Self {
            num_of_receptors,
            num_of_time_points,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        check_range("num_of_receptors", self.num_of_receptors, 1, MAX_RECEPTORS)?;
        check_range("num_of_time_points", self.num_of_time_points, 1, MAX_TIME_POINTS)
    }
}

#[derive(Debug, Clone)]
pub(super) struct GaussianReceptorsCoder {
    peaks: Vec<Float>,
    time_points: usize,
}

impl GaussianReceptorsCoder {
    pub(super) fn new(cfg: &GaussianReceptorsConfig) -> Self {
        let n = cfg.num_of_receptors;
        let peaks = if n == 1 {
            vec![0.5]
        } else {
            (0..n).map(|i| i as Float / (n - 1) as Float).collect()
        };
        Self {
            peaks,
            time_points: cfg.num_of_time_points,
        }
    }

    pub(super) fn layout(&self) -> (usize, usize) {
        (self.time_points, self.peaks.len())
    }

    pub(super) fn encode_into(&self, value: Float, pattern: &mut SpikePattern) {
        let x = to_unit(value);
        for (receptor, &peak) in self.peaks.iter().enumerate() {
            let slot = self.slot(response(x, peak));
            pattern.component_mut(receptor)[slot] = 1;
        }
    }

    /// Stronger response fires in an earlier slot
    fn slot(&self, response: Float) -> usize {
        let t = self.time_points;
        (((1.0 - response) * t as Float) as usize).min(t - 1)
    }
}

fn response(x: Float, peak: Float) -> Float {
    let d = (x - peak) / RECEPTOR_WIDTH;
    (-0.5 * d * d).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(cfg: &GaussianReceptorsConfig, value: Float) -> SpikePattern {
        let coder = GaussianReceptorsCoder::new(cfg);
        let (base, comps) = coder.layout();
        let mut pattern = SpikePattern::new(base, comps);
        coder.encode_into(value, &mut pattern);
        pattern
    }

    #[test]
    fn test_one_spike_per_receptor() {
        let cfg = GaussianReceptorsConfig::new(7, 16).unwrap();
        for i in -10..=10 {
            let pattern = encode(&cfg, i as Float / 10.0);
            for comp in pattern.components() {
                assert_eq!(comp.iter().filter(|&&b| b == 1).count(), 1);
            }
        }
    }

    #[test]
    fn test_nearest_receptor_fires_first() {
        let cfg = GaussianReceptorsConfig::new(5, 32).unwrap();
        // value -1 maps to x = 0, the peak of receptor 0
        let pattern = encode(&cfg, -1.0);
        assert_eq!(pattern.first_spike(0), Some(0));
        let first = pattern.first_spike(0).unwrap();
        let last = pattern.first_spike(4).unwrap();
        assert!(first < last);
    }

    #[test]
    fn test_single_receptor_centered() {
        let cfg = GaussianReceptorsConfig::new(1, 4).unwrap();
        let pattern = encode(&cfg, 0.0);
        assert_eq!(pattern.first_spike(0), Some(0));
    }

    #[test]
    fn test_validation() {
        assert!(GaussianReceptorsConfig::new(0, 10).is_err());
        assert!(GaussianReceptorsConfig::new(3, 129).is_err());
        assert!(GaussianReceptorsConfig::new(3, 128).is_ok());
    }
}
