//! Predictor extraction
//!
//! A [`PredictorsProvider`] follows one neuron's activation and spikes
//! through a [`FiringHistory`] and reports the enabled predictor values in
//! the fixed order of [`PredictorKind::ALL`].

use crate::error::{check_range, EngineError, Result};
use crate::history::{FiringHistory, HistoryConfig, HISTORY_CAPACITY};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Predictor kinds, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PredictorKind {
    /// Normalized activation of the current cycle
    Activation,
    /// Square of the normalized activation
    SquaredActivation,
    /// Exponentially fading sum of activation
    ActivationFadingSum,
    /// Weighted moving average of activation
    ActivationMwAvg,
    /// Exponentially fading sum of spikes
    FiringFadingSum,
    /// Weighted moving average of spikes
    FiringMwAvg,
    /// Exact spike count inside the count window
    FiringCount,
    /// Recent spike bits read as an unsigned integer
    FiringBinPattern,
}

impl PredictorKind {
    /// Every kind, in output order
    pub const ALL: [Self; 8] = [
        Self::Activation,
        Self::SquaredActivation,
        Self::ActivationFadingSum,
        Self::ActivationMwAvg,
        Self::FiringFadingSum,
        Self::FiringMwAvg,
        Self::FiringCount,
        Self::FiringBinPattern,
    ];

    /// Short name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activation => "Activation",
            Self::SquaredActivation => "SquaredActivation",
            Self::ActivationFadingSum => "ActivationFadingSum",
            Self::ActivationMwAvg => "ActivationMWAvg",
            Self::FiringFadingSum => "FiringFadingSum",
            Self::FiringMwAvg => "FiringMWAvg",
            Self::FiringCount => "FiringCount",
            Self::FiringBinPattern => "FiringBinPattern",
        }
    }
}

/// One switch per predictor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PredictorSwitches {
    /// Enables [`PredictorKind::Activation`]
    pub activation: bool,
    /// Enables [`PredictorKind::SquaredActivation`]
    pub squared_activation: bool,
    /// Enables [`PredictorKind::ActivationFadingSum`]
    pub activation_fading_sum: bool,
    /// Enables [`PredictorKind::ActivationMwAvg`]
    pub activation_mw_avg: bool,
    /// Enables [`PredictorKind::FiringFadingSum`]
    pub firing_fading_sum: bool,
    /// Enables [`PredictorKind::FiringMwAvg`]
    pub firing_mw_avg: bool,
    /// Enables [`PredictorKind::FiringCount`]
    pub firing_count: bool,
    /// Enables [`PredictorKind::FiringBinPattern`]
    pub firing_bin_pattern: bool,
}

impl Default for PredictorSwitches {
    fn default() -> Self {
        Self {
            activation: true,
            squared_activation: false,
            activation_fading_sum: false,
            activation_mw_avg: false,
            firing_fading_sum: true,
            firing_mw_avg: false,
            firing_count: false,
            firing_bin_pattern: false,
        }
    }
}

impl PredictorSwitches {
    /// Every switch on
    pub fn all() -> Self {
        Self::from_fn(|_| true)
    }

    /// Every switch off
    pub fn none() -> Self {
        Self::from_fn(|_| false)
    }

    /// Build switches from a predicate over kinds
    pub fn from_fn(mut enabled: impl FnMut(PredictorKind) -> bool) -> Self {
        Self {
            activation: enabled(PredictorKind::Activation),
            squared_activation: enabled(PredictorKind::SquaredActivation),
            activation_fading_sum: enabled(PredictorKind::ActivationFadingSum),
            activation_mw_avg: enabled(PredictorKind::ActivationMwAvg),
            firing_fading_sum: enabled(PredictorKind::FiringFadingSum),
            firing_mw_avg: enabled(PredictorKind::FiringMwAvg),
            firing_count: enabled(PredictorKind::FiringCount),
            firing_bin_pattern: enabled(PredictorKind::FiringBinPattern),
        }
    }

    /// Whether a kind is enabled
    pub fn is_enabled(&self, kind: PredictorKind) -> bool {
        match kind {
            PredictorKind::Activation => self.activation,
            PredictorKind::SquaredActivation => self.squared_activation,
            PredictorKind::ActivationFadingSum => self.activation_fading_sum,
            PredictorKind::ActivationMwAvg => self.activation_mw_avg,
            PredictorKind::FiringFadingSum => self.firing_fading_sum,
            PredictorKind::FiringMwAvg => self.firing_mw_avg,
            PredictorKind::FiringCount => self.firing_count,
            PredictorKind::FiringBinPattern => self.firing_bin_pattern,
        }
    }

    /// Enabled kinds, in output order
    pub fn enabled(&self) -> impl Iterator<Item = PredictorKind> + '_ {
        PredictorKind::ALL.into_iter().filter(|&k| self.is_enabled(k))
    }

    /// Number of enabled kinds
    pub fn count(&self) -> usize {
        self.enabled().count()
    }
}

/// Predictor selection and history parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PredictorsConfig {
    /// Enabled predictor kinds
    pub switches: PredictorSwitches,
    /// Parameters of the underlying firing history
    pub history: HistoryConfig,
    /// Bits used by [`PredictorKind::FiringBinPattern`], `1..=64`
    pub bin_pattern_length: usize,
}

impl Default for PredictorsConfig {
    fn default() -> Self {
        Self {
            switches: PredictorSwitches::default(),
            history: HistoryConfig::default(),
            bin_pattern_length: 8,
        }
    }
}

impl PredictorsConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        self.history.validate()?;
        check_range("bin_pattern_length", self.bin_pattern_length, 1, HISTORY_CAPACITY)
    }
}

/// Per-neuron predictor source
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorsProvider {
    switches: PredictorSwitches,
    bin_pattern_length: usize,
    count: usize,
    activation: Float,
    history: FiringHistory,
}

impl PredictorsProvider {
    /// Create a provider with an empty history
    pub fn new(config: &PredictorsConfig) -> Result<Self> {
        config.validate()?;
        let count = config.switches.count();
        log::debug!("Created predictors provider with {} enabled predictor(s)", count);
        Ok(Self {
            switches: config.switches,
            bin_pattern_length: config.bin_pattern_length,
            count,
            activation: 0.0,
            history: FiringHistory::new(config.history)?,
        })
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.activation = 0.0;
        self.history.reset();
    }

    /// Record one cycle of normalized activation and spiking
    pub fn update(&mut self, activation: Float, spiked: bool) {
        self.activation = activation;
        self.history.update(activation, spiked);
    }

    /// Number of enabled predictors
    pub fn count(&self) -> usize {
        self.count
    }

    /// Enabled kinds, in output order
    pub fn enabled_kinds(&self) -> impl Iterator<Item = PredictorKind> + '_ {
        self.switches.enabled()
    }

    /// Current value of a predictor kind, enabled or not
    pub fn value(&self, kind: PredictorKind) -> Float {
        match kind {
            PredictorKind::Activation => self.activation,
            PredictorKind::SquaredActivation => self.activation * self.activation,
            PredictorKind::ActivationFadingSum => self.history.activation_fading_sum(),
            PredictorKind::ActivationMwAvg => self.history.activation_mw_avg(),
            PredictorKind::FiringFadingSum => self.history.firing_fading_sum(),
            PredictorKind::FiringMwAvg => self.history.firing_mw_avg(),
            PredictorKind::FiringCount => self.history.firing_count() as Float,
            PredictorKind::FiringBinPattern => {
                self.history.firing_bin_pattern(self.bin_pattern_length) as Float
            }
        }
    }

    /// Write the enabled predictors into `buffer` starting at `offset`;
    /// returns the number of values written
    pub fn copy_predictors_to(&self, buffer: &mut [Float], offset: usize) -> Result<usize> {
        let end = offset
            .checked_add(self.count)
            .filter(|&end| end <= buffer.len())
            .ok_or_else(|| {
                EngineError::buffer_too_small(offset.saturating_add(self.count), buffer.len())
            })?;
        self.write_row(&mut buffer[offset..end]);
        Ok(self.count)
    }

    /// Enabled predictors in a new vector
    pub fn predictors(&self) -> Vec<Float> {
        let mut out = vec![0.0; self.count];
        self.write_row(&mut out);
        out
    }

    /// `row` must hold exactly `count()` slots
    pub(crate) fn write_row(&self, row: &mut [Float]) {
        for (slot, kind) in row.iter_mut().zip(self.switches.enabled()) {
            *slot = self.value(kind);
        }
    }

    /// Underlying firing history
    pub fn history(&self) -> &FiringHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(switches: PredictorSwitches) -> PredictorsProvider {
        PredictorsProvider::new(&PredictorsConfig {
            switches,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_counts_match_switches() {
        assert_eq!(provider(PredictorSwitches::all()).count(), 8);
        assert_eq!(provider(PredictorSwitches::none()).count(), 0);
        assert_eq!(provider(PredictorSwitches::default()).count(), 2);
        assert!(provider(PredictorSwitches::none()).predictors().is_empty());
    }

    #[test]
    fn test_declared_order() {
        let mut p = provider(PredictorSwitches::from_fn(|k| {
            matches!(k, PredictorKind::FiringCount | PredictorKind::SquaredActivation)
        }));
        p.update(0.5, true);
        p.update(0.5, true);
        assert_eq!(p.predictors(), vec![0.25, 2.0]);
        let kinds: Vec<_> = p.enabled_kinds().collect();
        assert_eq!(kinds, vec![PredictorKind::SquaredActivation, PredictorKind::FiringCount]);
    }

    #[test]
    fn test_copy_with_offset() {
        let mut p = provider(PredictorSwitches::all());
        p.update(0.8, true);
        let mut buf = vec![-1.0; 10];
        assert_eq!(p.copy_predictors_to(&mut buf, 2).unwrap(), 8);
        assert_eq!(buf[0], -1.0);
        assert_eq!(buf[1], -1.0);
        assert_eq!(buf[2], 0.8);
        assert_eq!(&buf[2..], p.predictors().as_slice());
    }

    #[test]
    fn test_copy_into_short_buffer_fails() {
        let p = provider(PredictorSwitches::all());
        let mut buf = vec![0.0; 9];
        let err = p.copy_predictors_to(&mut buf, 2).unwrap_err();
        assert!(matches!(err, EngineError::BufferTooSmall { required: 10, available: 9 }));
    }

    #[test]
    fn test_copy_at_huge_offset_fails() {
        let p = provider(PredictorSwitches::default());
        let mut buf = [0.0; 4];
        let err = p.copy_predictors_to(&mut buf, usize::MAX).unwrap_err();
        assert!(matches!(err, EngineError::BufferTooSmall { required: usize::MAX, available: 4 }));
    }

    #[test]
    fn test_bin_pattern_predictor() {
        let mut p = PredictorsProvider::new(&PredictorsConfig {
            switches: PredictorSwitches::from_fn(|k| k == PredictorKind::FiringBinPattern),
            bin_pattern_length: 3,
            ..Default::default()
        })
        .unwrap();
        for spiked in [true, true, false, true] {
            p.update(0.0, spiked);
        }
        // newest three: 1 (newest), 0, 1
        assert_eq!(p.predictors(), vec![5.0]);
    }

    #[test]
    fn test_before_any_cycle_is_zero() {
        let p = provider(PredictorSwitches::all());
        assert!(p.predictors().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_invalid_bin_length() {
        let cfg = PredictorsConfig {
            bin_pattern_length: 0,
            ..Default::default()
        };
        assert!(PredictorsProvider::new(&cfg).is_err());
    }
}
