//! Firing history of a single neuron
//!
//! Recent spike events live in a `u64` shift register, newest event at
//! bit 0. Alongside the register the tracker keeps, updated in O(1) per
//! cycle:
//!
//! - the exact number of spikes inside a configurable window,
//! - exponentially fading sums of spikes and of activation,
//! - weighted moving averages of spikes and of activation.

use crate::error::{check_range, EngineError, Result};
use crate::weights::{weights, WeightsKind, MAX_WINDOW};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of events the shift register holds
pub const HISTORY_CAPACITY: usize = u64::BITS as usize;

/// Window sizes, weights and fading strengths of a [`FiringHistory`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryConfig {
    /// Fraction of the activation fading sum lost every cycle, `[0, 1)`
    pub activation_fading_strength: Float,
    /// Length of the activation moving window, `1..=64`
    pub activation_window: usize,
    /// Weights of the activation moving average
    pub activation_weights: WeightsKind,
    /// Fraction of the firing fading sum lost every cycle, `[0, 1)`
    pub firing_fading_strength: Float,
    /// Length of the firing moving window, `1..=64`
    pub firing_window: usize,
    /// Weights of the firing moving average
    pub firing_weights: WeightsKind,
    /// Window of the exact firing count, `1..=64`
    pub firing_count_window: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            activation_fading_strength: 0.005,
            activation_window: 16,
            activation_weights: WeightsKind::Linear,
            firing_fading_strength: 0.005,
            firing_window: 16,
            firing_weights: WeightsKind::Exponential,
            firing_count_window: HISTORY_CAPACITY,
        }
    }
}

impl HistoryConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        check_fading("activation_fading_strength", self.activation_fading_strength)?;
        check_fading("firing_fading_strength", self.firing_fading_strength)?;
        check_range("activation_window", self.activation_window, 1, MAX_WINDOW)?;
        check_range("firing_window", self.firing_window, 1, MAX_WINDOW)?;
        check_range("firing_count_window", self.firing_count_window, 1, HISTORY_CAPACITY)
    }
}

fn check_fading(parameter: &str, strength: Float) -> Result<()> {
    if (0.0..1.0).contains(&strength) {
        Ok(())
    } else {
        Err(EngineError::invalid_parameter(
            parameter,
            strength.to_string(),
            "0.0 <= x < 1.0",
        ))
    }
}

/// Fixed-capacity window of the most recent values
#[derive(Debug, Clone, PartialEq)]
pub struct MovingWindow {
    values: Vec<Float>,
    head: usize,
    len: usize,
}

impl MovingWindow {
    /// Create an empty window holding at most `capacity` values
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    /// Maximum number of values
    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Number of values currently held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the window holds no values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the window is at capacity
    pub fn is_full(&self) -> bool {
        self.len == self.values.len()
    }

    /// Add a value, dropping the oldest one when full
    pub fn push(&mut self, value: Float) {
        self.head = (self.head + 1) % self.values.len();
        self.values[self.head] = value;
        self.len = (self.len + 1).min(self.values.len());
    }

    /// Iterate over the held values, newest first
    pub fn iter_newest_first(&self) -> impl Iterator<Item = Float> + '_ {
        let cap = self.values.len();
        (0..self.len).map(move |age| self.values[(self.head + cap - age) % cap])
    }

    /// Weighted average of the held values, using the table for the current length
    pub fn weighted_average(&self, kind: WeightsKind) -> Float {
        if self.len == 0 {
            return 0.0;
        }
        self.iter_newest_first()
            .zip(weights(kind, self.len))
            .map(|(v, w)| v * w)
            .sum()
    }

    /// Drop every value
    pub fn reset(&mut self) {
        self.values.fill(0.0);
        self.head = 0;
        self.len = 0;
    }
}

/// Bit-packed spike history with incrementally maintained aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct FiringHistory {
    config: HistoryConfig,
    bits: u64,
    buffered: usize,
    count_mask: u64,
    firing_count: u32,
    firing_fading_sum: Float,
    activation_fading_sum: Float,
    firing_window: MovingWindow,
    activation_window: MovingWindow,
}

impl FiringHistory {
    /// Create an empty history
    pub fn new(config: HistoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bits: 0,
            buffered: 0,
            count_mask: 1u64 << (config.firing_count_window - 1),
            firing_count: 0,
            firing_fading_sum: 0.0,
            activation_fading_sum: 0.0,
            firing_window: MovingWindow::new(config.firing_window),
            activation_window: MovingWindow::new(config.activation_window),
        })
    }

    /// Forget everything; equivalent to a freshly created history
    pub fn reset(&mut self) {
        self.bits = 0;
        self.buffered = 0;
        self.firing_count = 0;
        self.firing_fading_sum = 0.0;
        self.activation_fading_sum = 0.0;
        self.firing_window.reset();
        self.activation_window.reset();
    }

    /// Record one cycle
    pub fn update(&mut self, activation: Float, spiked: bool) {
        // The bit at count_mask leaves the count window on this shift
        if self.buffered >= self.config.firing_count_window && self.bits & self.count_mask != 0 {
            self.firing_count -= 1;
        }
        self.bits = (self.bits << 1) | u64::from(spiked);
        if spiked {
            self.firing_count += 1;
        }
        self.buffered = (self.buffered + 1).min(HISTORY_CAPACITY);

        let spike = if spiked { 1.0 } else { 0.0 };
        self.firing_fading_sum = self.firing_fading_sum * (1.0 - self.config.firing_fading_strength) + spike;
        self.activation_fading_sum =
            self.activation_fading_sum * (1.0 - self.config.activation_fading_strength) + activation;
        self.firing_window.push(spike);
        self.activation_window.push(activation);
    }

    /// Spikes inside the count window
    pub fn firing_count(&self) -> u32 {
        self.firing_count
    }

    /// Spikes inside the count window, recomputed from the register
    pub fn recount_firing(&self) -> u32 {
        (self.bits & low_mask(self.config.firing_count_window.min(self.buffered))).count_ones()
    }

    /// Exponentially fading count of spikes
    pub fn firing_fading_sum(&self) -> Float {
        self.firing_fading_sum
    }

    /// Weighted moving average of spikes
    pub fn firing_mw_avg(&self) -> Float {
        self.firing_window.weighted_average(self.config.firing_weights)
    }

    /// Exponentially fading sum of activation
    pub fn activation_fading_sum(&self) -> Float {
        self.activation_fading_sum
    }

    /// Weighted moving average of activation
    pub fn activation_mw_avg(&self) -> Float {
        self.activation_window.weighted_average(self.config.activation_weights)
    }

    /// Up to `hist_len` most recent spike bits as an integer, most recent
    /// event in the highest-order position.
    ///
    /// Only buffered events are used, so during warm-up the pattern is
    /// shorter than `hist_len`.
    pub fn firing_bin_pattern(&self, hist_len: usize) -> u64 {
        let n = hist_len.min(self.buffered);
        if n == 0 {
            return 0;
        }
        (self.bits & low_mask(n)).reverse_bits() >> (HISTORY_CAPACITY - n)
    }

    /// Raw register, newest event at bit 0
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of recorded events, saturating at [`HISTORY_CAPACITY`]
    pub fn buffered(&self) -> usize {
        self.buffered
    }

    /// Whether the most recent event was a spike
    pub fn last_spiked(&self) -> bool {
        self.buffered > 0 && self.bits & 1 == 1
    }

    /// Tracker parameters
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

fn low_mask(n: usize) -> u64 {
    if n >= HISTORY_CAPACITY {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}
