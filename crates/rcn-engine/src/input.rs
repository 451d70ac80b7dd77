//! Feeding encoded input values into input neurons
//!
//! An [`InputSpikeFeeder`] encodes one analog value per input step and
//! spreads the resulting [`SpikePattern`] over input neurons and cycles.

use crate::coding::{SpikeCoder, SpikeCoderConfig, SpikePattern};
use crate::error::{EngineError, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a spike pattern is laid out over neurons and cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeedingMode {
    /// One neuron per slot, whole pattern in a single cycle
    #[default]
    Horizontal,
    /// One neuron per component, one slot per cycle
    Vertical,
}

/// Delivers encoded values to input neurons cycle by cycle
#[derive(Debug, Clone)]
pub struct InputSpikeFeeder {
    coder: SpikeCoder,
    mode: FeedingMode,
    cycle: usize,
    loaded: bool,
}

impl InputSpikeFeeder {
    /// Create a feeder around a new coder
    pub fn new(config: &SpikeCoderConfig, mode: FeedingMode) -> Result<Self> {
        let coder = SpikeCoder::new(config)?;
        log::debug!("Created {:?} input feeder over {} coder", mode, config.name());
        Ok(Self {
            coder,
            mode,
            cycle: 0,
            loaded: false,
        })
    }

    /// Number of input neurons fed
    pub fn neuron_count(&self) -> usize {
        match self.mode {
            FeedingMode::Horizontal => self.coder.pattern().total_code_length(),
            FeedingMode::Vertical => self.coder.num_components(),
        }
    }

    /// Cycles needed to deliver one value
    pub fn cycles_per_value(&self) -> usize {
        match self.mode {
            FeedingMode::Horizontal => 1,
            FeedingMode::Vertical => self.coder.base_code_length(),
        }
    }

    /// Encode the next input value and rewind delivery
    pub fn load(&mut self, value: Float) -> &SpikePattern {
        self.cycle = 0;
        self.loaded = true;
        self.coder.encode(value)
    }

    /// Write this cycle's stimulation (`1.0` per spike) into `stimuli`.
    ///
    /// Returns `false` and writes zeros once the loaded value has been fully
    /// delivered or when nothing is loaded.
    pub fn next_cycle(&mut self, stimuli: &mut [Float]) -> Result<bool> {
        let required = self.neuron_count();
        if stimuli.len() < required {
            return Err(EngineError::buffer_too_small(required, stimuli.len()));
        }
        let stimuli = &mut stimuli[..required];
        if !self.loaded || self.cycle >= self.cycles_per_value() {
            stimuli.fill(0.0);
            return Ok(false);
        }

        let pattern = self.coder.pattern();
        match self.mode {
            FeedingMode::Horizontal => {
                for (s, &bit) in stimuli.iter_mut().zip(pattern.as_slice()) {
                    *s = Float::from(bit);
                }
            }
            FeedingMode::Vertical => {
                for (s, component) in stimuli.iter_mut().zip(pattern.components()) {
                    *s = Float::from(component[self.cycle]);
                }
            }
        }
        self.cycle += 1;
        Ok(true)
    }

    /// Cycles left for the loaded value
    pub fn remaining_cycles(&self) -> usize {
        if self.loaded {
            self.cycles_per_value() - self.cycle
        } else {
            0
        }
    }

    /// Pattern of the loaded value
    pub fn pattern(&self) -> &SpikePattern {
        self.coder.pattern()
    }

    /// Feeding mode
    pub fn mode(&self) -> FeedingMode {
        self.mode
    }

    /// Drop the loaded value and clear the coder history
    pub fn reset(&mut self) {
        self.coder.reset();
        self.cycle = 0;
        self.loaded = false;
    }
}
