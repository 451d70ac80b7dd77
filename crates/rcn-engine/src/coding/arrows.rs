//! Directional arrow coders
//!
//! Receptor `i` compares the current value with the value seen `i + 1`
//! cycles ago and, when the movement matches the coder's direction,
//! strength-codes the size of the move into its own component.

use std::collections::VecDeque;

use super::{strength_code_into, to_unit, SpikePattern, MAX_RECEPTORS, MAX_TIME_POINTS};
use crate::error::{check_range, Result};
use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Movement a coder is sensitive to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArrowDirection {
    /// Current value above the past one
    Up,
    /// Current value below the past one
    Down,
}

impl ArrowDirection {
    /// History sentinel used before warm-up
    fn sentinel(self) -> Float {
        match self {
            Self::Up => 0.0,
            Self::Down => 1.0,
        }
    }

    fn matches(self, current: Float, past: Float) -> bool {
        match self {
            Self::Up => current > past,
            Self::Down => current < past,
        }
    }
}

/// Parameters of the directional arrow coders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DirArrowsConfig {
    /// Number of receptors (history depth), `1..=1024`
    pub num_of_receptors: usize,
    /// Strength-code slots per receptor, `1..=128`
    pub num_of_time_points: usize,
}

impl Default for DirArrowsConfig {
    fn default() -> Self {
        Self {
            num_of_receptors: 4,
            num_of_time_points: 8,
        }
    }
}

impl DirArrowsConfig {
    /// Create new arrow parameters with validation
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
pub(super) struct DirArrowsCoder {
    direction: ArrowDirection,
    time_points: usize,
    /// Newest first; `history[i]` is the value from `i + 1` cycles ago
    history: VecDeque<Float>,
    warmed_up: usize,
}

impl DirArrowsCoder {
    pub(super) fn new(cfg: &DirArrowsConfig, direction: ArrowDirection) -> Self {
        let mut coder = Self {
            direction,
            time_points: cfg.num_of_time_points,
            history: VecDeque::with_capacity(cfg.num_of_receptors),
            warmed_up: 0,
        };
        coder.history.resize(cfg.num_of_receptors, direction.sentinel());
        coder
    }

    pub(super) fn layout(&self) -> (usize, usize) {
        (self.time_points, self.history.len())
    }

    pub(super) fn reset(&mut self) {
        let sentinel = self.direction.sentinel();
        self.history.iter_mut().for_each(|v| *v = sentinel);
        self.warmed_up = 0;
    }

    pub(super) fn encode_into(&mut self, value: Float, pattern: &mut SpikePattern) {
        let current = to_unit(value);
        // Receptor i is blind until a real value from i + 1 cycles ago exists
        for (receptor, &past) in self.history.iter().enumerate().take(self.warmed_up) {
            if self.direction.matches(current, past) {
                strength_code_into((current - past).abs(), pattern.component_mut(receptor));
            }
        }
        self.history.pop_back();
        self.history.push_front(current);
        self.warmed_up = (self.warmed_up + 1).min(self.history.len());
    }
}
