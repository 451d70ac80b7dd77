//! Shared moving-average weight tables
//!
//! Tables for every window length up to [`MAX_WINDOW`] are built once per
//! process on first use and are read-only afterwards. Each table is
//! normalized to sum to 1 and lists the weight of the newest value first.

use std::sync::OnceLock;

use rcn_math::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Longest supported moving window
pub const MAX_WINDOW: usize = 64;

/// Shape of the per-position weights of a moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WeightsKind {
    /// Weights decay geometrically with age, α = 2 / (n + 1)
    Exponential,
    /// Weights decrease linearly with age
    Linear,
    /// Every value weighs the same
    Constant,
}

struct WeightTables {
    exponential: Vec<Vec<Float>>,
    linear: Vec<Vec<Float>>,
    constant: Vec<Vec<Float>>,
}

fn tables() -> &'static WeightTables {
    static TABLES: OnceLock<WeightTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let build = |kind| (1..=MAX_WINDOW).map(|len| build_table(kind, len)).collect();
        WeightTables {
            exponential: build(WeightsKind::Exponential),
            linear: build(WeightsKind::Linear),
            constant: build(WeightsKind::Constant),
        }
    })
}

fn build_table(kind: WeightsKind, len: usize) -> Vec<Float> {
    let raw: Vec<Float> = match kind {
        WeightsKind::Exponential => {
            let alpha = 2.0 / (len as Float + 1.0);
            (0..len).map(|age| (1.0 - alpha).powi(age as i32)).collect()
        }
        WeightsKind::Linear => (0..len).map(|age| (len - age) as Float).collect(),
        WeightsKind::Constant => vec![1.0; len],
    };
    let total: Float = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Normalized weights for a window of `len` values, newest first.
///
/// `len` is clamped into `1..=MAX_WINDOW`.
pub fn weights(kind: WeightsKind, len: usize) -> &'static [Float] {
    let index = len.clamp(1, MAX_WINDOW) - 1;
    let t = tables();
    match kind {
        WeightsKind::Exponential => &t.exponential[index],
        WeightsKind::Linear => &t.linear[index],
        WeightsKind::Constant => &t.constant[index],
    }
}
