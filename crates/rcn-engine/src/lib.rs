//! Spike encoding and neuron dynamics for reservoir computing
//!
//! This crate provides the per-cycle core of a reservoir: coders that turn
//! analog input into spike patterns, the neuron state machine driven by
//! external stimulation, the bit-packed firing history of each neuron, and
//! the predictor vectors a readout is trained on.
//!
//! A typical cycle:
//!
//! ```
//! use rcn_engine::{ActivationKind, HiddenNeuronConfig, Neuron, NeuronPlacement};
//! use rcn_engine::{PredictorsConfig, PredictorSwitches};
//!
//! let config = HiddenNeuronConfig {
//!     predictors: Some(PredictorsConfig {
//!         switches: PredictorSwitches::all(),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! let mut neuron = Neuron::hidden(NeuronPlacement::default(), &config)?;
//! neuron.new_stimulation(0.3, -0.1);
//! neuron.compute_signal(false);
//! let analog = neuron.signal(ActivationKind::Analog);
//! assert!((0.0..=1.0).contains(&analog));
//! # Ok::<(), rcn_engine::EngineError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod activation;
pub mod bulk;
pub mod coding;
pub mod error;
pub mod history;
pub mod input;
pub mod neuron;
pub mod predictors;
pub mod weights;

pub use activation::{Activation, ActivationConfig, ActivationKind};
pub use coding::{SpikeCoder, SpikeCoderConfig, SpikePattern};
pub use error::{EngineError, Result};
pub use history::{FiringHistory, HistoryConfig, HISTORY_CAPACITY};
pub use input::{FeedingMode, InputSpikeFeeder};
pub use neuron::{
    CycleStage, HiddenNeuronConfig, InputNeuronConfig, Neuron, NeuronPlacement, NeuronRole,
    NeuronStatistics, SignalingRestriction, STIMULATION_BOUND,
};
pub use predictors::{PredictorKind, PredictorSwitches, PredictorsConfig, PredictorsProvider};
pub use weights::WeightsKind;

pub use rcn_math::{self, Float};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_integration() {
        let coder = SpikeCoder::new(&SpikeCoderConfig::Bintree(Default::default())).unwrap();
        assert_eq!(coder.pattern().total_code_length(), 8);

        let history = FiringHistory::new(HistoryConfig::default()).unwrap();
        assert_eq!(history.firing_count(), 0);

        let neuron = Neuron::hidden(NeuronPlacement::default(), &HiddenNeuronConfig::default()).unwrap();
        assert_eq!(neuron.stage(), CycleStage::Idle);
        assert_eq!(neuron.predictors_count(), 0);
    }
}
