//! Property-based tests using proptest

use proptest::prelude::*;
use rcn_engine::coding::{strength_code, PotentiometerConfig};
use rcn_engine::{
    ActivationKind, FiringHistory, HiddenNeuronConfig, HistoryConfig, Neuron, NeuronPlacement,
    PredictorKind, PredictorSwitches, PredictorsConfig, PredictorsProvider, SignalingRestriction,
    SpikeCoder, SpikeCoderConfig,
};

fn first_or_len(code: &[u8]) -> usize {
    code.iter().position(|&b| b == 1).unwrap_or(code.len())
}

fn count(code: &[u8]) -> usize {
    code.iter().filter(|&&b| b == 1).count()
}

fn history_with_window(window: usize) -> FiringHistory {
    FiringHistory::new(HistoryConfig {
        firing_count_window: window,
        ..Default::default()
    })
    .unwrap()
}

proptest! {
    #[test]
    fn strength_code_is_monotonic(len in 1usize..=128, a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (weak, strong) = if a <= b { (a, b) } else { (b, a) };
        let weak_code = strength_code(weak, len);
        let strong_code = strength_code(strong, len);

        prop_assert_eq!(weak_code.len(), len);
        prop_assert!(count(&strong_code) >= count(&weak_code));
        prop_assert!(first_or_len(&strong_code) <= first_or_len(&weak_code));
    }

    #[test]
    fn window_count_matches_last_64(events in prop::collection::vec(any::<bool>(), 100)) {
        let mut h = history_with_window(64);
        for &e in &events {
            h.update(0.0, e);
        }
        let expected = events[events.len() - 64..].iter().filter(|&&e| e).count() as u32;
        prop_assert_eq!(h.firing_count(), expected);
        prop_assert_eq!(h.recount_firing(), expected);
    }

    #[test]
    fn window_count_any_window(
        window in 1usize..=64,
        events in prop::collection::vec(any::<bool>(), 0..300),
    ) {
        let mut h = history_with_window(window);
        for (i, &e) in events.iter().enumerate() {
            h.update(0.0, e);
            let start = (i + 1).saturating_sub(window);
            let expected = events[start..=i].iter().filter(|&&e| e).count() as u32;
            prop_assert_eq!(h.firing_count(), expected);
        }
    }

    #[test]
    fn analog_only_views_agree(stimuli in prop::collection::vec(-50.0f64..50.0, 1..100)) {
        let config = HiddenNeuronConfig {
            restriction: SignalingRestriction::AnalogOnly,
            retainment: 0.3,
            ..Default::default()
        };
        let mut n = Neuron::hidden(NeuronPlacement::default(), &config).unwrap();
        for s in stimuli {
            n.new_stimulation(s, -s * 0.25);
            n.compute_signal(true);
            prop_assert_eq!(n.signal(ActivationKind::Analog), n.signal(ActivationKind::Spiking));
        }
    }

    #[test]
    fn predictor_vector_length(
        mask in 0u8..=255,
        offset in 0usize..8,
        activations in prop::collection::vec(0.0f64..=1.0, 0..40),
    ) {
        let switches = PredictorSwitches::from_fn(|kind| {
            let bit = PredictorKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
            mask & (1 << bit) != 0
        });
        let k = mask.count_ones() as usize;
        let mut provider = PredictorsProvider::new(&PredictorsConfig {
            switches,
            ..Default::default()
        })
        .unwrap();
        for (i, &a) in activations.iter().enumerate() {
            provider.update(a, i % 2 == 0);
        }

        prop_assert_eq!(provider.count(), k);
        prop_assert_eq!(provider.predictors().len(), k);
        let mut buffer = vec![0.0; offset + k];
        prop_assert_eq!(provider.copy_predictors_to(&mut buffer, offset).unwrap(), k);
    }

    #[test]
    fn coder_layout_is_fixed(len in 1usize..=32, values in prop::collection::vec(-2.0f64..2.0, 1..50)) {
        let mut coder = SpikeCoder::new(&SpikeCoderConfig::Potentiometer(PotentiometerConfig {
            abs_val_code_length: len,
            ..Default::default()
        }))
        .unwrap();
        let total = coder.pattern().total_code_length();
        for v in values {
            let pattern = coder.encode(v);
            prop_assert_eq!(pattern.total_code_length(), total);
            prop_assert!(pattern.as_slice().iter().all(|&b| b <= 1));
        }
    }
}

#[test]
fn test_reset_idempotence_across_components() {
    let config = SpikeCoderConfig::UpDirArrows(Default::default());
    let mut coder = SpikeCoder::new(&config).unwrap();
    for v in [-0.5, 0.2, 0.9] {
        coder.encode(v);
    }
    coder.reset();
    let once = coder.encode(0.4).clone();
    coder.reset();
    coder.reset();
    assert_eq!(coder.encode(0.4), &once);

    let mut h = history_with_window(16);
    h.update(0.5, true);
    h.reset();
    let once = h.clone();
    h.reset();
    assert_eq!(h, once);
}
