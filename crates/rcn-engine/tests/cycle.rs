//! End-to-end cycle: encode input, feed input neurons, drive hidden
//! neurons and gather predictors

use rcn_engine::bulk::{collect_predictors, predictors_count, reset_all};
use rcn_engine::coding::SignalStrengthConfig;
use rcn_engine::rcn_math::{MembraneParams, SpikingModel};
use rcn_engine::{
    ActivationConfig, ActivationKind, FeedingMode, Float, HiddenNeuronConfig, InputNeuronConfig,
    InputSpikeFeeder, Neuron, NeuronPlacement, NeuronRole, PredictorKind, PredictorSwitches,
    PredictorsConfig, SignalingRestriction, SpikeCoderConfig,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Reservoir {
    feeder: InputSpikeFeeder,
    inputs: Vec<Neuron>,
    hidden: Vec<Neuron>,
    input_stimuli: Vec<Float>,
}

impl Reservoir {
    fn new() -> Self {
        let feeder = InputSpikeFeeder::new(
            &SpikeCoderConfig::SignalStrength(SignalStrengthConfig::new(6).unwrap()),
            FeedingMode::Vertical,
        )
        .unwrap();
        let input_config = InputNeuronConfig {
            coding: ActivationKind::Spiking,
            ..Default::default()
        };
        let inputs = (0..feeder.neuron_count())
            .map(|i| Neuron::input(NeuronPlacement { pool: 0, index: i }, &input_config).unwrap())
            .collect();

        let predictors = Some(PredictorsConfig {
            switches: PredictorSwitches::all(),
            ..Default::default()
        });
        let analog = HiddenNeuronConfig {
            predictors,
            retainment: 0.2,
            ..Default::default()
        };
        let spiking = HiddenNeuronConfig {
            role: NeuronRole::Inhibitory,
            activation: ActivationConfig::Spiking {
                membrane: MembraneParams::default(),
                model: SpikingModel::LeakyIf {
                    time_scale: 4.0,
                    resistance: 30.0,
                },
            },
            restriction: SignalingRestriction::SpikingOnly,
            predictors,
            ..Default::default()
        };
        let hidden = vec![
            Neuron::hidden(NeuronPlacement { pool: 1, index: 0 }, &analog).unwrap(),
            Neuron::hidden(NeuronPlacement { pool: 1, index: 1 }, &spiking).unwrap(),
        ];

        let input_stimuli = vec![0.0; feeder.neuron_count()];
        Self {
            feeder,
            inputs,
            hidden,
            input_stimuli,
        }
    }

    /// Runs every cycle of one input value; returns the number of hidden spikes
    fn step(&mut self, value: Float) -> usize {
        self.feeder.load(value);
        let mut spikes = 0;
        while self.feeder.next_cycle(&mut self.input_stimuli).unwrap() {
            // Recurrent stimulation comes from the previous cycle's signals
            let drive: Float = self
                .inputs
                .iter()
                .map(|n| n.signal(ActivationKind::Spiking))
                .sum();
            let feedback: Float = self
                .hidden
                .iter()
                .map(|n| match n.role() {
                    NeuronRole::Inhibitory => -n.signal(ActivationKind::Spiking),
                    _ => n.signal(ActivationKind::Analog) - 0.5,
                })
                .sum();

            for (neuron, &s) in self.inputs.iter_mut().zip(&self.input_stimuli) {
                neuron.new_stimulation(s, 0.0);
                neuron.compute_signal(true);
            }
            for neuron in self.hidden.iter_mut() {
                neuron.new_stimulation(drive, feedback * 0.1);
                neuron.compute_signal(true);
                if neuron.fired() {
                    spikes += 1;
                }
            }
        }
        spikes
    }
}

#[test]
fn test_full_cycle_pipeline() {
    init_logging();
    let mut reservoir = Reservoir::new();
    assert_eq!(reservoir.feeder.cycles_per_value(), 6);

    let mut total_spikes = 0;
    for i in 0..20 {
        let value = ((i as Float) * 0.7).sin();
        total_spikes += reservoir.step(value);
    }
    assert!(total_spikes > 0);

    for neuron in &reservoir.hidden {
        assert_eq!(neuron.cycles(), 120);
        assert_eq!(neuron.statistics().total_stimuli.count(), 120);
        let predictors = neuron.predictors().unwrap();
        assert_eq!(predictors.count(), PredictorKind::ALL.len());
        assert!(predictors.predictors().iter().all(|v| v.is_finite()));
        assert_eq!(
            predictors.history().firing_count(),
            predictors.history().recount_firing()
        );
    }
    for neuron in &reservoir.inputs {
        assert_eq!(neuron.signal(ActivationKind::Analog), neuron.signal(ActivationKind::Spiking));
    }

    let mut features = vec![0.0; predictors_count(&reservoir.hidden)];
    assert_eq!(collect_predictors(&reservoir.hidden, &mut features).unwrap(), 16);
    assert_eq!(&features[..8], reservoir.hidden[0].predictors().unwrap().predictors().as_slice());
}

#[test]
fn test_reset_replays_identically() {
    init_logging();
    let mut reservoir = Reservoir::new();
    let inputs = [0.9, -0.4, 0.1, 0.7, -1.0];

    let first: Vec<usize> = inputs.iter().map(|&v| reservoir.step(v)).collect();
    let mut first_features = vec![0.0; predictors_count(&reservoir.hidden)];
    collect_predictors(&reservoir.hidden, &mut first_features).unwrap();

    reservoir.feeder.reset();
    reset_all(&mut reservoir.inputs, true);
    reset_all(&mut reservoir.hidden, true);

    let second: Vec<usize> = inputs.iter().map(|&v| reservoir.step(v)).collect();
    let mut second_features = vec![0.0; first_features.len()];
    collect_predictors(&reservoir.hidden, &mut second_features).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_features, second_features);
}

#[test]
fn test_spiking_neuron_fires_under_drive() {
    init_logging();
    let config = HiddenNeuronConfig {
        activation: ActivationConfig::Spiking {
            membrane: MembraneParams {
                resting_potential: -65.0,
                reset_potential: -65.0,
                firing_threshold: 30.0,
                ..Default::default()
            },
            model: SpikingModel::REGULAR_SPIKING,
        },
        ..Default::default()
    };
    let mut neuron = Neuron::hidden(NeuronPlacement::default(), &config).unwrap();
    let mut spikes = 0;
    for _ in 0..200 {
        neuron.new_stimulation(10.0, 0.0);
        neuron.compute_signal(false);
        if neuron.fired() {
            spikes += 1;
            assert_eq!(neuron.normalized_activation(), 0.0);
        }
    }
    assert!(spikes > 0);
    assert!(neuron.after_first_signal());
}
