//! Reservoir neuron state machine
//!
//! Every cycle a neuron goes through the same sequence:
//!
//! 1. [`Neuron::new_stimulation`] stores the input and recurrent stimulation
//!    and combines them with the bias into a bounded total.
//! 2. [`Neuron::compute_signal`] runs the activation, derives the analog and
//!    spiking signals, updates the predictors and, optionally, statistics.
//! 3. [`Neuron::signal`] and the predictors are read by the surrounding
//!    topology and readout.
//!
//! Reading before the first compute returns the zero baseline.

use crate::activation::{Activation, ActivationConfig, ActivationKind};
use crate::error::{EngineError, Result};
use crate::predictors::{PredictorsConfig, PredictorsProvider};
use rcn_math::{ActivationFunction, BasicStat, Float, Interval};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bound applied to every stimulation component and to the total
pub const STIMULATION_BOUND: Float = 1e20;

/// Role of a neuron inside the reservoir
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NeuronRole {
    /// Receives external input
    Input,
    /// Hidden neuron with excitatory output
    Excitatory,
    /// Hidden neuron with inhibitory output
    Inhibitory,
}

/// Signal view a neuron is allowed to report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignalingRestriction {
    /// Report whichever view is requested
    #[default]
    NoRestriction,
    /// Always report the analog signal
    AnalogOnly,
    /// Always report the spiking signal
    SpikingOnly,
}

impl SignalingRestriction {
    /// View actually reported when `requested` is asked for
    pub fn resolve(&self, requested: ActivationKind) -> ActivationKind {
        match self {
            Self::NoRestriction => requested,
            Self::AnalogOnly => ActivationKind::Analog,
            Self::SpikingOnly => ActivationKind::Spiking,
        }
    }

    /// Short name of the restriction
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoRestriction => "NoRestriction",
            Self::AnalogOnly => "AnalogOnly",
            Self::SpikingOnly => "SpikingOnly",
        }
    }
}

/// Position of a neuron in its reservoir; not interpreted by the neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeuronPlacement {
    /// Pool index
    pub pool: usize,
    /// Index inside the pool
    pub index: usize,
}

/// Parameters of an input neuron
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InputNeuronConfig {
    /// Whether the neuron forwards analog values or spikes
    pub coding: ActivationKind,
    /// Range of the analog input, rescaled into `[0, 1]`
    pub input_range: Interval,
    /// Predictors to extract, if any
    pub predictors: Option<PredictorsConfig>,
}

impl Default for InputNeuronConfig {
    fn default() -> Self {
        Self {
            coding: ActivationKind::Analog,
            input_range: Interval::SYMMETRIC_UNIT,
            predictors: None,
        }
    }
}

impl InputNeuronConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        if let Some(predictors) = &self.predictors {
            predictors.validate()?;
        }
        Ok(())
    }

    /// Restriction implied by the coding
    pub fn restriction(&self) -> SignalingRestriction {
        match self.coding {
            ActivationKind::Analog => SignalingRestriction::AnalogOnly,
            ActivationKind::Spiking => SignalingRestriction::SpikingOnly,
        }
    }
}

/// Parameters of a hidden (excitatory or inhibitory) neuron
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HiddenNeuronConfig {
    /// Excitatory or inhibitory
    pub role: NeuronRole,
    /// Activation unit
    pub activation: ActivationConfig,
    /// Constant added to the stimulation
    pub bias: Float,
    /// Signal view restriction
    pub restriction: SignalingRestriction,
    /// Share of the previous analog state kept every cycle, `[0, 1)`
    pub retainment: Float,
    /// Normalized rise that counts as a firing event of an analog neuron, `[0, 1]`
    pub analog_firing_threshold: Float,
    /// Predictors to extract, if any
    pub predictors: Option<PredictorsConfig>,
}

impl Default for HiddenNeuronConfig {
    fn default() -> Self {
        Self {
            role: NeuronRole::Excitatory,
            activation: ActivationConfig::default(),
            bias: 0.0,
            restriction: SignalingRestriction::NoRestriction,
            retainment: 0.0,
            analog_firing_threshold: 0.001,
            predictors: None,
        }
    }
}

impl HiddenNeuronConfig {
    /// Validate parameters
    pub fn validate(&self) -> Result<()> {
        if self.role == NeuronRole::Input {
            return Err(EngineError::invalid_config(
                "hidden neuron cannot have the Input role",
            ));
        }
        if !self.bias.is_finite() {
            return Err(EngineError::invalid_parameter(
                "bias",
                self.bias.to_string(),
                "finite",
            ));
        }
        if !(0.0..1.0).contains(&self.retainment) {
            return Err(EngineError::invalid_parameter(
                "retainment",
                self.retainment.to_string(),
                "0.0 <= x < 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.analog_firing_threshold) {
            return Err(EngineError::invalid_parameter(
                "analog_firing_threshold",
                self.analog_firing_threshold.to_string(),
                "0.0 <= x <= 1.0",
            ));
        }
        if self.activation.kind() == ActivationKind::Spiking
            && self.restriction == SignalingRestriction::AnalogOnly
        {
            return Err(EngineError::incompatible_restriction(
                self.restriction.name(),
                self.activation.kind().name(),
            ));
        }
        self.activation.validate()?;
        if let Some(predictors) = &self.predictors {
            predictors.validate()?;
        }
        Ok(())
    }
}

/// Running statistics of a neuron
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NeuronStatistics {
    /// Input stimulation
    pub input_stimuli: BasicStat,
    /// Recurrent stimulation
    pub recurrent_stimuli: BasicStat,
    /// Total bounded stimulation
    pub total_stimuli: BasicStat,
    /// Activation state normalized into `[0, 1]`
    pub activation: BasicStat,
    /// Analog signal
    pub analog_signal: BasicStat,
    /// Spiking signal
    pub spiking_signal: BasicStat,
}

impl NeuronStatistics {
    /// Discard all samples
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Stage of the current cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleStage {
    /// No stimulation stored yet
    Idle,
    /// Stimulation stored, signal not computed
    Stimulated,
    /// Signal computed
    Computed,
}

#[derive(Debug, Clone, PartialEq)]
enum Unit {
    Input {
        coding: ActivationKind,
        input_range: Interval,
    },
    Hidden {
        activation: Activation,
        retainment: Float,
        analog_firing_threshold: Float,
    },
}

/// Single reservoir neuron
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    placement: NeuronPlacement,
    role: NeuronRole,
    bias: Float,
    restriction: SignalingRestriction,
    unit: Unit,
    stage: CycleStage,
    cycles: u64,
    input_stimuli: Float,
    recurrent_stimuli: Float,
    total_stimuli: Float,
    state: Float,
    normalized_activation: Float,
    analog_signal: Float,
    spiking_signal: Float,
    spike_leak: u64,
    after_first_signal: bool,
    statistics: NeuronStatistics,
    predictors: Option<PredictorsProvider>,
}

impl Neuron {
    /// Create an input neuron
    pub fn input(placement: NeuronPlacement, config: &InputNeuronConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Created {} input neuron at {}:{}",
            config.coding.name(),
            placement.pool,
            placement.index
        );
        Self::with_unit(
            placement,
            NeuronRole::Input,
            0.0,
            config.restriction(),
            Unit::Input {
                coding: config.coding,
                input_range: config.input_range,
            },
            config.predictors.as_ref(),
        )
    }

    /// Create a hidden neuron
    pub fn hidden(placement: NeuronPlacement, config: &HiddenNeuronConfig) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "Created {:?} neuron at {}:{} with {} activation ({})",
            config.role,
            placement.pool,
            placement.index,
            config.activation.name(),
            config.restriction.name()
        );
        Self::with_unit(
            placement,
            config.role,
            config.bias,
            config.restriction,
            Unit::Hidden {
                activation: Activation::new(&config.activation)?,
                retainment: config.retainment,
                analog_firing_threshold: config.analog_firing_threshold,
            },
            config.predictors.as_ref(),
        )
    }

    fn with_unit(
        placement: NeuronPlacement,
        role: NeuronRole,
        bias: Float,
        restriction: SignalingRestriction,
        unit: Unit,
        predictors: Option<&PredictorsConfig>,
    ) -> Result<Self> {
        let predictors = predictors.map(PredictorsProvider::new).transpose()?;
        Ok(Self {
            placement,
            role,
            bias,
            restriction,
            unit,
            stage: CycleStage::Idle,
            cycles: 0,
            input_stimuli: 0.0,
            recurrent_stimuli: 0.0,
            total_stimuli: 0.0,
            state: 0.0,
            normalized_activation: 0.0,
            analog_signal: 0.0,
            spiking_signal: 0.0,
            spike_leak: 0,
            after_first_signal: false,
            statistics: NeuronStatistics::default(),
            predictors,
        })
    }

    /// Return to the initial zero-stimulation state
    pub fn reset(&mut self, clear_stats: bool) {
        if let Unit::Hidden { activation, .. } = &mut self.unit {
            activation.reset();
        }
        self.stage = CycleStage::Idle;
        self.cycles = 0;
        self.input_stimuli = 0.0;
        self.recurrent_stimuli = 0.0;
        self.total_stimuli = 0.0;
        self.state = 0.0;
        self.normalized_activation = 0.0;
        self.analog_signal = 0.0;
        self.spiking_signal = 0.0;
        self.spike_leak = 0;
        self.after_first_signal = false;
        if let Some(predictors) = &mut self.predictors {
            predictors.reset();
        }
        if clear_stats {
            self.statistics.reset();
        }
    }

    /// Store this cycle's stimulation
    pub fn new_stimulation(&mut self, input_stimuli: Float, recurrent_stimuli: Float) {
        self.input_stimuli = bound_stimulation("input", input_stimuli);
        self.recurrent_stimuli = bound_stimulation("recurrent", recurrent_stimuli);
        self.total_stimuli = (self.input_stimuli + self.recurrent_stimuli + self.bias)
            .clamp(-STIMULATION_BOUND, STIMULATION_BOUND);
        self.stage = CycleStage::Stimulated;
    }

    /// Compute this cycle's signal.
    ///
    /// Without a preceding [`new_stimulation`](Self::new_stimulation) the
    /// cycle runs with zero stimulation.
    pub fn compute_signal(&mut self, collect_stats: bool) {
        if self.stage != CycleStage::Stimulated {
            self.new_stimulation(0.0, 0.0);
        }

        if self.spiking_signal > 0.0 {
            self.after_first_signal = true;
            self.spike_leak = 0;
        } else {
            self.spike_leak += 1;
        }

        let first_cycle = self.cycles == 0;
        let total = self.total_stimuli;
        match &mut self.unit {
            Unit::Input { coding: ActivationKind::Analog, input_range } => {
                let analog = Interval::UNIT.rescale(total, input_range);
                let rose = !first_cycle && analog > self.analog_signal;
                self.state = total;
                self.normalized_activation = analog;
                self.analog_signal = analog;
                self.spiking_signal = if rose { 1.0 } else { 0.0 };
            }
            Unit::Input { coding: ActivationKind::Spiking, .. } => {
                let spike = if total > 0.0 { 1.0 } else { 0.0 };
                self.state = total;
                self.normalized_activation = spike;
                self.analog_signal = spike;
                self.spiking_signal = spike;
            }
            Unit::Hidden {
                activation: Activation::Analog(function),
                retainment,
                analog_firing_threshold,
            } => {
                let fresh = function.activate(total);
                self.state = *retainment * self.state + (1.0 - *retainment) * fresh;
                let normalized = function.output_range().normalize(self.state);
                let fired =
                    !first_cycle && normalized - self.normalized_activation > *analog_firing_threshold;
                self.normalized_activation = normalized;
                self.analog_signal = normalized;
                self.spiking_signal = if fired { 1.0 } else { 0.0 };
            }
            Unit::Hidden {
                activation: Activation::Spiking(membrane),
                ..
            } => {
                let spike = membrane.compute(total);
                self.state = membrane.potential();
                self.normalized_activation = membrane.state_range().normalize(self.state);
                self.analog_signal = self.normalized_activation;
                self.spiking_signal = spike;
            }
        }

        if let Some(predictors) = &mut self.predictors {
            predictors.update(self.normalized_activation, self.spiking_signal > 0.0);
        }
        if collect_stats {
            let stats = &mut self.statistics;
            stats.input_stimuli.add(self.input_stimuli);
            stats.recurrent_stimuli.add(self.recurrent_stimuli);
            stats.total_stimuli.add(self.total_stimuli);
            stats.activation.add(self.normalized_activation);
            stats.analog_signal.add(self.analog_signal);
            stats.spiking_signal.add(self.spiking_signal);
        }
        self.cycles += 1;
        self.stage = CycleStage::Computed;
    }

    /// Current signal in the requested view, subject to the restriction
    pub fn signal(&self, view: ActivationKind) -> Float {
        match self.restriction.resolve(view) {
            ActivationKind::Analog => self.analog_signal,
            ActivationKind::Spiking => self.spiking_signal,
        }
    }

    /// Whether this cycle produced a spike or an analog firing event
    pub fn fired(&self) -> bool {
        self.spiking_signal > 0.0
    }

    /// Placement in the reservoir
    pub fn placement(&self) -> NeuronPlacement {
        self.placement
    }

    /// Role of the neuron
    pub fn role(&self) -> NeuronRole {
        self.role
    }

    /// Constant bias
    pub fn bias(&self) -> Float {
        self.bias
    }

    /// Signal view restriction
    pub fn restriction(&self) -> SignalingRestriction {
        self.restriction
    }

    /// Signal family of the neuron's own output
    pub fn activation_kind(&self) -> ActivationKind {
        match &self.unit {
            Unit::Input { coding, .. } => *coding,
            Unit::Hidden { activation, .. } => activation.kind(),
        }
    }

    /// Stage of the current cycle
    pub fn stage(&self) -> CycleStage {
        self.stage
    }

    /// Number of computed cycles since creation or reset
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Bounded input stimulation
    pub fn input_stimuli(&self) -> Float {
        self.input_stimuli
    }

    /// Bounded recurrent stimulation
    pub fn recurrent_stimuli(&self) -> Float {
        self.recurrent_stimuli
    }

    /// Bounded total stimulation including bias
    pub fn total_stimuli(&self) -> Float {
        self.total_stimuli
    }

    /// Raw internal activation state
    pub fn activation_state(&self) -> Float {
        self.state
    }

    /// Activation state normalized into `[0, 1]`
    pub fn normalized_activation(&self) -> Float {
        self.normalized_activation
    }

    /// Cycles since the last emitted spike or firing event
    pub fn spike_leak(&self) -> u64 {
        self.spike_leak
    }

    /// Whether the neuron has emitted at least one spike or firing event
    pub fn after_first_signal(&self) -> bool {
        self.after_first_signal
    }

    /// Collected statistics
    pub fn statistics(&self) -> &NeuronStatistics {
        &self.statistics
    }

    /// Predictor provider, if configured
    pub fn predictors(&self) -> Option<&PredictorsProvider> {
        self.predictors.as_ref()
    }

    /// Number of predictors this neuron provides
    pub fn predictors_count(&self) -> usize {
        self.predictors.as_ref().map_or(0, PredictorsProvider::count)
    }
}

fn bound_stimulation(component: &str, value: Float) -> Float {
    if value.is_nan() {
        log::warn!("NaN {} stimulation replaced by 0", component);
        return 0.0;
    }
    value.clamp(-STIMULATION_BOUND, STIMULATION_BOUND)
}
