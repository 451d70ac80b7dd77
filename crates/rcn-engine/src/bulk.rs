//! Operations over whole neuron arrays
//!
//! With the `parallel` feature these fan out over rayon's thread pool.
//! Elements are independent, so the result does not depend on the order
//! in which they are processed.

use crate::error::{EngineError, Result};
use crate::neuron::Neuron;
use rcn_math::Float;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Reset every neuron of the slice
pub fn reset_all(neurons: &mut [Neuron], clear_stats: bool) {
    #[cfg(feature = "parallel")]
    neurons.par_iter_mut().for_each(|n| n.reset(clear_stats));

    #[cfg(not(feature = "parallel"))]
    neurons.iter_mut().for_each(|n| n.reset(clear_stats));
}

/// Total number of predictors provided by the slice
pub fn predictors_count(neurons: &[Neuron]) -> usize {
    neurons.iter().map(Neuron::predictors_count).sum()
}

/// Concatenate the predictor rows of all neurons into `buffer`, in neuron
/// order; returns the number of values written
pub fn collect_predictors(neurons: &[Neuron], buffer: &mut [Float]) -> Result<usize> {
    let required = predictors_count(neurons);
    if buffer.len() < required {
        return Err(EngineError::buffer_too_small(required, buffer.len()));
    }

    fill_rows(neurons, &mut buffer[..required]);
    Ok(required)
}

/// Neurons per sequential leaf when splitting across threads
#[cfg(feature = "parallel")]
const PARALLEL_LEAF: usize = 64;

/// `buffer` holds exactly the rows of `neurons`
#[cfg(feature = "parallel")]
fn fill_rows(neurons: &[Neuron], buffer: &mut [Float]) {
    if neurons.len() <= PARALLEL_LEAF {
        fill_rows_sequential(neurons, buffer);
        return;
    }
    let (left, right) = neurons.split_at(neurons.len() / 2);
    let (left_rows, right_rows) = buffer.split_at_mut(predictors_count(left));
    rayon::join(|| fill_rows(left, left_rows), || fill_rows(right, right_rows));
}

#[cfg(not(feature = "parallel"))]
fn fill_rows(neurons: &[Neuron], buffer: &mut [Float]) {
    fill_rows_sequential(neurons, buffer);
}

fn fill_rows_sequential(neurons: &[Neuron], mut buffer: &mut [Float]) {
    for neuron in neurons {
        let (row, tail) = std::mem::take(&mut buffer).split_at_mut(neuron.predictors_count());
        write_row(neuron, row);
        buffer = tail;
    }
}

fn write_row(neuron: &Neuron, row: &mut [Float]) {
    if let Some(predictors) = neuron.predictors() {
        predictors.write_row(row);
    }
}
