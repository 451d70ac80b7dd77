//! Steady-state cycles must not touch the heap

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use rcn_engine::bulk::{collect_predictors, predictors_count};
use rcn_engine::{
    Float, HiddenNeuronConfig, Neuron, NeuronPlacement, PredictorSwitches, PredictorsConfig,
};

struct CountingAlloc;

thread_local! {
    static COUNTING: Cell<bool> = const { Cell::new(false) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if COUNTING.try_with(Cell::get).unwrap_or(false) {
            let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
        }
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn count_allocations(f: impl FnOnce()) -> usize {
    ALLOCATIONS.with(|n| n.set(0));
    COUNTING.with(|c| c.set(true));
    f();
    COUNTING.with(|c| c.set(false));
    ALLOCATIONS.with(Cell::get)
}

#[test]
fn test_cycle_and_collect_do_not_allocate() {
    let config = HiddenNeuronConfig {
        predictors: Some(PredictorsConfig {
            switches: PredictorSwitches::all(),
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut neurons: Vec<Neuron> = (0..32)
        .map(|i| Neuron::hidden(NeuronPlacement { pool: 0, index: i }, &config).unwrap())
        .collect();
    let mut features = vec![0.0; predictors_count(&neurons)];

    let mut run_cycle = |t: usize, neurons: &mut [Neuron], features: &mut [Float]| {
        for (i, n) in neurons.iter_mut().enumerate() {
            n.new_stimulation(((t + i) as Float * 0.3).sin(), 0.05);
            n.compute_signal(true);
        }
        collect_predictors(neurons, features).unwrap();
    };

    // Warm-up builds the shared weight tables
    run_cycle(0, &mut neurons, &mut features);

    let allocations = count_allocations(|| {
        for t in 1..100 {
            run_cycle(t, &mut neurons, &mut features);
        }
    });
    assert_eq!(allocations, 0);
}
