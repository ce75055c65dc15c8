//! Benchmarks for modifier chains.

use std::hint::black_box;

use blocksynth::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    node::{Sample, SignalSource},
    oscillator::Oscillator,
    pan::{ModulatedPanner, Panner},
    volume::{ModulatedVolume, VolumeScaler},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/chain");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![Sample::SILENCE; size];

        // Static modifiers only
        let mut fixed = Oscillator::sawtooth(220.0, SR)
            .chain(VolumeScaler::new(0.5))
            .chain(Panner::new(0.25));
        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| fixed.render_block(black_box(&mut buffer)))
        });

        // The default voice patch: auto-pan plus an enveloped volume
        let mut pad = Oscillator::triangle(220.0, SR)
            .chain(ModulatedPanner::new(Oscillator::sine(2.2, SR).with_phase(90.0)))
            .chain(ModulatedVolume::new(EnvNode::adsr(SR, 0.01, 0.1, 0.75, 0.001)));
        group.bench_with_input(BenchmarkId::new("pad", size), &size, |b, _| {
            b.iter(|| pad.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
