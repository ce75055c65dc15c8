//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use blocksynth::graph::{
    node::{Sample, SignalSource},
    oscillator::Oscillator,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![Sample::SILENCE; size];

        // Sine - sin() per sample
        let mut osc = Oscillator::sine(440.0, SR);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        // Triangle - asin(sin())
        let mut osc = Oscillator::triangle(440.0, SR);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        // Square - sign of sin()
        let mut osc = Oscillator::square(440.0, SR);
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });

        // Sawtooth - wrapped phase ramp
        let mut osc = Oscillator::sawtooth(440.0, SR);
        group.bench_with_input(BenchmarkId::new("sawtooth", size), &size, |b, _| {
            b.iter(|| osc.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
