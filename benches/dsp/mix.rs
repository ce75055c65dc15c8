//! Benchmarks for summing sources with the wave adder.

use std::hint::black_box;

use blocksynth::graph::{
    mix::WaveAdder,
    node::{Sample, SignalSource},
    oscillator::Oscillator,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

fn adder(count: usize, stereo: bool) -> WaveAdder {
    let base = if stereo { WaveAdder::stereo() } else { WaveAdder::mono() };
    (0..count).fold(base, |adder, i| {
        adder.with(Oscillator::sine(110.0 * (i + 1) as f32, SR))
    })
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![Sample::SILENCE; size];

        for count in [2usize, 8] {
            let mut mono = adder(count, false);
            group.bench_with_input(
                BenchmarkId::new(format!("mono_{count}"), size),
                &size,
                |b, _| b.iter(|| mono.render_block(black_box(&mut buffer))),
            );
        }

        let mut stereo = adder(8, true);
        group.bench_with_input(BenchmarkId::new("stereo_8", size), &size, |b, _| {
            b.iter(|| stereo.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
