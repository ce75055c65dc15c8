//! Benchmarks for the ADSR envelope generator.

use std::hint::black_box;

use blocksynth::dsp::envelope::Envelope;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up); long enough to never leave it
        let mut env = Envelope::adsr(SR, 60.0, 0.1, 0.7, 0.3);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(SR, 0.001, 0.001, 0.7, 0.3);
        for _ in 0..200 {
            env.next_sample();
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });

        // Release phase (ramping down)
        let mut env = Envelope::adsr(SR, 0.001, 0.001, 0.7, 60.0);
        for _ in 0..200 {
            env.next_sample();
        }
        env.trigger_release();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer)))
        });
    }

    group.finish();
}
