//! Benchmarks for parameter modulation.

use std::hint::black_box;

use blocksynth::graph::{
    modulate::{mapping, ModulatedOscillator},
    node::{Sample, SignalSource},
    oscillator::{OscParam, Oscillator},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

pub fn bench_modulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/modulate");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![Sample::SILENCE; size];

        // One modulator on frequency
        let mut vibrato = ModulatedOscillator::new(Oscillator::sine(440.0, SR)).modulate(
            OscParam::Frequency,
            Oscillator::sine(5.0, SR),
            mapping::vibrato(2.0),
        );
        group.bench_with_input(BenchmarkId::new("vibrato", size), &size, |b, _| {
            b.iter(|| vibrato.render_block(black_box(&mut buffer)))
        });

        // Frequency and amplitude modulated together
        let mut both = ModulatedOscillator::new(Oscillator::square(220.0, SR))
            .modulate(
                OscParam::Frequency,
                Oscillator::sine(5.0, SR),
                mapping::vibrato(2.0),
            )
            .modulate(
                OscParam::Amplitude,
                Oscillator::triangle(0.5, SR),
                mapping::scale,
            );
        group.bench_with_input(BenchmarkId::new("tremolo_vibrato", size), &size, |b, _| {
            b.iter(|| both.render_block(black_box(&mut buffer)))
        });
    }

    group.finish();
}
