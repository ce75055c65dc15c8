//! Benchmarks for whole engine blocks.
//!
//! Each iteration is one `process_block`: command draining, the metronome,
//! every track and the voice scheduler, averaged to interleaved `i16`.

use std::hint::black_box;

use blocksynth::{
    graph::oscillator::Oscillator,
    runtime::{Track, TrackWindow},
    Engine, EngineConfig,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

fn engine(block_size: usize, channels: u16, drones: &[f32]) -> Engine {
    let config = EngineConfig {
        block_size,
        channels,
        ..Default::default()
    };
    let sr = config.sample_rate as f32;
    let (mut engine, mut handle) = Engine::new(config).expect("valid bench config");
    for &freq in drones {
        engine.add_track(Track::new(Oscillator::sine(freq, sr)));
    }
    let window = TrackWindow::new(96_000, 120_000, 192_000, true).expect("valid window");
    engine.add_track(Track::windowed(Oscillator::sine(1760.0, sr), window).expect("valid track"));
    for note in [57, 61, 64] {
        handle.note_on(note, 100).expect("queue has room");
    }
    engine
}

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/mix");

    for &size in BLOCK_SIZES {
        // === METRONOME + VOICES ONLY ===
        let mut minimal = engine(size, 1, &[]);
        let mut out = vec![0i16; minimal.block_len()];
        group.bench_with_input(BenchmarkId::new("minimal_mono", size), &size, |b, _| {
            b.iter(|| minimal.process_block(black_box(&mut out)))
        });

        // === DEFAULT SESSION ===
        // three drones, one windowed track, metronome and a held chord
        let mut session = engine(size, 2, &[220.0, 365.0, 880.0]);
        let mut out = vec![0i16; session.block_len()];
        group.bench_with_input(BenchmarkId::new("session_stereo", size), &size, |b, _| {
            b.iter(|| session.process_block(black_box(&mut out)))
        });

        // === MANY TRACKS ===
        let drones: Vec<f32> = (1..=16).map(|i| 55.0 * i as f32).collect();
        let mut busy = engine(size, 2, &drones);
        let mut out = vec![0i16; busy.block_len()];
        group.bench_with_input(BenchmarkId::new("16_tracks_stereo", size), &size, |b, _| {
            b.iter(|| busy.process_block(black_box(&mut out)))
        });
    }

    group.finish();
}
