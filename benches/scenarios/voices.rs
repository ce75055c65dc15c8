//! Benchmarks for the voice scheduler.
//!
//! Voices use the default patch (triangle, auto-pan, ADSR volume).

use std::hint::black_box;

use blocksynth::{
    graph::node::Sample,
    runtime::BlockSource,
    synth::{factory::triangle_pad, NoteTable, VoiceScheduler},
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SR: f32 = 48_000.0;

fn scheduler_with(notes: &[u8]) -> VoiceScheduler {
    let mut scheduler = VoiceScheduler::new(triangle_pad(SR), NoteTable::shared(), 16);
    for &note in notes {
        scheduler.note_on(note, 100);
    }
    scheduler
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![Sample::SILENCE; size];

        // === SINGLE NOTE ===
        let mut single = scheduler_with(&[57]);
        group.bench_with_input(BenchmarkId::new("single", size), &size, |b, _| {
            b.iter(|| single.render_block(black_box(&mut buffer)))
        });

        // === TRIAD ===
        let mut triad = scheduler_with(&[57, 61, 64]);
        group.bench_with_input(BenchmarkId::new("triad", size), &size, |b, _| {
            b.iter(|| triad.render_block(black_box(&mut buffer)))
        });

        // === FULL POLYPHONY ===
        let notes: Vec<u8> = (48..64).collect();
        let mut full = scheduler_with(&notes);
        group.bench_with_input(BenchmarkId::new("16_voices", size), &size, |b, _| {
            b.iter(|| full.render_block(black_box(&mut buffer)))
        });

        // === NOTE CHURN ===
        // a note starts and stops every block, exercising creation and release
        let mut churn = scheduler_with(&[57, 61]);
        let mut note = 64u8;
        group.bench_with_input(BenchmarkId::new("churn", size), &size, |b, _| {
            b.iter(|| {
                churn.note_on(note, 100);
                churn.render_block(black_box(&mut buffer));
                churn.note_off(note);
                note = if note == 80 { 64 } else { note + 1 };
            })
        });
    }

    group.finish();
}
