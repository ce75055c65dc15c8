//! Scenario benchmarks.
//!
//! These model what the audio callback actually does each block: the voice
//! scheduler under chords, and the full engine with tracks and metronome.

mod mix;
mod voices;

pub use mix::bench_mix;
pub use voices::bench_voices;
