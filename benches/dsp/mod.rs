//! Benchmarks for single graph nodes.

mod chain;
mod envelope;
mod mix;
mod modulate;
mod oscillator;

pub use chain::bench_chain;
pub use envelope::bench_envelope;
pub use mix::bench_mix;
pub use modulate::bench_modulate;
pub use oscillator::bench_oscillator;
