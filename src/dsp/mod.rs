//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside voice structs. They stay focused on the
//! signal-processing math so graph nodes can layer on capabilities and
//! modulation.

/// Attack/decay/release envelope generator counted in samples.
pub mod envelope;
/// Oscillator waveforms and phase accumulation.
pub mod oscillator;

pub use envelope::EnvelopeState;
