//! Composable building blocks for constructing audio-processing graphs.
//!
//! Every node is pulled one sample at a time through [`node::SignalSource`].
//! Generators (oscillators, envelopes) produce samples, modifiers (panners,
//! volume stages) reshape them inside a [`chain::Chain`], and
//! [`mix::WaveAdder`] averages parallel sources. Release and lifetime travel
//! through the optional `Releasable` / `Terminable` capabilities.

/// Serial chain: one generator followed by ordered modifiers.
pub mod chain;
/// Envelope generator node exposing ADSR state.
pub mod envelope;
/// Fluent combinators (`.chain()`, `.boxed()`).
pub mod extensions;
/// Mean of parallel sources.
pub mod mix;
/// Drive oscillator parameters from other signals.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators.
pub mod oscillator;
/// Fixed and modulated stereo placement.
pub mod pan;
/// Fixed and modulated gain.
pub mod volume;
