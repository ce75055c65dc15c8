pub mod config;
pub mod dsp;
pub mod engine; // Block production, control queues, cancellation
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod io;
pub mod runtime; // Tracks, timeline, metronome, mixer
pub mod synth; // Voice management and polyphony

pub const MAX_BLOCK_SIZE: usize = 2048;

pub use config::EngineConfig;
pub use engine::{Engine, EngineHandle, EngineMessage};
pub use error::{EngineError, Result};
