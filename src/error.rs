//! Errors surfaced to the control plane.
//!
//! Nothing on the audio path returns these: generators always produce a
//! defined sample. They come back from construction, configuration and the
//! device/port adapters.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bpm must be a finite value in (0, {max}], got {bpm}")]
    InvalidBpm { bpm: f64, max: f64 },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid track window: {0}")]
    InvalidTrackWindow(String),

    #[error("control queue is full, command dropped")]
    QueueFull,

    #[error("no MIDI input available: {0}")]
    MidiUnavailable(String),

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("audio stream error: {0}")]
    Stream(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
