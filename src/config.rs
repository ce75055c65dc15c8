#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    MAX_BLOCK_SIZE,
};

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_BLOCK_SIZE: usize = 960;
pub const DEFAULT_BPM: f64 = 120.0;
/// Upper tempo bound accepted by the metronome.
pub const MAX_BPM: f64 = 8_000.0;

/// Engine-wide settings, fixed once an output stream is opened.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per block. Every block handed to the sink has this length.
    pub block_size: usize,
    /// 1 (mono) or 2 (stereo interleaved).
    pub channels: u16,
    /// Initial metronome tempo.
    pub bpm: f64,
    /// Global loop length in frames. `None` plays without a loop point.
    pub timeline_length: Option<u64>,
    /// Polyphony cap for the voice scheduler.
    pub max_voices: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
            channels: 1,
            bpm: DEFAULT_BPM,
            timeline_length: Some(192_000),
            max_voices: 16,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Err(EngineError::InvalidConfig(format!(
                "sample rate must be between 8000 and 192000, got {}",
                self.sample_rate
            )));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return Err(EngineError::InvalidConfig(format!(
                "block size must be between 1 and {MAX_BLOCK_SIZE}, got {}",
                self.block_size
            )));
        }
        if !matches!(self.channels, 1 | 2) {
            return Err(EngineError::InvalidConfig(format!(
                "channel count must be 1 or 2, got {}",
                self.channels
            )));
        }
        if self.timeline_length == Some(0) {
            return Err(EngineError::InvalidConfig(
                "timeline length must be greater than zero".into(),
            ));
        }
        if self.max_voices == 0 {
            return Err(EngineError::InvalidConfig(
                "max_voices must be at least 1".into(),
            ));
        }
        validate_bpm(self.bpm)
    }

    /// Playback duration of one block in seconds.
    pub fn block_duration(&self) -> f64 {
        self.block_size as f64 / self.sample_rate as f64
    }
}

pub fn validate_bpm(bpm: f64) -> Result<()> {
    if bpm.is_finite() && bpm > 0.0 && bpm <= MAX_BPM {
        Ok(())
    } else {
        Err(EngineError::InvalidBpm { bpm, max: MAX_BPM })
    }
}
