#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f64::consts::{PI, TAU};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

impl OscillatorWaveform {
    /// Evaluate one period of the waveform at `angle` radians.
    ///
    /// Every shape peaks at ±1 and starts a period at the same place a sine
    /// does, so swapping waveforms keeps phase alignment.
    #[inline]
    pub fn evaluate(self, angle: f64) -> f32 {
        let angle = angle.rem_euclid(TAU);
        let value = match self {
            OscillatorWaveform::Sine => angle.sin(),
            OscillatorWaveform::Square => {
                if angle < PI {
                    1.0
                } else {
                    -1.0
                }
            }
            OscillatorWaveform::Sawtooth => {
                // -1 → +1 over the period, offset so 0 rad maps to 0
                let t = (angle / TAU + 0.5).fract();
                2.0 * t - 1.0
            }
            OscillatorWaveform::Triangle => {
                let t = angle / TAU;
                if t < 0.25 {
                    4.0 * t
                } else if t < 0.75 {
                    2.0 - 4.0 * t
                } else {
                    4.0 * t - 4.0
                }
            }
        };
        value as f32
    }
}

/// Running phase in radians, kept in `[0, 2π)`.
///
/// The increment is recomputed from the frequency passed to each `advance`,
/// so frequency changes never rewind the phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAccumulator {
    phase: f64,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Return the current phase, then step by `2π·freq/sample_rate`.
    #[inline]
    pub fn advance(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        let current = self.phase;
        self.phase = (self.phase + TAU * frequency / sample_rate).rem_euclid(TAU);
        current
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
