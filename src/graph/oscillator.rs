use crate::{
    dsp::oscillator::{OscillatorWaveform, PhaseAccumulator},
    graph::node::{Sample, SignalSource},
};

/*
Audio Oscillator
================

The leaf generator of every patch: a periodic waveform at a given
frequency, amplitude and phase offset.

    output = waveform(accumulated_phase + phase_offset) * amplitude

The accumulator steps by 2π·freq/sample_rate each pull. Frequency,
amplitude and phase can be changed between pulls (this is how
ModulatedOscillator works); a change is picked up by the next pull and the
accumulator is never rewound, so the waveform stays continuous.

Each oscillator remembers the values it was built with (`initial_*`).
Modulation always recomputes from those, never from the last modulated
value, so the modulation does not drift.

Waveform Types:
---------------

  Sine:      pure tone, fundamental only
  Triangle:  soft, odd harmonics falling off as 1/n²
  Square:    hollow, odd harmonics falling off as 1/n
  Sawtooth:  bright, all harmonics falling off as 1/n

Example usage:
  let osc = Oscillator::sine(440.0, 48_000.0);
  let quiet_saw = Oscillator::sawtooth(110.0, 48_000.0).with_amplitude(0.3);
  let lfo = Oscillator::sine(2.0, 48_000.0).with_phase(90.0);
*/

pub struct Oscillator {
    waveform: OscillatorWaveform,
    sample_rate: f32,
    accumulator: PhaseAccumulator,

    initial_frequency: f32,
    initial_amplitude: f32,
    initial_phase: f32, // radians

    frequency: f32,
    amplitude: f32,
    phase: f32, // radians
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscParam {
    Amplitude,
    Frequency,
    Phase,
}

impl Oscillator {
    pub fn new(waveform: OscillatorWaveform, frequency: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            sample_rate,
            accumulator: PhaseAccumulator::new(),
            initial_frequency: frequency,
            initial_amplitude: 1.0,
            initial_phase: 0.0,
            frequency,
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    pub fn sine(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Sine, frequency, sample_rate)
    }

    pub fn triangle(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Triangle, frequency, sample_rate)
    }

    pub fn square(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Square, frequency, sample_rate)
    }

    pub fn sawtooth(frequency: f32, sample_rate: f32) -> Self {
        Self::new(OscillatorWaveform::Sawtooth, frequency, sample_rate)
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.initial_amplitude = amplitude;
        self.amplitude = amplitude;
        self
    }

    /// Phase offset in degrees.
    pub fn with_phase(mut self, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        self.initial_phase = radians;
        self.phase = radians;
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Value the parameter had at construction.
    pub fn initial(&self, param: OscParam) -> f32 {
        match param {
            OscParam::Amplitude => self.initial_amplitude,
            OscParam::Frequency => self.initial_frequency,
            OscParam::Phase => self.initial_phase,
        }
    }

    /// Live (possibly modulated) value of the parameter.
    pub fn get(&self, param: OscParam) -> f32 {
        match param {
            OscParam::Amplitude => self.amplitude,
            OscParam::Frequency => self.frequency,
            OscParam::Phase => self.phase,
        }
    }

    /// Takes effect on the next pulled sample.
    pub fn set(&mut self, param: OscParam, value: f32) {
        match param {
            OscParam::Amplitude => self.amplitude = value,
            // Clamp to below Nyquist; negative frequencies run the phase backwards
            OscParam::Frequency => {
                let nyquist = self.sample_rate * 0.5;
                self.frequency = value.clamp(-nyquist, nyquist);
            }
            OscParam::Phase => self.phase = value,
        }
    }

    /// Restore the construction-time parameters and restart the phase.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.frequency = self.initial_frequency;
        self.amplitude = self.initial_amplitude;
        self.phase = self.initial_phase;
    }
}

impl SignalSource for Oscillator {
    #[inline]
    fn next_sample(&mut self) -> Sample {
        let angle = self
            .accumulator
            .advance(self.frequency as f64, self.sample_rate as f64);
        let value = self.waveform.evaluate(angle + self.phase as f64) * self.amplitude;
        Sample::Mono(value)
    }
}
