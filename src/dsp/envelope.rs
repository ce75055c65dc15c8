/*
ADSR Envelope Implementation
============================

A linear ADSR generator driven entirely by sample counts.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0). This multiplies
              the audio signal to control its amplitude over time.

  stage       Which phase of the envelope we're in: Attack, Decay, Sustain,
              Release or Ended.

  samples     Stage lengths are converted from seconds to whole samples once,
              at construction: round(seconds * sample_rate). Nothing is
              re-derived from time afterwards, so stage boundaries land on
              exact sample indices.


The Shape
---------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release  Ended

Each ramp is an interpolation, not an accumulation: pull k (1-based) of an
N-sample stage outputs start + (end - start) * k / N. The last pull of Attack
is exactly 1.0, the last pull of Decay is exactly the sustain level, and the
last pull of Release is exactly 0.0.


The State Machine
-----------------

    Attack ──→ Decay ──→ Sustain
       │         │          │
       └─────────┴──────────┴── trigger_release ──→ Release ──→ Ended

Release always starts from the CURRENT level, not the sustain level, so an
early release (during Attack or Decay) ramps down from wherever the envelope
was. Triggering release again while releasing restarts the ramp from the
current level. Ended is terminal: level stays 0 until an explicit reset().

Zero-length stages are skipped when they are entered.
*/

/// Release time used when none is given.
pub const DEFAULT_RELEASE: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Attack,
    Decay,
    Sustain,
    Release,
    Ended,
}

pub struct Envelope {
    // stage lengths in samples
    attack_samples: u32,
    decay_samples: u32,
    sustain_level: f32,
    release_samples: u32,

    stage: EnvelopeState,
    level: f32,
    elapsed: u32, // pulls spent in the current stage

    release_start_level: f32,
}

fn to_samples(seconds: f32, sample_rate: f32) -> u32 {
    (seconds.max(0.0) * sample_rate).round() as u32
}

impl Envelope {
    pub fn adsr(
        sample_rate: f32,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Self {
        let mut env = Self {
            attack_samples: to_samples(attack, sample_rate),
            decay_samples: to_samples(decay, sample_rate),
            sustain_level: sustain.clamp(0.0, 1.0),
            release_samples: to_samples(release, sample_rate),

            stage: EnvelopeState::Attack,
            level: 0.0,
            elapsed: 0,
            release_start_level: 0.0,
        };
        env.enter(EnvelopeState::Attack);
        env
    }

    /// ADSR with the default release time.
    pub fn ads(sample_rate: f32, attack: f32, decay: f32, sustain: f32) -> Self {
        Self::adsr(sample_rate, attack, decay, sustain, DEFAULT_RELEASE)
    }

    /// Move into `stage`, skipping forward past stages with no samples.
    fn enter(&mut self, stage: EnvelopeState) {
        self.elapsed = 0;
        self.stage = stage;
        match stage {
            EnvelopeState::Attack if self.attack_samples == 0 => {
                self.level = 1.0;
                self.enter(EnvelopeState::Decay);
            }
            EnvelopeState::Decay if self.decay_samples == 0 => {
                self.level = self.sustain_level;
                self.enter(EnvelopeState::Sustain);
            }
            EnvelopeState::Release if self.release_samples == 0 => {
                self.enter(EnvelopeState::Ended);
            }
            EnvelopeState::Ended => {
                self.level = 0.0;
            }
            _ => {}
        }
    }

    /// Advance one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Attack => {
                self.elapsed += 1;
                self.level = self.elapsed as f32 / self.attack_samples as f32;
                if self.elapsed >= self.attack_samples {
                    self.level = 1.0;
                    self.enter(EnvelopeState::Decay);
                }
            }

            EnvelopeState::Decay => {
                self.elapsed += 1;
                let progress = self.elapsed as f32 / self.decay_samples as f32;
                self.level = 1.0 - (1.0 - self.sustain_level) * progress;
                if self.elapsed >= self.decay_samples {
                    self.level = self.sustain_level;
                    self.enter(EnvelopeState::Sustain);
                }
            }

            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }

            EnvelopeState::Release => {
                self.elapsed += 1;
                let progress = self.elapsed as f32 / self.release_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                if self.elapsed >= self.release_samples {
                    self.enter(EnvelopeState::Ended);
                }
            }

            EnvelopeState::Ended => {
                self.level = 0.0;
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Start the release ramp from the current level.
    pub fn trigger_release(&mut self) {
        if self.stage == EnvelopeState::Ended {
            return;
        }
        self.release_start_level = self.level;
        self.enter(EnvelopeState::Release);
    }

    pub fn ended(&self) -> bool {
        self.stage == EnvelopeState::Ended
    }

    /// Restart from the beginning of Attack.
    pub fn reset(&mut self) {
        self.level = 0.0;
        self.release_start_level = 0.0;
        self.enter(EnvelopeState::Attack);
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn attack_samples(&self) -> u32 {
        self.attack_samples
    }

    pub fn decay_samples(&self) -> u32 {
        self.decay_samples
    }

    pub fn release_samples(&self) -> u32 {
        self.release_samples
    }
}
