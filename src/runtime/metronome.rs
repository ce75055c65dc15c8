use crate::{
    config::validate_bpm,
    error::{EngineError, Result},
    graph::{
        node::{Sample, SignalSource},
        oscillator::Oscillator,
    },
    runtime::BlockSource,
};

/*
Metronome
=========

One beat lasts

  total_samples = round(60000 / bpm · sample_rate / 1000)

frames. With a fixed block size that splits into

  (loop_count, remainder) = divmod(total_samples, block_size)

full block-segments plus a remainder. The metronome counts frames inside the
beat rather than whole blocks, so a beat boundary that falls mid-block is
honoured at its exact frame and beats never drift, while every block it
produces is still exactly block_size frames long.

  120 bpm @ 48 kHz, block 960:  24000 frames → (25, 0)
   90 bpm @ 48 kHz, block 960:  32000 frames → (33, 320)

Only the first `beat_len` frames of each beat (four blocks) are audible. The
slot list cycles one slot per beat: an accented 880 Hz tick followed by three
440 Hz ticks. A slot may also be silent. Each slot's oscillator restarts from phase 0
whenever its beat begins, so every tick has the same attack.

Position:
  loop_index = block-segment inside the current beat
  slot_index = current slot; advances when the beat wraps
Both return to 0 on set_bpm() and reset().
*/

const ACCENT_FREQUENCY: f32 = 880.0;
const TICK_FREQUENCY: f32 = 440.0;
const BEATS_PER_BAR: usize = 4;
/// Audible part of each beat, in blocks.
const BEAT_BLOCKS: usize = 4;

pub struct Metronome {
    sample_rate: f32,
    block_size: usize,
    bpm: f64,
    total_samples: u64,
    beat_len: u64,
    beat_frame: u64,
    slot_index: usize,
    slots: Vec<Option<Oscillator>>,
}

impl Metronome {
    pub fn new(sample_rate: f32, block_size: usize, bpm: f64) -> Result<Self> {
        if block_size == 0 {
            return Err(EngineError::InvalidConfig(
                "metronome block size must be greater than zero".into(),
            ));
        }
        let slots = (0..BEATS_PER_BAR)
            .map(|beat| {
                let freq = if beat == 0 {
                    ACCENT_FREQUENCY
                } else {
                    TICK_FREQUENCY
                };
                Some(Oscillator::sine(freq, sample_rate))
            })
            .collect();

        let mut metronome = Self {
            sample_rate,
            block_size,
            bpm: 0.0,
            total_samples: 0,
            beat_len: (block_size * BEAT_BLOCKS) as u64,
            beat_frame: 0,
            slot_index: 0,
            slots,
        };
        metronome.set_bpm(bpm)?;
        Ok(metronome)
    }

    /// Change tempo. Invalid values leave the current tempo in place.
    pub fn set_bpm(&mut self, bpm: f64) -> Result<()> {
        validate_bpm(bpm)?;
        let tempo_ms = 60_000.0 / bpm;
        let total = (tempo_ms * self.sample_rate as f64 / 1000.0).round() as u64;

        self.total_samples = total.max(1);
        self.bpm = bpm;
        self.restart_bar();
        tracing::debug!(
            bpm,
            total_samples = self.total_samples,
            loop_count = self.loop_count(),
            remainder = self.remainder(),
            "metronome tempo set"
        );
        Ok(())
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Frames per beat.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    /// Full blocks per beat.
    pub fn loop_count(&self) -> u64 {
        self.total_samples / self.block_size as u64
    }

    /// Frames left over after the full blocks of a beat.
    pub fn remainder(&self) -> u64 {
        self.total_samples % self.block_size as u64
    }

    pub fn loop_index(&self) -> u64 {
        self.beat_frame / self.block_size as u64
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    fn restart_bar(&mut self) {
        self.beat_frame = 0;
        self.slot_index = 0;
        self.start_beat();
    }

    fn start_beat(&mut self) {
        if let Some(osc) = &mut self.slots[self.slot_index] {
            osc.reset();
        }
    }

    /// Replace the sound of slot `index` (modulo the bar); `None` is a rest.
    pub fn set_slot(&mut self, index: usize, slot: Option<Oscillator>) {
        let len = self.slots.len();
        self.slots[index % len] = slot;
    }
}

impl BlockSource for Metronome {
    fn render_block(&mut self, out: &mut [Sample]) {
        for sample in out.iter_mut() {
            *sample = if self.beat_frame < self.beat_len {
                match &mut self.slots[self.slot_index] {
                    Some(osc) => osc.next_sample(),
                    None => Sample::SILENCE,
                }
            } else {
                Sample::SILENCE
            };

            self.beat_frame += 1;
            if self.beat_frame >= self.total_samples {
                self.beat_frame = 0;
                self.slot_index = (self.slot_index + 1) % self.slots.len();
                self.start_beat();
            }
        }
    }

    fn reset(&mut self) {
        self.restart_bar();
    }
}
