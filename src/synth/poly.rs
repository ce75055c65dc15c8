use std::sync::Arc;

use crate::{
    graph::node::Sample,
    runtime::BlockSource,
    synth::{
        factory::VoiceFactory,
        message::{MessageReceiver, SynthMessage},
        notes::NoteTable,
        voice::Voice,
    },
    MAX_BLOCK_SIZE,
};

/// Gain applied to the sum of all voices.
pub const VOICE_GAIN: f32 = 0.3;
/// Peak level of the voice sum after gain.
pub const MAX_AMPLITUDE: f32 = 0.8;

/// Turns note events into voices and renders their sum.
///
/// - note-on (velocity > 0) for a note with no voice creates one from the
///   factory at `velocity / 127` amplitude; a repeated note-on is ignored
/// - note-off, or note-on with velocity 0, releases the voice; a voice that
///   cannot be released is removed at once
/// - after every rendered block, released voices whose generator has ended
///   are removed
///
/// Voices are summed, scaled by [`VOICE_GAIN`] and clamped to
/// ±[`MAX_AMPLITUDE`].
pub struct VoiceScheduler {
    factory: Box<dyn VoiceFactory>,
    notes: Arc<NoteTable>,
    voices: Vec<Voice>,
    max_voices: usize,
    temp_buffer: Vec<Sample>,
}

impl VoiceScheduler {
    pub fn new<F: VoiceFactory + 'static>(
        factory: F,
        notes: Arc<NoteTable>,
        max_voices: usize,
    ) -> Self {
        let max_voices = max_voices.max(1);
        Self {
            factory: Box::new(factory),
            notes,
            voices: Vec::with_capacity(max_voices),
            max_voices,
            temp_buffer: vec![Sample::SILENCE; MAX_BLOCK_SIZE],
        }
    }

    pub fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::NoteOn { note, velocity } => self.note_on(note, velocity),
            SynthMessage::NoteOff { note, .. } => self.note_off(note),
            SynthMessage::AllNotesOff => self.all_notes_off(),
        }
    }

    /// Apply every queued message.
    pub fn drain<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            self.handle(msg);
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if velocity == 0 {
            self.note_off(note);
            return;
        }
        if self.find_voice(note).is_some() {
            return;
        }
        let Some(frequency) = self.notes.freq(note) else {
            tracing::warn!(note, "note-on outside the MIDI range ignored");
            return;
        };
        if self.voices.len() >= self.max_voices {
            tracing::warn!(note, max_voices = self.max_voices, "polyphony limit reached, note dropped");
            return;
        }

        let amplitude = f32::from(velocity.min(127)) / 127.0;
        let generator = self.factory.create_voice(frequency, amplitude);
        self.voices.push(Voice::new(note, generator));
        tracing::debug!(note, velocity, voices = self.voices.len(), "voice started");
    }

    pub fn note_off(&mut self, note: u8) {
        let Some(index) = self.find_voice(note) else {
            return;
        };
        let voice = &mut self.voices[index];
        if voice.is_released() {
            return;
        }
        if !voice.release() {
            self.voices.remove(index);
            tracing::debug!(note, voices = self.voices.len(), "voice removed");
        }
    }

    /// Release every voice; voices that cannot be released are removed.
    pub fn all_notes_off(&mut self) {
        let before = self.voices.len();
        self.voices.retain_mut(Voice::release);
        tracing::debug!(
            removed = before - self.voices.len(),
            voices = self.voices.len(),
            "all notes off"
        );
    }

    /// Drop every voice whose release has finished.
    pub fn collect_finished(&mut self) {
        let before = self.voices.len();
        self.voices.retain(|voice| !voice.is_finished());
        let retired = before - self.voices.len();
        if retired > 0 {
            tracing::debug!(retired, voices = self.voices.len(), "voices retired");
        }
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }

    pub fn voice(&self, note: u8) -> Option<&Voice> {
        self.voices.iter().find(|voice| voice.note() == note)
    }

    pub fn max_voices(&self) -> usize {
        self.max_voices
    }

    fn find_voice(&self, note: u8) -> Option<usize> {
        self.voices.iter().position(|voice| voice.note() == note)
    }
}

impl BlockSource for VoiceScheduler {
    fn render_block(&mut self, out: &mut [Sample]) {
        out.fill(Sample::SILENCE);
        let len = out.len().min(MAX_BLOCK_SIZE);

        for voice in self.voices.iter_mut() {
            voice.render(&mut self.temp_buffer[..len]);
            for (o, v) in out.iter_mut().zip(&self.temp_buffer[..len]) {
                *o = *o + *v;
            }
        }

        for sample in out.iter_mut() {
            *sample = limit(sample.scale(VOICE_GAIN));
        }

        self.collect_finished();
    }

    fn is_active(&self) -> bool {
        !self.voices.is_empty()
    }
}

#[inline]
fn limit(sample: Sample) -> Sample {
    match sample {
        Sample::Mono(v) => Sample::Mono(v.clamp(-MAX_AMPLITUDE, MAX_AMPLITUDE)),
        Sample::Stereo(l, r) => Sample::Stereo(
            l.clamp(-MAX_AMPLITUDE, MAX_AMPLITUDE),
            r.clamp(-MAX_AMPLITUDE, MAX_AMPLITUDE),
        ),
    }
}
