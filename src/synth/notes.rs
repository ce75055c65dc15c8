use std::sync::{Arc, OnceLock};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub const NOTE_COUNT: usize = 128;

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Names and frequencies of the 128 MIDI notes, `C-1` (0) to `G9` (127).
///
/// Built once and shared read-only; see [`NoteTable::shared`].
#[derive(Debug, Clone)]
pub struct NoteTable {
    names: Vec<String>,
    freqs: Vec<f32>,
}

impl NoteTable {
    pub fn new() -> Self {
        let names = (0..NOTE_COUNT)
            .map(|n| format!("{}{}", NOTE_NAMES[n % 12], n as i32 / 12 - 1))
            .collect();
        let freqs = (0..NOTE_COUNT as u8).map(midi_note_to_freq).collect();
        Self { names, freqs }
    }

    /// Process-wide table.
    pub fn shared() -> Arc<NoteTable> {
        static TABLE: OnceLock<Arc<NoteTable>> = OnceLock::new();
        TABLE.get_or_init(|| Arc::new(NoteTable::new())).clone()
    }

    pub fn freq(&self, note: u8) -> Option<f32> {
        self.freqs.get(note as usize).copied()
    }

    pub fn name(&self, note: u8) -> Option<&str> {
        self.names.get(note as usize).map(String::as_str)
    }

    /// Case-insensitive lookup: `"a4"` → 69.
    pub fn note_from_name(&self, name: &str) -> Option<u8> {
        let name = name.trim();
        self.names
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(|index| index as u8)
    }

    pub fn freq_from_name(&self, name: &str) -> Option<f32> {
        self.note_from_name(name).and_then(|note| self.freq(note))
    }
}

impl Default for NoteTable {
    fn default() -> Self {
        Self::new()
    }
}
