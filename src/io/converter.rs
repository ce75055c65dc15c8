use crate::{io::midi::MidiEvent, synth::message::SynthMessage};

/// Controller 123: All Notes Off.
const ALL_NOTES_OFF: u8 = 123;

/// Decode one channel-voice message. Anything else (system messages, running
/// status, truncated input) yields `None`.
pub fn parse_midi(bytes: &[u8]) -> Option<MidiEvent> {
    let (&status, data) = bytes.split_first()?;
    let channel = status & 0x0F;
    let byte = |i: usize| data.get(i).copied().filter(|b| b & 0x80 == 0);

    match status & 0xF0 {
        0x80 => Some(MidiEvent::NoteOff {
            channel,
            key: byte(0)?,
            velocity: byte(1)?,
        }),
        0x90 => Some(MidiEvent::NoteOn {
            channel,
            key: byte(0)?,
            velocity: byte(1)?,
        }),
        0xB0 => Some(MidiEvent::ControlChange {
            channel,
            controller: byte(0)?,
            value: byte(1)?,
        }),
        0xC0 => Some(MidiEvent::ProgramChange {
            channel,
            program: byte(0)?,
        }),
        0xE0 => {
            let value = ((i16::from(byte(1)?) << 7) | i16::from(byte(0)?)) - 8192;
            Some(MidiEvent::PitchBend { channel, value })
        }
        _ => None,
    }
}

/// Map a MIDI event to a scheduler message. `channel_filter` of `None`
/// accepts every channel.
pub fn midi_to_synth(midi: MidiEvent, channel_filter: Option<u8>) -> Option<SynthMessage> {
    if channel_filter.is_some_and(|filter| filter != midi.channel()) {
        return None;
    }
    match midi {
        MidiEvent::NoteOn { key, velocity, .. } => Some(SynthMessage::NoteOn {
            note: key,
            velocity,
        }),
        MidiEvent::NoteOff { key, velocity, .. } => Some(SynthMessage::NoteOff {
            note: key,
            velocity,
        }),
        MidiEvent::ControlChange {
            controller: ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        _ => None,
    }
}
