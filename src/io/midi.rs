use midir::{Ignore, MidiInputConnection};
use rtrb::Producer;

use crate::{
    error::{EngineError, Result},
    io::converter::{midi_to_synth, parse_midi},
    synth::message::SynthMessage,
};

const CLIENT_NAME: &str = "blocksynth";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. }
            | MidiEvent::ProgramChange { channel, .. } => channel,
        }
    }
}

/// Names of the MIDI input ports currently visible.
pub fn list_ports() -> Result<Vec<String>> {
    let input = midir::MidiInput::new(CLIENT_NAME)
        .map_err(|e| EngineError::MidiUnavailable(e.to_string()))?;
    Ok(input
        .ports()
        .iter()
        .filter_map(|port| input.port_name(port).ok())
        .collect())
}

/// Open MIDI input port. Note events are forwarded to the engine until this
/// value is dropped.
pub struct MidiInput {
    connection: MidiInputConnection<Producer<SynthMessage>>,
    port_name: String,
}

impl MidiInput {
    /// Connect to input port `port` and push its note events into `sender`.
    /// `channel` of `None` listens on every channel.
    pub fn connect(
        port: usize,
        channel: Option<u8>,
        sender: Producer<SynthMessage>,
    ) -> Result<MidiInput> {
        let mut input = midir::MidiInput::new(CLIENT_NAME)
            .map_err(|e| EngineError::MidiUnavailable(e.to_string()))?;
        input.ignore(Ignore::All);

        let ports = input.ports();
        if ports.is_empty() {
            return Err(EngineError::MidiUnavailable("no input ports found".into()));
        }
        let midi_port = ports.get(port).ok_or_else(|| {
            EngineError::MidiUnavailable(format!(
                "port {port} is not available ({} ports found)",
                ports.len()
            ))
        })?;
        let port_name = input
            .port_name(midi_port)
            .map_err(|e| EngineError::MidiUnavailable(e.to_string()))?;

        let connection = input
            .connect(
                midi_port,
                "blocksynth-in",
                move |_stamp, bytes, sender: &mut Producer<SynthMessage>| {
                    let Some(msg) = parse_midi(bytes).and_then(|e| midi_to_synth(e, channel))
                    else {
                        return;
                    };
                    if sender.push(msg).is_err() {
                        tracing::warn!(?msg, "note queue full, MIDI event dropped");
                    }
                },
                sender,
            )
            .map_err(|e| EngineError::MidiUnavailable(e.to_string()))?;

        tracing::info!(port, name = %port_name, "MIDI input opened");
        Ok(MidiInput {
            connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn close(self) {
        let _sender = self.connection.close();
        tracing::info!(name = %self.port_name, "MIDI input closed");
    }
}
