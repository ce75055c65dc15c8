// Purpose - external interfaces: MIDI input, output sinks, format conversions

pub mod converter;
pub mod midi;
pub mod output;

pub use midi::{MidiEvent, MidiInput};
pub use output::{AudioSink, CpalOutput};
