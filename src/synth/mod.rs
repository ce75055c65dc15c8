// Purpose: Voice management, polyphony, MIDI note handling
// This layer sits above graph nodes and turns note events into voices

pub mod factory;
pub mod message;
pub mod notes;
pub mod poly;
pub mod voice;

pub use factory::VoiceFactory;
pub use message::{MessageReceiver, SynthMessage};
pub use notes::NoteTable;
pub use poly::VoiceScheduler;
